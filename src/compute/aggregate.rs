//! Status aggregation for clusters.
//!
//! Each record maps to a [`StatusTally`]; tallies merge by component-wise
//! addition, which is associative and commutative. The dominant status is
//! derived from the tally on demand and never stored.

use geocluster_types::point::{PointRecord, Status};
use std::ops::{Add, AddAssign};

/// Per-cluster counts of the two named statuses.
///
/// Unvisited members contribute to a cluster's `point_count` but to neither
/// counter here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StatusTally {
    pub visited: usize,
    pub bucket_list: usize,
}

impl StatusTally {
    pub const fn new(visited: usize, bucket_list: usize) -> Self {
        Self {
            visited,
            bucket_list,
        }
    }

    /// Map phase: project a single status into a tally.
    pub const fn of(status: Status) -> Self {
        match status {
            Status::Visited => Self::new(1, 0),
            Status::BucketList => Self::new(0, 1),
            Status::Unvisited => Self::new(0, 0),
        }
    }

    pub fn from_record(record: &PointRecord) -> Self {
        Self::of(record.status)
    }

    /// Reduce phase: fold another member's tally into this one.
    #[inline]
    pub fn merge(&mut self, other: &StatusTally) {
        self.visited += other.visited;
        self.bucket_list += other.bucket_list;
    }

    /// Members with neither named status, given the cluster's total size.
    pub fn unvisited(&self, point_count: usize) -> usize {
        point_count.saturating_sub(self.visited + self.bucket_list)
    }

    /// Dominant status for rendering. Equal nonzero counts favour `Visited`.
    ///
    /// ```
    /// use geocluster::StatusTally;
    /// use geocluster_types::point::Status;
    ///
    /// assert_eq!(StatusTally::new(2, 1).dominant(), Status::Visited);
    /// assert_eq!(StatusTally::new(1, 1).dominant(), Status::Visited);
    /// assert_eq!(StatusTally::new(0, 3).dominant(), Status::BucketList);
    /// assert_eq!(StatusTally::new(0, 0).dominant(), Status::Unvisited);
    /// ```
    pub fn dominant(&self) -> Status {
        if self.visited >= self.bucket_list && self.visited > 0 {
            Status::Visited
        } else if self.bucket_list > 0 {
            Status::BucketList
        } else {
            Status::Unvisited
        }
    }
}

impl Add for StatusTally {
    type Output = StatusTally;

    fn add(mut self, rhs: StatusTally) -> StatusTally {
        self.merge(&rhs);
        self
    }
}

impl AddAssign for StatusTally {
    fn add_assign(&mut self, rhs: StatusTally) {
        self.merge(&rhs);
    }
}

impl std::iter::Sum for StatusTally {
    fn sum<I: Iterator<Item = StatusTally>>(iter: I) -> Self {
        iter.fold(StatusTally::default(), Add::add)
    }
}

impl<'a> FromIterator<&'a PointRecord> for StatusTally {
    fn from_iter<I: IntoIterator<Item = &'a PointRecord>>(iter: I) -> Self {
        iter.into_iter().map(StatusTally::from_record).sum()
    }
}
