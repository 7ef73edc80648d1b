//! Validation for point records and viewports.

use crate::error::{ClusterError, Result};
use geocluster_types::bbox::BBox;
use geocluster_types::point::PointRecord;
use rustc_hash::FxHashSet;

/// Validates a full record set before indexing.
///
/// Longitudes must lie in `[-180, 180]` and latitudes in `[-90, 90]`, and
/// every id must be unique within the set. Errors name the offending record.
///
/// # Examples
///
/// ```
/// use geocluster::compute::validation::validate_records;
/// use geocluster_types::point::{PointRecord, Status};
///
/// let nyc = PointRecord::new("nyc", -74.0060, 40.7128, Status::Visited);
/// assert!(validate_records(&[nyc]).is_ok());
///
/// let off_map = PointRecord::new("off-map", 200.0, 40.0, Status::Visited);
/// assert!(validate_records(&[off_map]).is_err());
/// ```
pub fn validate_records(records: &[PointRecord]) -> Result<()> {
    let mut seen = FxHashSet::default();
    seen.reserve(records.len());

    for record in records {
        let [lng, lat] = record.coordinates;
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(ClusterError::InvalidInput(format!(
                "record '{}': longitude {} is outside [-180, 180]",
                record.id, lng
            )));
        }
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(ClusterError::InvalidInput(format!(
                "record '{}': latitude {} is outside [-90, 90]",
                record.id, lat
            )));
        }

        if !seen.insert(record.id.as_str()) {
            return Err(ClusterError::InvalidInput(format!(
                "duplicate record id '{}'",
                record.id
            )));
        }
    }

    Ok(())
}

/// Validates a viewport. Longitudes outside ±180 are allowed (they wrap);
/// latitudes are clamped later, but every corner must be finite.
pub fn validate_bbox(bbox: &BBox) -> Result<()> {
    if !bbox.is_finite() {
        return Err(ClusterError::InvalidInput(format!(
            "Bounding box corners must be finite, got: {:?}",
            <[f64; 4]>::from(*bbox)
        )));
    }

    if bbox.min_lat > bbox.max_lat {
        return Err(ClusterError::InvalidInput(format!(
            "Bounding box min latitude {} exceeds max latitude {}",
            bbox.min_lat, bbox.max_lat
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocluster_types::point::Status;

    #[test]
    fn test_valid_records() {
        let records = vec![
            PointRecord::new("a", -74.0, 40.7, Status::Visited),
            PointRecord::new("b", 180.0, -90.0, Status::BucketList),
        ];
        assert!(validate_records(&records).is_ok());
        assert!(validate_records(&[]).is_ok());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let records = vec![
            PointRecord::new("a", 0.0, 0.0, Status::Visited),
            PointRecord::new("a", 1.0, 1.0, Status::Visited),
        ];
        let err = validate_records(&records).unwrap_err();
        assert!(err.to_string().contains("duplicate record id 'a'"));
    }

    #[test]
    fn test_bad_coordinates_name_the_record() {
        let records = vec![PointRecord::new("bad", f64::NAN, 0.0, Status::Visited)];
        let err = validate_records(&records).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidInput(_)));
        assert!(err.to_string().contains("record 'bad'"));

        let records = vec![PointRecord::new("far", 0.0, 91.0, Status::Visited)];
        let err = validate_records(&records).unwrap_err();
        assert!(err.to_string().contains("record 'far': latitude 91"));

        let records = vec![
            PointRecord::new("ok", 10.0, 10.0, Status::Visited),
            PointRecord::new("east", 180.5, 0.0, Status::BucketList),
        ];
        let err = validate_records(&records).unwrap_err();
        assert!(err.to_string().contains("record 'east': longitude 180.5"));
    }

    #[test]
    fn test_bbox_validation() {
        assert!(validate_bbox(&BBox::world()).is_ok());
        assert!(validate_bbox(&BBox::new(170.0, -10.0, -170.0, 10.0)).is_ok());
        assert!(validate_bbox(&BBox::new(-200.0, -10.0, 200.0, 10.0)).is_ok());
        assert!(validate_bbox(&BBox::new(0.0, 10.0, 1.0, -10.0)).is_err());
        assert!(validate_bbox(&BBox::new(0.0, f64::INFINITY, 1.0, 1.0)).is_err());
    }
}
