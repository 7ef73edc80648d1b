//! Transport layer for the cluster worker
//!
//! Available transports:
//! - `stdio` - newline-delimited JSON over a reader/writer pair

pub mod stdio;
