//! Geocluster Worker
//!
//! Runs a cluster index behind an asynchronous request/response boundary so
//! builds and queries never block the caller.
//!
//! # Entry points
//!
//! - [`WorkerHandle`]: in-process async handle with typed helpers
//! - [`run_stdio`]: newline-delimited JSON over stdin/stdout
//!
//! # Example
//!
//! ```ignore
//! use geocluster_worker::{WorkerConfig, WorkerHandle};
//!
//! let worker = WorkerHandle::spawn(&WorkerConfig::default());
//! worker.init(markers, Default::default()).await?;
//! let features = worker.clusters(4.0, None).await?;
//! ```

pub mod client;
pub mod config;
pub mod handler;
pub mod protocol;
pub mod transport;
pub mod worker;

pub use client::{WorkerError, WorkerHandle};
pub use config::WorkerConfig;
pub use handler::ClusterService;
pub use protocol::{OptionOverrides, Request, RequestId, Response, decode_request};
pub use transport::stdio::run_stdio;
pub use worker::spawn_worker;
