//! Analytics over an online-education snapshot: students, courses, modules,
//! lessons, homeworks, submissions, reviews and enrollments.
//!
//! Every report indexes the snapshot once ([`index::DatasetIndex`]) and then
//! aggregates in a single pass, instead of issuing one lookup per nested row.

pub mod config;
pub mod dataset;
pub mod db;
pub mod error;
pub mod index;
pub mod models;
pub mod render;
pub mod reports;
pub mod sample;

pub use config::ReportConfig;
pub use dataset::Dataset;
pub use error::AnalyticsError;
pub use index::DatasetIndex;
pub use reports::{run_report, ReportEnvelope, ReportRequest};
