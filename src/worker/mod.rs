//! Digest production, delivery and the daily job

pub mod deliver;
pub mod pipeline;
pub mod scheduler;

// Re-export the main types for convenience
pub use deliver::{BroadcastReport, DigestService, SharedDigestService, broadcast_summary};
pub use pipeline::DigestPipeline;
pub use scheduler::{DailySchedule, spawn_daily_job};
