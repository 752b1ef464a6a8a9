pub mod client;
pub mod config;
pub mod reporter;

pub use client::{ScoreClient, ScoreError, SubmitOutcome, SubmitStage};
pub use config::ScoreServiceConfig;
pub use reporter::{ScoreReporter, SubmitReport};
