pub mod driver;
pub mod script;

pub use driver::{SessionSummary, SharedLevel, describe, run_session, spawn_countdown};
pub use script::{ReplayScript, ScriptStep};
