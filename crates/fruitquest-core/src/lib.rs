pub mod animation;
pub mod events;
pub mod input;
pub mod score;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::sync::{Arc, Mutex};

    use crate::input::InputSnapshot;
    use crate::score::{ScoreSink, ScoreSubmission, UserId};

    /// A `ScoreSink` that records every submission it receives.
    #[derive(Clone, Default)]
    pub struct RecordingSink {
        submissions: Arc<Mutex<Vec<ScoreSubmission>>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn submissions(&self) -> Vec<ScoreSubmission> {
            self.submissions
                .lock()
                .expect("recording sink lock poisoned")
                .clone()
        }
    }

    impl ScoreSink for RecordingSink {
        fn submit(&self, submission: ScoreSubmission) {
            self.submissions
                .lock()
                .expect("recording sink lock poisoned")
                .push(submission);
        }
    }

    /// Build an input snapshot from `(up, right, left, jump)` flags.
    pub fn keys(up: bool, right: bool, left: bool, jump: bool) -> InputSnapshot {
        InputSnapshot {
            up,
            left,
            right,
            jump,
        }
    }

    /// The user id used throughout the test suites.
    pub fn test_user() -> UserId {
        UserId::new("17")
    }
}
