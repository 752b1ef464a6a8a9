use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use fruitquest_core::score::{ScoreSink, ScoreSubmission};

use crate::client::{ScoreClient, ScoreError, SubmitOutcome};

/// Completion signal for one submission attempt.
#[derive(Debug)]
pub struct SubmitReport {
    pub submission: ScoreSubmission,
    pub result: Result<SubmitOutcome, ScoreError>,
}

/// Fire-and-forget [`ScoreSink`] backed by the Score Service.
///
/// Each submission runs as its own task on the captured runtime. Failures are
/// logged and dropped; nothing is retried. When built with
/// [`ScoreReporter::with_reports`], every finished attempt is also sent on a
/// channel so callers can observe it.
pub struct ScoreReporter {
    client: Arc<ScoreClient>,
    runtime: Handle,
    reports: Option<mpsc::UnboundedSender<SubmitReport>>,
}

impl ScoreReporter {
    pub fn new(client: ScoreClient, runtime: Handle) -> Self {
        Self {
            client: Arc::new(client),
            runtime,
            reports: None,
        }
    }

    pub fn with_reports(
        client: ScoreClient,
        runtime: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<SubmitReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let reporter = Self {
            client: Arc::new(client),
            runtime,
            reports: Some(tx),
        };
        (reporter, rx)
    }
}

impl ScoreSink for ScoreReporter {
    fn submit(&self, submission: ScoreSubmission) {
        let client = Arc::clone(&self.client);
        let reports = self.reports.clone();
        self.runtime.spawn(async move {
            let result = client.submit(&submission).await;
            match &result {
                Ok(outcome) => tracing::info!(
                    level_id = submission.level_id,
                    score = submission.score,
                    ?outcome,
                    "Score stored"
                ),
                Err(e) => tracing::warn!(
                    level_id = submission.level_id,
                    stage = %e.stage(),
                    error = %e,
                    "Score submission failed"
                ),
            }
            if let Some(tx) = reports {
                let _ = tx.send(SubmitReport { submission, result });
            }
        });
    }
}
