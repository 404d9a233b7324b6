/// Grader - High-Level Orchestration
///
/// **Responsibility:**
/// Run one submission through harness → runner → parser → evaluator and always
/// come back with a Verdict.
///
/// This module is the glue layer and the error recovery boundary. Runner
/// failures such as a missing interpreter are logged with their full context
/// chain and reported to the submitter as the generic crash verdict; internal
/// error text is never shown to the submitter.
use crate::config::RuntimeConfig;
use crate::evaluator;
use crate::harness::{self, Delimiter};
use crate::parser::{self, ParseFailure};
use crate::runner::{ProcessRunner, RunOutcome};
use sandgrade_common::types::{ExecutionRequest, Verdict, VerdictKind, UNKNOWN_ERROR};
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct Grader {
    runner: ProcessRunner,
}

impl Grader {
    pub fn new(runner: ProcessRunner) -> Self {
        Self { runner }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(ProcessRunner::from_config(config))
    }

    /// Grade a submission. Never fails: every problem becomes a Verdict.
    pub async fn grade(&self, request: &ExecutionRequest) -> Verdict {
        self.grade_with_kind(request).await.1
    }

    /// Grade a submission and also return the outcome kind behind the message
    #[tracing::instrument(
        skip(self, request),
        fields(
            function = %request.suite.function_name,
            public_total = request.suite.public.len(),
            hidden_total = request.suite.hidden.len(),
            source_size = request.source_code.len(),
        )
    )]
    pub async fn grade_with_kind(&self, request: &ExecutionRequest) -> (VerdictKind, Verdict) {
        let suite = &request.suite;
        let delimiter = Delimiter::fresh();
        let harness = harness::generate(&request.source_code, suite, &delimiter);

        let start = Instant::now();
        let outcome = self.runner.execute(&harness).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let (kind, results) = match outcome {
            Ok(RunOutcome::TimedOut) => {
                warn!(elapsed_ms, "Submission timed out");
                (VerdictKind::TimedOut, Vec::new())
            }
            Ok(RunOutcome::Completed { stdout, stderr }) => {
                match parser::parse_run(&stdout, &stderr, &delimiter, suite.total_cases()) {
                    Ok(outputs) => evaluator::judge(suite, &outputs),
                    Err(failure) => {
                        if let ParseFailure::Shortfall { expected, found } = &failure {
                            warn!(expected, found, "Interpreter produced too few outputs");
                        }
                        (VerdictKind::Crashed { detail: failure.detail() }, Vec::new())
                    }
                }
            }
            Err(e) => {
                error!(error = ?e, "Grading infrastructure failure");
                (
                    VerdictKind::Crashed {
                        detail: UNKNOWN_ERROR.to_string(),
                    },
                    Vec::new(),
                )
            }
        };

        info!(outcome = kind.label(), elapsed_ms, "Grading finished");

        let verdict = Verdict::from_kind(&kind, results);
        (kind, verdict)
    }
}
