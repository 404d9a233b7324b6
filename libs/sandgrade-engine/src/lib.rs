//! Grading engine for Racket submissions.
//!
//! A request flows through four stages: the harness generator wraps the
//! submission and the test calls into one program, the runner executes it in a
//! child interpreter, the parser splits the captured output back into one token
//! per case, and the evaluator turns those tokens into a [`Verdict`].
//!
//! [`Verdict`]: sandgrade_common::types::Verdict

pub mod config;
pub mod evaluator;
pub mod executor;
pub mod harness;
pub mod parser;
pub mod runner;

pub use config::RuntimeConfig;
pub use executor::Grader;
