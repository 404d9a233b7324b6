/// Output Parser
///
/// Recovers one output token per test case from the interpreter's stdout.
/// Positional: token `i` belongs to the `i`-th case in emission order.
use crate::harness::Delimiter;
use sandgrade_common::types::UNKNOWN_ERROR;

/// Why captured output could not be turned into per-case tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// The interpreter wrote to stderr; carries the first line
    Crashed { first_line: String },
    /// Fewer tokens than cases
    Shortfall { expected: usize, found: usize },
}

impl ParseFailure {
    /// Detail line shown after the crash banner
    pub fn detail(&self) -> String {
        match self {
            ParseFailure::Crashed { first_line } => first_line.clone(),
            ParseFailure::Shortfall { .. } => UNKNOWN_ERROR.to_string(),
        }
    }
}

/// Split stdout on the printed delimiter, dropping anything before the first one
pub fn split_outputs(stdout: &str, delimiter: &Delimiter) -> Vec<String> {
    stdout
        .split(delimiter.printed().as_str())
        .skip(1)
        .map(|segment| segment.trim().to_string())
        .collect()
}

/// Turn a completed run into tokens, or the reason it counts as a crash.
///
/// Any stderr output wins over stdout, however complete stdout looks.
pub fn parse_run(
    stdout: &str,
    stderr: &str,
    delimiter: &Delimiter,
    expected_count: usize,
) -> Result<Vec<String>, ParseFailure> {
    if !stderr.is_empty() {
        let first_line = stderr
            .split(&['\n', '\r'][..])
            .next()
            .unwrap_or_default()
            .to_string();
        return Err(ParseFailure::Crashed { first_line });
    }

    let outputs = split_outputs(stdout, delimiter);
    if outputs.len() < expected_count {
        return Err(ParseFailure::Shortfall {
            expected: expected_count,
            found: outputs.len(),
        });
    }

    Ok(outputs)
}
