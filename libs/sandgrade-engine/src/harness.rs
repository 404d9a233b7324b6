/// Harness Generator
///
/// Builds the single Racket program that is handed to the interpreter:
/// a sandboxed evaluator seeded with the submission, followed by one
/// `(print "<delimiter>") (run "(<function> <input>)")` line per test case.
///
/// Everything spliced into a string literal goes through
/// [`escape_string_literal`]; an unescaped quote would let the submission
/// close the literal and run outside the sandboxed evaluator.
use sandgrade_common::types::TestSuite;
use std::fmt;
use uuid::Uuid;

/// Marker printed before every test's output.
///
/// Rendered as a fenced numeric literal (`*0.<39 digits>*`) drawn from a v4
/// UUID, so it is fresh per request and contains no characters that need
/// escaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiter(String);

impl Delimiter {
    pub fn fresh() -> Self {
        Self(format!("*0.{:039}*", Uuid::new_v4().as_u128()))
    }

    pub fn marker(&self) -> &str {
        &self.0
    }

    /// The marker as it appears on stdout: `print` writes strings with their quotes
    pub fn printed(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escape `\` and `"` so `text` can sit between double quotes in Racket source
pub fn escape_string_literal(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Wrap the submission in the sandbox preamble
fn sandbox_preamble(source_code: &str) -> String {
    format!(
        "#lang racket\n(require racket/sandbox)\n\n(define run (make-evaluator 'racket \"{}\"))\n",
        escape_string_literal(source_code)
    )
}

/// Build the full harness: preamble, then every public case, then every hidden case
pub fn generate(source_code: &str, suite: &TestSuite, delimiter: &Delimiter) -> String {
    let mut harness = sandbox_preamble(source_code);

    for case in suite.cases_in_order() {
        let call = format!("({} {})", suite.function_name, case.input);
        harness.push_str(&format!(
            "\n(print \"{}\") (run \"{}\")",
            delimiter.marker(),
            escape_string_literal(&call)
        ));
    }

    harness.push('\n');
    harness
}
