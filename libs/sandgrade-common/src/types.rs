use serde::{Deserialize, Serialize};

/// Sentinel recorded in `Verdict::results` when a public case produced no token
pub const NO_OUTPUT: &str = "No output";

/// Crash detail used when the interpreter output cannot be attributed to every case
pub const UNKNOWN_ERROR: &str = "Unknown Error";

/// One test case: an argument list for the entry point and the printed value it must produce.
///
/// The content service encodes a case as a two-element JSON array
/// (`["1 2", "3"]`), so (de)serialization goes through a tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
}

impl TestCase {
    pub fn new(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected_output: expected_output.into(),
        }
    }
}

impl From<(String, String)> for TestCase {
    fn from((input, expected_output): (String, String)) -> Self {
        Self {
            input,
            expected_output,
        }
    }
}

impl From<TestCase> for (String, String) {
    fn from(case: TestCase) -> Self {
        (case.input, case.expected_output)
    }
}

/// Public and hidden cases for a single entry point.
///
/// Public cases are echoed back with their outputs; hidden cases only ever
/// contribute to a pass count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSuite {
    #[serde(default)]
    pub public: Vec<TestCase>,
    #[serde(default, alias = "private")]
    pub hidden: Vec<TestCase>,
    pub function_name: String,
}

impl TestSuite {
    /// Number of output tokens a complete run must produce
    pub fn total_cases(&self) -> usize {
        self.public.len() + self.hidden.len()
    }

    /// Cases in emission order: all public, then all hidden
    pub fn cases_in_order(&self) -> impl Iterator<Item = &TestCase> {
        self.public.iter().chain(self.hidden.iter())
    }
}

/// A submission to grade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    #[serde(alias = "code")]
    pub source_code: String,
    pub suite: TestSuite,
}

/// Outcome of one grading request, before it is rendered into a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerdictKind {
    AllPassed,
    PublicFailed { passed: usize, total: usize },
    HiddenFailed { passed: usize, total: usize },
    TimedOut,
    Crashed { detail: String },
}

impl VerdictKind {
    pub fn is_success(&self) -> bool {
        matches!(self, VerdictKind::AllPassed)
    }

    /// Human-readable status shown to the submitter
    pub fn message(&self) -> String {
        match self {
            VerdictKind::AllPassed => "All tests passed!".to_string(),
            VerdictKind::PublicFailed { passed, total } => format!("{}/{} passed", passed, total),
            VerdictKind::HiddenFailed { passed, total } => format!(
                "All public tests pass\n{}/{} hidden tests passed",
                passed, total
            ),
            VerdictKind::TimedOut => "Code execution timed out.".to_string(),
            VerdictKind::Crashed { detail } => {
                format!("Your code crashed during execution\n{}", detail)
            }
        }
    }

    /// Short stable label, used for metrics and log fields
    pub fn label(&self) -> &'static str {
        match self {
            VerdictKind::AllPassed => "passed",
            VerdictKind::PublicFailed { .. } => "public_failed",
            VerdictKind::HiddenFailed { .. } => "hidden_failed",
            VerdictKind::TimedOut => "timed_out",
            VerdictKind::Crashed { .. } => "crashed",
        }
    }
}

/// Final pass/fail outcome returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub passed: bool,
    pub message: String,
    pub results: Vec<String>,
}

impl Verdict {
    pub fn from_kind(kind: &VerdictKind, results: Vec<String>) -> Self {
        Self {
            passed: kind.is_success(),
            message: kind.message(),
            results,
        }
    }

    pub fn timed_out() -> Self {
        Self::from_kind(&VerdictKind::TimedOut, Vec::new())
    }

    pub fn crashed(detail: impl Into<String>) -> Self {
        Self::from_kind(
            &VerdictKind::Crashed {
                detail: detail.into(),
            },
            Vec::new(),
        )
    }
}

/// Per-case feedback for a public test: what was asked, what was expected, what came back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicCaseReport {
    pub input: String,
    pub expected: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl PublicCaseReport {
    /// Pair every public case with the verdict result at the same index.
    /// Crash and timeout verdicts carry no results, so every `output` is `None`.
    pub fn for_verdict(suite: &TestSuite, verdict: &Verdict) -> Vec<Self> {
        suite
            .public
            .iter()
            .enumerate()
            .map(|(idx, case)| PublicCaseReport {
                input: case.input.clone(),
                expected: case.expected_output.clone(),
                output: verdict.results.get(idx).cloned(),
            })
            .collect()
    }
}

/// Verdict plus public per-case feedback, as handed back to the web layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeReport {
    #[serde(flatten)]
    pub verdict: Verdict,
    pub public_cases: Vec<PublicCaseReport>,
}

impl GradeReport {
    pub fn new(suite: &TestSuite, verdict: Verdict) -> Self {
        let public_cases = PublicCaseReport::for_verdict(suite, &verdict);
        Self {
            verdict,
            public_cases,
        }
    }
}
