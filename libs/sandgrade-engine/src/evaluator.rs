/// Verdict Evaluator
///
/// **Core Responsibility:**
/// Compare output tokens against expected values and decide the verdict.
///
/// **Critical Properties:**
/// - Knows nothing about processes or the interpreter
/// - Pure function: (suite, tokens) → Verdict
/// - Exact string comparison; tokens were already trimmed by the parser
/// - Hidden expected values and hidden outputs never reach the Verdict
///
/// **Message Priority:**
/// 1. Every public and hidden case passed → success
/// 2. Any public case failed → public ratio only, hidden results withheld
/// 3. Public all green, some hidden failed → hidden ratio
use sandgrade_common::types::{TestCase, TestSuite, Verdict, VerdictKind, NO_OUTPUT};

/// Count the cases whose token at `offset + i` matches exactly
fn count_passed(cases: &[TestCase], outputs: &[String], offset: usize) -> usize {
    cases
        .iter()
        .enumerate()
        .filter(|(i, case)| {
            outputs
                .get(offset + i)
                .is_some_and(|actual| *actual == case.expected_output)
        })
        .count()
}

/// Pick the verdict kind from the pass counts
pub fn classify(passed_public: usize, public_total: usize, passed_hidden: usize, hidden_total: usize) -> VerdictKind {
    if passed_public == public_total && passed_hidden == hidden_total {
        VerdictKind::AllPassed
    } else if passed_public != public_total {
        VerdictKind::PublicFailed {
            passed: passed_public,
            total: public_total,
        }
    } else {
        VerdictKind::HiddenFailed {
            passed: passed_hidden,
            total: hidden_total,
        }
    }
}

/// Decide the verdict kind and the public results list for tokens
/// (public first, then hidden)
pub fn judge(suite: &TestSuite, outputs: &[String]) -> (VerdictKind, Vec<String>) {
    let public_total = suite.public.len();
    let hidden_total = suite.hidden.len();

    let passed_public = count_passed(&suite.public, outputs, 0);
    let passed_hidden = count_passed(&suite.hidden, outputs, public_total);

    let results: Vec<String> = (0..public_total)
        .map(|i| {
            outputs
                .get(i)
                .map(|actual| actual.trim().to_string())
                .unwrap_or_else(|| NO_OUTPUT.to_string())
        })
        .collect();

    let kind = classify(passed_public, public_total, passed_hidden, hidden_total);

    tracing::debug!(
        passed_public,
        public_total,
        passed_hidden,
        hidden_total,
        outcome = kind.label(),
        "Evaluation complete"
    );

    (kind, results)
}

/// Evaluate tokens against the suite and build the Verdict
pub fn evaluate(suite: &TestSuite, outputs: &[String]) -> Verdict {
    let (kind, results) = judge(suite, outputs);
    Verdict::from_kind(&kind, results)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to create a suite from (input, expected) pairs
    fn make_suite(public: &[(&str, &str)], hidden: &[(&str, &str)]) -> TestSuite {
        TestSuite {
            public: public.iter().map(|(i, e)| TestCase::new(*i, *e)).collect(),
            hidden: hidden.iter().map(|(i, e)| TestCase::new(*i, *e)).collect(),
            function_name: "f".to_string(),
        }
    }

    fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_all_pass() {
        let suite = TestSuite {
            public: vec![TestCase::new("1 2", "3")],
            hidden: vec![TestCase::new("4 5", "9")],
            function_name: "add".to_string(),
        };

        let verdict = evaluate(&suite, &tokens(&["3", "9"]));

        assert!(verdict.passed);
        assert_eq!(verdict.message, "All tests passed!");
        assert_eq!(verdict.results, vec!["3"]);
    }

    #[test]
    fn test_public_failure_dominates() {
        let suite = make_suite(&[("a", "1"), ("b", "2"), ("c", "3")], &[("d", "4"), ("e", "5")]);

        let verdict = evaluate(&suite, &tokens(&["1", "2", "0", "4", "5"]));

        assert!(!verdict.passed);
        assert_eq!(verdict.message, "2/3 passed");
        assert_eq!(verdict.results, vec!["1", "2", "0"]);
    }

    #[test]
    fn test_hidden_only_failure() {
        let suite = make_suite(&[("a", "1"), ("b", "2")], &[("c", "3"), ("d", "4")]);

        let verdict = evaluate(&suite, &tokens(&["1", "2", "3", "0"]));

        assert!(!verdict.passed);
        assert_eq!(verdict.message, "All public tests pass\n1/2 hidden tests passed");
        assert_eq!(verdict.results, vec!["1", "2"]);
    }

    #[test]
    fn test_results_follow_public_order_regardless_of_outcome() {
        let suite = make_suite(&[("a", "x"), ("b", "y"), ("c", "z")], &[]);

        let verdict = evaluate(&suite, &tokens(&["wrong", "y", "also wrong"]));

        assert_eq!(verdict.results.len(), 3);
        assert_eq!(verdict.results, vec!["wrong", "y", "also wrong"]);
        assert_eq!(verdict.message, "1/3 passed");
    }

    #[test]
    fn test_hidden_content_never_leaks() {
        let suite = make_suite(&[("pub-in", "pub-out")], &[("hidden-in", "hidden-expected")]);

        let verdict = evaluate(&suite, &tokens(&["pub-out", "hidden-actual"]));

        let rendered = serde_json::to_string(&verdict).unwrap();
        for secret in ["hidden-in", "hidden-expected", "hidden-actual"] {
            assert!(!rendered.contains(secret), "{} leaked into {}", secret, rendered);
        }
        assert_eq!(verdict.message, "All public tests pass\n0/1 hidden tests passed");
    }

    #[test]
    fn test_missing_tokens_use_sentinel() {
        let suite = make_suite(&[("a", "1"), ("b", "2")], &[("c", "3")]);

        let verdict = evaluate(&suite, &tokens(&["1"]));

        assert_eq!(verdict.results, vec!["1", "No output"]);
        assert_eq!(verdict.message, "1/2 passed");
    }

    #[test]
    fn test_comparison_is_exact() {
        let suite = make_suite(&[("a", "Hello"), ("b", "'(1 2)")], &[]);

        let verdict = evaluate(&suite, &tokens(&["hello", "'(1  2)"]));

        assert_eq!(verdict.message, "0/2 passed");
    }

    #[test]
    fn test_empty_suite_passes() {
        let verdict = evaluate(&make_suite(&[], &[]), &[]);

        assert!(verdict.passed);
        assert!(verdict.results.is_empty());
    }

    #[test]
    fn test_no_public_cases_hidden_failure() {
        let suite = make_suite(&[], &[("a", "1"), ("b", "2")]);

        let verdict = evaluate(&suite, &tokens(&["1", "3"]));

        assert_eq!(verdict.message, "All public tests pass\n1/2 hidden tests passed");
        assert!(verdict.results.is_empty());
    }

    #[test]
    fn test_judge_reports_kind_with_counts() {
        let suite = make_suite(&[("a", "1")], &[("b", "2"), ("c", "3"), ("d", "4")]);

        let (kind, results) = judge(&suite, &tokens(&["1", "2", "0", "4"]));

        assert_eq!(kind, VerdictKind::HiddenFailed { passed: 2, total: 3 });
        assert_eq!(results, vec!["1"]);
    }

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify(3, 3, 2, 2), VerdictKind::AllPassed);
        assert_eq!(classify(2, 3, 2, 2), VerdictKind::PublicFailed { passed: 2, total: 3 });
        assert_eq!(classify(2, 3, 0, 2), VerdictKind::PublicFailed { passed: 2, total: 3 });
        assert_eq!(classify(3, 3, 1, 2), VerdictKind::HiddenFailed { passed: 1, total: 2 });
    }
}
