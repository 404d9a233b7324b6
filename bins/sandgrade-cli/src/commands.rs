// CLI commands for grading submissions locally
use anyhow::{bail, Context, Result};
use sandgrade_common::types::{ExecutionRequest, GradeReport, TestSuite};
use sandgrade_engine::harness::{self, Delimiter};
use sandgrade_engine::{Grader, RuntimeConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// Load a test suite in the content service's JSON format
fn load_suite(path: &Path) -> Result<TestSuite> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read test suite {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse test suite {}", path.display()))
}

fn load_request(source: &Path, tests: &Path) -> Result<ExecutionRequest> {
    let source_code = fs::read_to_string(source)
        .with_context(|| format!("Failed to read source {}", source.display()))?;
    Ok(ExecutionRequest {
        source_code,
        suite: load_suite(tests)?,
    })
}

/// Config file + environment, then command-line flags on top
fn resolve_config(racket_root: Option<PathBuf>, timeout: Option<u64>) -> Result<RuntimeConfig> {
    let mut config = RuntimeConfig::load_default()?.with_env_overrides()?;
    if let Some(root) = racket_root {
        config.racket_root = root;
    }
    if let Some(secs) = timeout {
        config.timeout_seconds = secs;
    }
    config.validate()?;
    Ok(config)
}

/// Grade a submission and print the report as JSON. Returns whether it passed.
pub async fn grade(
    source: &Path,
    tests: &Path,
    racket_root: Option<PathBuf>,
    timeout: Option<u64>,
) -> Result<bool> {
    let request = load_request(source, tests)?;
    let config = resolve_config(racket_root, timeout)?;

    eprintln!(
        "🏁 Grading {} against {} public / {} hidden tests (timeout {}s)",
        source.display(),
        request.suite.public.len(),
        request.suite.hidden.len(),
        config.timeout_seconds
    );

    let grader = Grader::from_config(&config);
    let verdict = grader.grade(&request).await;
    let passed = verdict.passed;

    let report = GradeReport::new(&request.suite, verdict);
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );

    if passed {
        eprintln!("✅ {}", report.verdict.message);
    } else {
        eprintln!("❌ {}", report.verdict.message.replace('\n', " - "));
    }

    Ok(passed)
}

/// Print the generated harness for a submission
pub fn print_harness(source: &Path, tests: &Path) -> Result<()> {
    let request = load_request(source, tests)?;
    let delimiter = Delimiter::fresh();
    print!("{}", harness::generate(&request.source_code, &request.suite, &delimiter));
    eprintln!("📎 Delimiter: {}", delimiter);
    Ok(())
}

/// Check the bundled Racket installation
pub fn check_installation(racket_root: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(racket_root, None)?;

    println!("🔍 Checking Racket installation at {}", config.racket_root.display());
    config.check_installation()?;
    println!("  ✅ Interpreter: {}", config.interpreter_path().display());
    println!("  ✅ Collects:    {}", config.collects_path().display());
    println!("\n✅ Installation looks usable (timeout {}s)", config.timeout_seconds);
    Ok(())
}

fn write_default_config(root: &Path) -> Result<PathBuf> {
    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;

    let config_path = config_dir.join("sandgrade.json");
    if config_path.exists() {
        bail!("{} already exists", config_path.display());
    }

    let json = serde_json::to_string_pretty(&RuntimeConfig::default())
        .context("Failed to serialize default config")?;
    fs::write(&config_path, json)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    Ok(config_path)
}

/// Create config/sandgrade.json with defaults
pub fn init_project(path: &Path) -> Result<()> {
    println!("🚀 Initializing sandgrade config at: {}", path.display());
    let config_path = write_default_config(path)?;
    println!("  ✅ Created: {}", config_path.display());
    println!("\n📋 Next steps:");
    println!("  1. Unpack Racket into RacketInstalls/racket (or set racket_root)");
    println!("  2. Verify it: sandgrade-cli check");
    Ok(())
}
