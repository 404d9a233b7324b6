// Prometheus metrics for the grading API
use lazy_static::lazy_static;
use prometheus::{register_histogram, register_int_counter_vec, Encoder, Histogram, IntCounterVec, TextEncoder};

lazy_static! {
    pub static ref GRADINGS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "sandgrade_gradings_total",
        "Graded submissions by outcome",
        &["outcome"]
    )
    .expect("sandgrade_gradings_total registers once");

    pub static ref GRADING_DURATION: Histogram = register_histogram!(
        "sandgrade_grading_duration_seconds",
        "Wall-clock time spent grading one submission",
        vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0, 30.0]
    )
    .expect("sandgrade_grading_duration_seconds registers once");
}

/// Render the default registry in the text exposition format
pub fn render() -> anyhow::Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
