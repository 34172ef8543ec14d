use prometheus::{register_counter_vec, CounterVec, Encoder, TextEncoder};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUESTIONS_CNTR: CounterVec = register_counter_vec!(
        "trivia_questions_total",
        "Number of created or deleted questions",
        &["action"]
    )
    .unwrap();
    pub static ref API_ERRORS_CNTR: CounterVec = register_counter_vec!(
        "trivia_api_errors_total",
        "Number of error responses by status code",
        &["status"]
    )
    .unwrap();
}

/// Installs the global subscriber. `LOG_LEVEL` overrides `default_directive`.
pub fn init_tracing(default_directive: &str) -> anyhow::Result<()> {
    let mut fmt_layer = fmt::layer();
    if std::env::var("INCLUDE_SPAN_EVENTS").is_ok_and(|value| value.eq_ignore_ascii_case("true")) {
        fmt_layer = fmt_layer.with_span_events(FmtSpan::ENTER | FmtSpan::EXIT);
    }
    let filter_layer = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_new(default_directive))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

/// Renders every registered metric in the Prometheus text format.
pub fn encode_metrics() -> prometheus::Result<(Vec<u8>, String)> {
    let encoder = TextEncoder::new();
    let mut buf = vec![];
    encoder.encode(&prometheus::gather(), &mut buf)?;
    Ok((buf, encoder.format_type().to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        QUESTIONS_CNTR.with_label_values(&["created"]).inc();
        let (body, content_type) = encode_metrics().unwrap();
        let body = String::from_utf8(body).unwrap();
        assert!(body.contains("trivia_questions_total"));
        assert!(content_type.starts_with("text/plain"));
    }
}
