use clap::ValueEnum;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

const DEFAULT_FILTER: &str = "info";

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event, for log ingestion
    Json,
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean
/// for `config show` and `completions` output.
pub fn init(format: LogFormat, directives: Option<&str>) {
    let (filter, rejected) = build_filter(directives);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // try_init: a second call (tests) keeps the first subscriber.
    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if let Some(err) = rejected {
        warn!(
            directives = directives.unwrap_or_default(),
            error = %err,
            "invalid SLA_KEEPER_LOG, falling back to {DEFAULT_FILTER}"
        );
    }
}

/// Parse the directives, returning the default filter plus the parse error
/// when they are invalid.
fn build_filter(directives: Option<&str>) -> (EnvFilter, Option<ParseError>) {
    match directives.map(EnvFilter::try_new) {
        Some(Ok(filter)) => (filter, None),
        Some(Err(err)) => (EnvFilter::new(DEFAULT_FILTER), Some(err)),
        None => (EnvFilter::new(DEFAULT_FILTER), None),
    }
}
