use serde_json::{Map, Value};
use shared::VoteOption;
use tracing::{info, info_span};
use tracing_subscriber::EnvFilter;

/// Sink for vote events. Delivery is fire-and-forget: nothing here can fail a
/// request.
pub trait TelemetrySink: Send + Sync {
    fn counter_retrieved(&self, option: &VoteOption, count: u64);

    fn counter_reset(&self, option: &VoteOption, count: u64);
}

/// Forwards events to whatever `tracing` subscriber is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn counter_retrieved(&self, option: &VoteOption, count: u64) {
        let span = info_span!("retrieved", option = %option);
        let _entered = span.enter();
        info!(count, "Retrieved {} vote", option);
    }

    fn counter_reset(&self, option: &VoteOption, count: u64) {
        let mut dimensions = Map::new();
        dimensions.insert(option.label().to_string(), Value::from(count));
        let dimensions = Value::Object(dimensions);
        info!(
            target: "vote_events",
            option = %option,
            count,
            custom_dimensions = %dimensions,
            "reset of {}", option
        );
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn counter_retrieved(&self, _option: &VoteOption, _count: u64) {}

    fn counter_reset(&self, _option: &VoteOption, _count: u64) {}
}

/// Installs the global subscriber. `RUST_LOG` wins over the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        eprintln!("tracing subscriber already installed");
    }
}
