//! Observability utilities: subscriber setup, span helpers and wide events.

mod tracing;
mod wide_events;

pub use self::tracing::{init_tracing, CrawlSpanAttributes, LogFormat, SpanTimer, DEFAULT_FILTER};
pub use wide_events::build_stop_payload;
