/*!
 * Structured Tracing
 * Subscriber setup and timed spans using the tracing crate
 *
 * Features:
 * - Env-driven filter with JSON or compact human output
 * - Timed spans that log their duration on drop
 * - Slow-phase warnings with structured fields
 */

use std::time::{Duration, Instant};
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Phases slower than this are logged at WARN
const SLOW_PHASE: Duration = Duration::from_secs(5);

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - LFQ_TRACE_JSON: Enable JSON output (default: false)
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("LFQ_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    if result.is_ok() {
        info!(json = use_json, "Structured tracing initialized");
    }
}

/// Span that times a named phase and logs the result when dropped
pub struct PhaseSpan {
    span: tracing::Span,
    start: Instant,
    phase: String,
}

impl PhaseSpan {
    pub fn new(phase: &str) -> Self {
        let span = span!(
            Level::INFO,
            "phase",
            phase = phase,
            duration_ms = tracing::field::Empty,
            items_processed = tracing::field::Empty,
            result = tracing::field::Empty,
        );

        let _entered = span.enter();
        debug!(phase = phase, "phase started");
        drop(_entered);

        Self {
            span,
            start: Instant::now(),
            phase: phase.to_string(),
        }
    }

    /// Record items processed count
    pub fn record_items_processed(&self, count: u64) {
        self.span.record("items_processed", count);
    }

    /// Record the phase result
    pub fn record_result(&self, success: bool) {
        self.span
            .record("result", if success { "success" } else { "error" });
    }

    /// Time elapsed since the phase started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for PhaseSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();
        self.span.record("duration_ms", duration.as_millis() as u64);

        if duration > SLOW_PHASE {
            warn!(
                phase = %self.phase,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow phase detected"
            );
        } else {
            info!(
                phase = %self.phase,
                duration_ms = duration.as_millis() as u64,
                "phase completed"
            );
        }
    }
}

/// Helper to create a phase span
#[inline]
pub fn span_phase(name: &str) -> PhaseSpan {
    PhaseSpan::new(name)
}
