/*!
 * Monitoring
 * Structured tracing setup and timed spans
 */

mod tracer;

pub use tracer::{init_tracing, span_phase, PhaseSpan};
