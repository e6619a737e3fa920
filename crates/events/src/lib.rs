//! Outbound delivery of failure events.
//!
//! - [`ErrorReportSink`] -- fire-and-forget POST of an
//!   [`ErrorReport`](testbed_core::report::ErrorReport) to the telemetry endpoint.

pub mod delivery;

pub use delivery::error_report::{ErrorReportSink, TelemetryError, TELEMETRY_TIMEOUT};
