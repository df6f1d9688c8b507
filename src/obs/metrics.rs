// std
use std::time::Duration as StdDuration;
// self
use crate::obs::{OperationKind, OperationOutcome};

/// Counts an operation outcome via the global metrics recorder (when enabled).
///
/// `error` carries the error class for failures and is recorded as `none` otherwise.
pub fn record_outcome(kind: OperationKind, outcome: OperationOutcome, error: Option<&'static str>) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"beer_client_operation_total",
			"operation" => kind.as_str(),
			"method" => kind.method(),
			"outcome" => outcome.as_str(),
			"error" => error.unwrap_or("none")
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome, error);
	}
}

/// Records how long a finished operation took, in seconds.
pub fn record_duration(kind: OperationKind, outcome: OperationOutcome, elapsed: StdDuration) {
	#[cfg(feature = "metrics")]
	{
		metrics::histogram!(
			"beer_client_operation_duration_seconds",
			"operation" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.record(elapsed.as_secs_f64());
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome, elapsed);
	}
}
