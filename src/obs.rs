//! Optional observability helpers for catalog operations and token acquisition.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit a `beer_client.operation` span per call, carrying the operation,
//!   its HTTP method, the call site, and on failure the HTTP status and error class.
//! - Enable `metrics` to count calls in `beer_client_operation_total` (labels `operation`,
//!   `method`, `outcome`, `error`) and record latency in the
//!   `beer_client_operation_duration_seconds` histogram.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// std
use std::time::Instant;
// self
use crate::_prelude::*;

/// Operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Fetch a single record by id.
	GetBeer,
	/// Create a record and fetch it back.
	CreateBeer,
	/// Replace a record and fetch it back.
	UpdateBeer,
	/// Delete a record.
	DeleteBeer,
	/// Fetch one page of records.
	ListBeers,
	/// Client-credentials exchange at the token endpoint.
	Token,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::GetBeer => "get_beer",
			OperationKind::CreateBeer => "create_beer",
			OperationKind::UpdateBeer => "update_beer",
			OperationKind::DeleteBeer => "delete_beer",
			OperationKind::ListBeers => "list_beers",
			OperationKind::Token => "token",
		}
	}

	/// HTTP method of the request that starts the operation.
	pub const fn method(self) -> &'static str {
		match self {
			OperationKind::GetBeer | OperationKind::ListBeers => "GET",
			OperationKind::CreateBeer | OperationKind::Token => "POST",
			OperationKind::UpdateBeer => "PUT",
			OperationKind::DeleteBeer => "DELETE",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside an operation span, recording the attempt, the final outcome, and the
/// elapsed time.
pub async fn observe<T, Fut>(kind: OperationKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = OperationSpan::new(kind, stage);
	let started = Instant::now();

	record_outcome(kind, OperationOutcome::Attempt, None);

	let result = span.instrument(fut).await;
	let elapsed = started.elapsed();

	match &result {
		Ok(_) => {
			record_outcome(kind, OperationOutcome::Success, None);
			record_duration(kind, OperationOutcome::Success, elapsed);
		},
		Err(err) => {
			span.record_failure(err);
			record_outcome(kind, OperationOutcome::Failure, Some(err.class()));
			record_duration(kind, OperationOutcome::Failure, elapsed);
		},
	}

	result
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn operations_name_their_http_method() {
		assert_eq!(OperationKind::GetBeer.method(), "GET");
		assert_eq!(OperationKind::ListBeers.method(), "GET");
		assert_eq!(OperationKind::CreateBeer.method(), "POST");
		assert_eq!(OperationKind::UpdateBeer.method(), "PUT");
		assert_eq!(OperationKind::DeleteBeer.method(), "DELETE");
		assert_eq!(OperationKind::Token.to_string(), "token");
	}

	#[tokio::test]
	async fn observe_passes_results_through() {
		let ok = observe(OperationKind::GetBeer, "observe_ok", async { Ok(7) }).await;

		assert_eq!(ok.ok(), Some(7));

		let err = observe(OperationKind::DeleteBeer, "observe_err", async {
			Err::<(), _>(Error::invalid_request("no id"))
		})
		.await;

		assert!(matches!(err, Err(Error::Client { status: None, .. })));
	}
}
