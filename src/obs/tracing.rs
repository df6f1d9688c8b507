// self
use crate::{_prelude::*, obs::OperationKind};

/// Future produced by [`OperationSpan::instrument`]; instrumented only with `tracing` enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Future produced by [`OperationSpan::instrument`]; instrumented only with `tracing` enabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// Span covering one catalog call or token exchange.
///
/// Opened with `operation`, `http.method`, and `stage`; `http.status` and `error` stay empty
/// until [`OperationSpan::record_failure`] fills them.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Opens a span for `kind`, tagged with the call site `stage`.
	pub fn new(kind: OperationKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"beer_client.operation",
				operation = kind.as_str(),
				http.method = kind.method(),
				stage,
				http.status = tracing::field::Empty,
				error = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Drives `fut` with the span attached to every poll.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Tags the span with the error class and, when known, the HTTP status.
	pub fn record_failure(&self, err: &Error) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("error", err.class());

			if let Some(status) = err.status() {
				self.span.record("http.status", status);
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = err;
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn spans_wrap_futures_and_accept_failures() {
		let span = OperationSpan::new(OperationKind::CreateBeer, "spans_wrap_futures");
		let value = span.instrument(async { "created" }).await;

		assert_eq!(value, "created");

		span.record_failure(&Error::from_status(
			503,
			&Url::parse("http://localhost:8080/api/v1/beer").expect("URL should parse."),
			None,
		));
	}
}
