//! Client-level error types shared across the catalog client, interceptor, and token provider.

// self
use crate::{_prelude::*, obs::OperationKind};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const BODY_PREVIEW_LIMIT: usize = 256;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Authentication or authorization failure.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body did not match the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Server answered `404 Not Found`.
	#[error("Resource was not found: {url}.")]
	NotFound {
		/// Request URL that produced the 404.
		url: String,
		/// Response body preview, if any.
		body: Option<String>,
	},
	/// Server rejected the request with a 4xx status, or the request was malformed locally.
	#[error("Request was rejected: {message}.")]
	Client {
		/// HTTP status code; `None` when the request never left the process.
		status: Option<u16>,
		/// Human-readable summary.
		message: String,
		/// Response body preview, if any.
		body: Option<String>,
	},
	/// Server failed with a 5xx status.
	#[error("Server failed with status {status}.")]
	Server {
		/// HTTP status code.
		status: u16,
		/// Response body preview, if any.
		body: Option<String>,
	},
	/// Server answered with a status outside the success, client, and server error ranges
	/// (an informational or unfollowed redirect status).
	#[error("Server answered with unexpected status {status}.")]
	UnexpectedStatus {
		/// HTTP status code.
		status: u16,
		/// Response body preview, if any.
		body: Option<String>,
	},
	/// The mutation succeeded but the follow-up fetch of the resulting record failed.
	///
	/// The server state may already reflect the change.
	#[error("Follow-up fetch of {location} after {operation} failed.")]
	FollowUp {
		/// Mutation that preceded the failing fetch.
		operation: OperationKind,
		/// URI fetched after the mutation.
		location: String,
		/// Failure raised by the follow-up fetch.
		#[source]
		source: Box<Error>,
	},
}
impl Error {
	/// Returns the HTTP status attached to the error, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::NotFound { .. } => Some(404),
			Self::Client { status, .. } => *status,
			Self::Server { status, .. } | Self::UnexpectedStatus { status, .. } => Some(*status),
			Self::Auth(AuthError::Rejected { status, .. }) => Some(*status),
			Self::Auth(AuthError::TokenEndpoint { status, .. }) => *status,
			Self::FollowUp { source, .. } => source.status(),
			_ => None,
		}
	}

	/// Returns the response body preview attached to the error, if any.
	pub fn body(&self) -> Option<&str> {
		match self {
			Self::NotFound { body, .. }
			| Self::Client { body, .. }
			| Self::Server { body, .. }
			| Self::UnexpectedStatus { body, .. }
			| Self::Auth(AuthError::Rejected { body, .. }) => body.as_deref(),
			Self::FollowUp { source, .. } => source.body(),
			_ => None,
		}
	}

	/// Short label naming the error class, used in span and metric fields.
	pub fn class(&self) -> &'static str {
		match self {
			Self::Config(_) => "config",
			Self::Auth(AuthError::Rejected { .. }) => "rejected",
			Self::Auth(_) => "token",
			Self::Transport(_) => "transport",
			Self::Decode(_) => "decode",
			Self::NotFound { .. } => "not_found",
			Self::Client { .. } => "client",
			Self::Server { .. } => "server",
			Self::UnexpectedStatus { .. } => "unexpected_status",
			Self::FollowUp { .. } => "follow_up",
		}
	}

	/// Returns `true` when the server reported `404 Not Found`.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound { .. })
	}

	/// Builds a local validation failure that never reached the server.
	pub fn invalid_request(message: impl Into<String>) -> Self {
		Self::Client { status: None, message: message.into(), body: None }
	}

	/// Classifies a non-success HTTP status into the error taxonomy.
	pub fn from_status(status: u16, url: &Url, body: Option<String>) -> Self {
		let body = body.filter(|value| !value.trim().is_empty()).map(truncate_preview);

		match status {
			404 => Self::NotFound { url: url.to_string(), body },
			401 | 403 => AuthError::Rejected { status, body }.into(),
			400..=499 => Self::Client {
				status: Some(status),
				message: format!("{url} answered with status {status}"),
				body,
			},
			500..=599 => Self::Server { status, body },
			_ => Self::UnexpectedStatus { status, body },
		}
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Base URL cannot serve as a base for relative paths.
	#[error("Base URL `{url}` cannot be used as a base.")]
	InvalidBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// A URL could not be parsed or joined.
	#[error("URL is invalid.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Registration failed validation.
	#[error(transparent)]
	Registration(#[from] crate::registration::RegistrationError),
	/// Configuration document could not be parsed.
	#[error("Client configuration is malformed.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
impl From<url::ParseError> for ConfigError {
	fn from(source: url::ParseError) -> Self {
		Self::InvalidUrl { source }
	}
}

/// Authentication failures: rejected API calls or token acquisition problems.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Catalog API answered `401` or `403`.
	#[error("Request was rejected with status {status}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Response body preview, if any.
		body: Option<String>,
	},
	/// Client authentication failed at the token endpoint.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Token endpoint rejected the grant.
	#[error("Token endpoint rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Requested scopes were refused.
	#[error("Token endpoint refused the requested scopes: {reason}.")]
	InvalidScope {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Token endpoint returned an unexpected response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Summary of the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint responded with malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint issued something other than a bearer token.
	#[error("Token endpoint issued an unsupported token type `{token_type}`.")]
	UnsupportedTokenType {
		/// Token type reported by the endpoint.
		token_type: String,
	},
	/// Token endpoint returned a zero lifetime.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
	/// Token endpoint returned an excessively large lifetime.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// Access token could not be assembled.
	#[error("Unable to build access token.")]
	TokenBuild(#[from] crate::auth::AccessTokenBuilderError),
	/// Token endpoint could not be reached or the exchange could not be issued.
	#[error("Access token could not be acquired.")]
	TokenAcquisition {
		/// Transport or configuration failure raised during the exchange.
		#[source]
		source: Box<Error>,
	},
	/// Acquired token cannot be carried in an `Authorization` header.
	#[error("Access token contains characters not allowed in an HTTP header.")]
	InvalidTokenValue {
		/// Header construction failure.
		#[source]
		source: reqwest::header::InvalidHeaderValue,
	},
}
impl AuthError {
	/// Folds any failure raised while acquiring a token into the auth taxonomy.
	///
	/// Errors that already are [`Error::Auth`] pass through unchanged.
	pub fn acquisition(err: Error) -> Error {
		match err {
			Error::Auth(_) => err,
			other => Self::TokenAcquisition { source: Box::new(other) }.into(),
		}
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {endpoint}.")]
	Network {
		/// Which endpoint was being called.
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a network error raised while calling the catalog API.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { endpoint: "the catalog API", source: Box::new(src) }
	}

	/// Wraps a network error raised while calling the token endpoint.
	pub fn token_endpoint(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { endpoint: "the token endpoint", source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Response decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body did not match the expected JSON shape.
	#[error("Response body from {url} does not match the expected shape.")]
	Json {
		/// Request URL whose body failed to decode.
		url: String,
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// Response body preview.
		body: Option<String>,
	},
	/// Create response lacked a `Location` header.
	#[error("Create response from {url} is missing the Location header.")]
	MissingLocation {
		/// Request URL.
		url: String,
	},
	/// `Location` header could not be resolved into a URL.
	#[error("Create response carries an invalid Location header `{location}`.")]
	InvalidLocation {
		/// Raw header value.
		location: String,
	},
}

/// Truncates response bodies so errors stay printable.
pub(crate) fn truncate_preview(body: String) -> String {
	if body.chars().count() <= BODY_PREVIEW_LIMIT {
		return body;
	}

	let mut buf = String::new();

	for (idx, ch) in body.chars().enumerate() {
		if idx >= BODY_PREVIEW_LIMIT {
			buf.push('…');

			break;
		}
		buf.push(ch);
	}

	buf
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url() -> Url {
		Url::parse("http://localhost:8080/api/v1/beer").expect("Fixture URL should parse.")
	}

	#[test]
	fn statuses_map_onto_taxonomy() {
		assert!(Error::from_status(404, &url(), None).is_not_found());
		assert!(matches!(
			Error::from_status(401, &url(), None),
			Error::Auth(AuthError::Rejected { status: 401, .. })
		));
		assert!(matches!(
			Error::from_status(403, &url(), None),
			Error::Auth(AuthError::Rejected { status: 403, .. })
		));
		assert!(matches!(
			Error::from_status(409, &url(), None),
			Error::Client { status: Some(409), .. }
		));
		assert!(matches!(Error::from_status(503, &url(), None), Error::Server { status: 503, .. }));
		assert!(matches!(
			Error::from_status(304, &url(), None),
			Error::UnexpectedStatus { status: 304, .. }
		));
		assert!(matches!(
			Error::from_status(101, &url(), Some("switch".into())),
			Error::UnexpectedStatus { status: 101, .. }
		));
		assert_eq!(Error::from_status(304, &url(), None).status(), Some(304));
		assert_eq!(Error::from_status(304, &url(), None).class(), "unexpected_status");
	}

	#[test]
	fn acquisition_failures_fold_into_auth() {
		let transport = TransportError::token_endpoint(std::io::Error::other("refused"));
		let err = AuthError::acquisition(transport.into());

		match err {
			Error::Auth(AuthError::TokenAcquisition { source }) =>
				assert!(matches!(*source, Error::Transport(TransportError::Network { .. }))),
			other => panic!("Unexpected error: {other:?}."),
		}

		let already = AuthError::acquisition(AuthError::NonPositiveExpiresIn.into());

		assert!(matches!(already, Error::Auth(AuthError::NonPositiveExpiresIn)));
		assert_eq!(already.class(), "token");
	}

	#[test]
	fn status_and_body_survive_follow_up_wrapping() {
		let inner = Error::from_status(500, &url(), Some("boom".into()));
		let err = Error::FollowUp {
			operation: OperationKind::CreateBeer,
			location: url().to_string(),
			source: Box::new(inner),
		};

		assert_eq!(err.status(), Some(500));
		assert_eq!(err.body(), Some("boom"));
		assert!(!err.is_not_found());
	}

	#[test]
	fn blank_bodies_are_dropped_and_long_ones_truncated() {
		let err = Error::from_status(500, &url(), Some("  ".into()));

		assert_eq!(err.body(), None);

		let long = "x".repeat(BODY_PREVIEW_LIMIT + 10);
		let err = Error::from_status(500, &url(), Some(long));
		let body = err.body().expect("Body preview should be retained.");

		assert_eq!(body.chars().count(), BODY_PREVIEW_LIMIT + 1);
		assert!(body.ends_with('…'));
	}
}
