//! Bearer token middleware wrapped around the catalog transport.

// crates.io
use reqwest::{Request, Response, StatusCode, header::AUTHORIZATION};
// self
use crate::{
	_prelude::*,
	error::{AuthError, ConfigError, TransportError},
	http::ReqwestHttpClient,
	token::AccessTokenSource,
};

/// Decorates every outgoing request with `Authorization: Bearer <token>` before handing it to
/// the transport.
///
/// A `401 Unauthorized` response invalidates the token source's cache so the next request
/// acquires a new token; the rejected request itself is not replayed.
#[derive(Clone)]
pub struct AuthInterceptor {
	http_client: ReqwestHttpClient,
	tokens: Arc<dyn AccessTokenSource>,
}
impl AuthInterceptor {
	/// Wraps `http_client` so requests carry tokens from `tokens`.
	pub fn new(http_client: ReqwestHttpClient, tokens: Arc<dyn AccessTokenSource>) -> Self {
		Self { http_client, tokens }
	}

	/// Underlying transport, for building requests.
	pub fn http_client(&self) -> &ReqwestHttpClient {
		&self.http_client
	}

	/// Attaches the bearer token and executes `request`.
	pub async fn execute(&self, mut request: Request) -> Result<Response> {
		let token = self.tokens.access_token().await.map_err(AuthError::acquisition)?;
		let header =
			token.bearer_header().map_err(|source| AuthError::InvalidTokenValue { source })?;

		request.headers_mut().insert(AUTHORIZATION, header);

		#[cfg(feature = "tracing")]
		tracing::debug!(method = %request.method(), url = %request.url(), "sending catalog request");

		let response = self.http_client.execute(request).await.map_err(map_send_error)?;

		#[cfg(feature = "tracing")]
		tracing::debug!(status = response.status().as_u16(), "catalog response received");

		if response.status() == StatusCode::UNAUTHORIZED {
			self.tokens.invalidate();
		}

		Ok(response)
	}
}
impl Debug for AuthInterceptor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthInterceptor").field("http_client", &self.http_client).finish()
	}
}

fn map_send_error(err: ReqwestError) -> Error {
	if err.is_builder() {
		ConfigError::from(err).into()
	} else {
		TransportError::from(err).into()
	}
}
