//! Client-credentials exchange on top of the `oauth2` crate.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError,
	RequestTokenError, Scope, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError, BasicTokenType},
};
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	error::{AuthError, ConfigError, TransportError},
	http::{ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
	registration::{ClientAuthMethod, ClientRegistration},
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;
type ExchangeTokenResponse = oauth2::basic::BasicTokenResponse;

/// Maps token endpoint transport failures into client [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a client error.
	fn map_transport_error(
		&self,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(meta, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => AuthError::TokenEndpoint {
				message: format!("HTTP client error: {message}"),
				status: meta_status(meta),
				retry_after: meta_retry_after(meta),
			}
			.into(),
			_ => AuthError::TokenEndpoint {
				message: "HTTP client error".into(),
				status: meta_status(meta),
				retry_after: meta_retry_after(meta),
			}
			.into(),
		}
	}
}

/// Performs one client-credentials exchange for `registration`.
///
/// Every failure surfaces as [`Error::Auth`]; transport and request-construction problems are
/// wrapped in [`AuthError::TokenAcquisition`].
pub(crate) async fn exchange_client_credentials<C, M>(
	registration: &ClientRegistration,
	http_client: &C,
	mapper: &M,
) -> Result<AccessToken>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	request_token(registration, http_client, mapper).await.map_err(AuthError::acquisition)
}

async fn request_token<C, M>(
	registration: &ClientRegistration,
	http_client: &C,
	mapper: &M,
) -> Result<AccessToken>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let oauth_client = configure_client(registration)?;
	let meta = ResponseMetadataSlot::default();
	let instrumented = http_client.with_metadata(meta.clone());
	let mut request = oauth_client.exchange_client_credentials();

	for scope in &registration.scopes {
		request = request.add_scope(Scope::new(scope.to_owned()));
	}

	let response = request
		.request_async(&instrumented)
		.await
		.map_err(|err| map_request_error(meta.take(), err, mapper))?;

	map_token_response(registration, response)
}

fn configure_client(registration: &ClientRegistration) -> Result<ConfiguredBasicClient> {
	let token_url = TokenUrl::new(registration.token_endpoint.to_string())
		.map_err(|source| ConfigError::InvalidUrl { source })?;
	let mut oauth_client =
		BasicClient::new(ClientId::new(registration.client_id.clone())).set_token_uri(token_url);

	if let Some(secret) = &registration.client_secret {
		oauth_client = oauth_client.set_client_secret(ClientSecret::new(secret.clone()));
	}
	if matches!(registration.client_auth_method, ClientAuthMethod::ClientSecretPost) {
		oauth_client = oauth_client.set_auth_type(AuthType::RequestBody);
	}

	Ok(oauth_client)
}

fn map_token_response(
	registration: &ClientRegistration,
	response: ExchangeTokenResponse,
) -> Result<AccessToken> {
	if let other @ (BasicTokenType::Mac | BasicTokenType::Extension(_)) = response.token_type() {
		return Err(AuthError::UnsupportedTokenType { token_type: format!("{other:?}") }.into());
	}

	let lifetime = match response.expires_in() {
		Some(expires_in) => {
			let secs = i64::try_from(expires_in.as_secs())
				.map_err(|_| AuthError::ExpiresInOutOfRange)?;

			if secs <= 0 {
				return Err(AuthError::NonPositiveExpiresIn.into());
			}

			Duration::seconds(secs)
		},
		None => registration.default_token_lifetime,
	};
	let scopes = match response.scopes() {
		Some(granted) => granted.iter().map(|scope| (**scope).clone()).collect(),
		None => registration.scopes.clone(),
	};
	let issued_at = OffsetDateTime::now_utc();
	let expires_at =
		issued_at.checked_add(lifetime).ok_or(AuthError::ExpiresInOutOfRange)?;

	AccessToken::builder(registration.id.clone())
		.value(response.access_token().secret().to_owned())
		.scopes(scopes)
		.issued_at(issued_at)
		.expires_at(expires_at)
		.build()
		.map_err(|err| AuthError::from(err).into())
}

fn map_request_error<E, M>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
	mapper: &M,
) -> Error
where
	E: 'static + Send + Sync + StdError,
	M: ?Sized + TransportErrorMapper<E>,
{
	let meta_ref = meta.as_ref();

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, meta_ref),
		RequestTokenError::Request(error) => mapper.map_transport_error(meta_ref, error),
		RequestTokenError::Parse(error, _body) =>
			AuthError::TokenResponseParse { source: error, status: meta_status(meta_ref) }.into(),
		RequestTokenError::Other(message) => AuthError::TokenEndpoint {
			message,
			status: meta_status(meta_ref),
			retry_after: meta_retry_after(meta_ref),
		}
		.into(),
	}
}

fn map_server_response_error(response: BasicErrorResponse, meta: Option<&ResponseMetadata>) -> Error {
	let code = response.error().as_ref().to_owned();
	let reason = match response.error_description() {
		Some(description) => format!("{code}: {description}"),
		None => code.clone(),
	};

	match code.to_ascii_lowercase().as_str() {
		"invalid_client" | "unauthorized_client" => AuthError::InvalidClient { reason },
		"invalid_grant" | "unsupported_grant_type" => AuthError::InvalidGrant { reason },
		"invalid_scope" => AuthError::InvalidScope { reason },
		_ => AuthError::TokenEndpoint {
			message: reason,
			status: meta_status(meta),
			retry_after: meta_retry_after(meta),
		},
	}
	.into()
}

fn map_reqwest_error(meta: Option<&ResponseMetadata>, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return AuthError::TokenEndpoint {
			message: "request timed out".into(),
			status: meta_status(meta).or_else(|| err.status().map(|code| code.as_u16())),
			retry_after: meta_retry_after(meta),
		}
		.into();
	}

	TransportError::token_endpoint(err).into()
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}
