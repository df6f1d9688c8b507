//! Client registration describing how to obtain client-credentials tokens.
//!
//! A [`ClientRegistration`] carries the registration name, the client identity, the token
//! endpoint, requested scopes, and the client authentication method. Registrations are
//! validated on construction, whether built in code through [`ClientRegistrationBuilder`]
//! or deserialized from configuration.

/// Builder API and validation rules for registrations.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, auth::RegistrationId};

/// How the client authenticates itself at the token endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	#[default]
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
}
impl ClientAuthMethod {
	/// Returns the RFC 7591 identifier for the method.
	pub const fn as_str(self) -> &'static str {
		match self {
			ClientAuthMethod::ClientSecretBasic => "client_secret_basic",
			ClientAuthMethod::ClientSecretPost => "client_secret_post",
		}
	}
}
impl Display for ClientAuthMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Validated client-credentials registration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RegistrationSettings", into = "RegistrationSettings")]
pub struct ClientRegistration {
	/// Registration name.
	pub id: RegistrationId,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Client secret; never printed by `Debug`.
	pub client_secret: Option<String>,
	/// Token endpoint the grant is exchanged against.
	pub token_endpoint: Url,
	/// Scopes requested with every exchange; empty means "server default".
	pub scopes: Vec<String>,
	/// Client authentication method at the token endpoint.
	pub client_auth_method: ClientAuthMethod,
	/// Lifetime assumed when the token endpoint omits `expires_in`.
	pub default_token_lifetime: Duration,
	/// Tokens expiring within this window are refreshed before use.
	pub clock_skew: Duration,
}
impl ClientRegistration {
	/// Lifetime assumed when the token response has no `expires_in`.
	pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::minutes(5);
	/// Default refresh window ahead of expiry.
	pub const DEFAULT_CLOCK_SKEW: Duration = Duration::seconds(60);

	/// Creates a new builder for the provided registration name.
	pub fn builder(id: RegistrationId) -> ClientRegistrationBuilder {
		ClientRegistrationBuilder::new(id)
	}
}
impl Debug for ClientRegistration {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientRegistration")
			.field("id", &self.id)
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("token_endpoint", &self.token_endpoint.as_str())
			.field("scopes", &self.scopes)
			.field("client_auth_method", &self.client_auth_method)
			.field("default_token_lifetime", &self.default_token_lifetime)
			.field("clock_skew", &self.clock_skew)
			.finish()
	}
}

/// Serialized form of [`ClientRegistration`]; durations are whole seconds.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RegistrationSettings {
	id: RegistrationId,
	client_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	client_secret: Option<String>,
	token_uri: Url,
	#[serde(default)]
	scopes: Vec<String>,
	#[serde(default)]
	client_authentication_method: ClientAuthMethod,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	default_token_lifetime_secs: Option<i64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	clock_skew_secs: Option<i64>,
}
impl TryFrom<RegistrationSettings> for ClientRegistration {
	type Error = RegistrationError;

	fn try_from(settings: RegistrationSettings) -> Result<Self, Self::Error> {
		let mut builder = ClientRegistration::builder(settings.id)
			.client_id(settings.client_id)
			.token_endpoint(settings.token_uri)
			.scopes(settings.scopes)
			.client_auth_method(settings.client_authentication_method);

		if let Some(secret) = settings.client_secret {
			builder = builder.client_secret(secret);
		}
		if let Some(secs) = settings.default_token_lifetime_secs {
			builder = builder.default_token_lifetime(Duration::seconds(secs));
		}
		if let Some(secs) = settings.clock_skew_secs {
			builder = builder.clock_skew(Duration::seconds(secs));
		}

		builder.build()
	}
}
impl From<ClientRegistration> for RegistrationSettings {
	fn from(registration: ClientRegistration) -> Self {
		Self {
			id: registration.id,
			client_id: registration.client_id,
			client_secret: registration.client_secret,
			token_uri: registration.token_endpoint,
			scopes: registration.scopes,
			client_authentication_method: registration.client_auth_method,
			default_token_lifetime_secs: Some(registration.default_token_lifetime.whole_seconds()),
			clock_skew_secs: Some(registration.clock_skew.whole_seconds()),
		}
	}
}
