// self
use crate::{
	_prelude::*,
	auth::RegistrationId,
	registration::{ClientAuthMethod, ClientRegistration},
};

/// Errors raised while constructing or validating registrations.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum RegistrationError {
	/// Token endpoint is mandatory.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Client identifier is mandatory.
	#[error("Missing client identifier.")]
	MissingClientId,
	/// Endpoints must be reachable over HTTP(S).
	#[error("The token endpoint must use http or https: {url}.")]
	UnsupportedScheme {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Secret-based authentication without a secret.
	#[error("The {method} authentication method requires a client secret.")]
	MissingClientSecret {
		/// Configured method.
		method: ClientAuthMethod,
	},
	/// Scope entries must be non-empty tokens without whitespace.
	#[error("Scope `{scope}` is invalid.")]
	InvalidScope {
		/// Offending scope entry.
		scope: String,
	},
	/// Default token lifetime must be positive.
	#[error("Default token lifetime must be positive.")]
	NonPositiveLifetime,
	/// Clock skew cannot be negative.
	#[error("Clock skew cannot be negative.")]
	NegativeClockSkew,
}

/// Builder for [`ClientRegistration`] values.
#[derive(Debug)]
pub struct ClientRegistrationBuilder {
	id: RegistrationId,
	client_id: Option<String>,
	client_secret: Option<String>,
	token_endpoint: Option<Url>,
	scopes: Vec<String>,
	client_auth_method: ClientAuthMethod,
	default_token_lifetime: Duration,
	clock_skew: Duration,
}
impl ClientRegistrationBuilder {
	/// Creates a new builder seeded with the provided registration name.
	pub fn new(id: RegistrationId) -> Self {
		Self {
			id,
			client_id: None,
			client_secret: None,
			token_endpoint: None,
			scopes: Vec::new(),
			client_auth_method: ClientAuthMethod::default(),
			default_token_lifetime: ClientRegistration::DEFAULT_TOKEN_LIFETIME,
			clock_skew: ClientRegistration::DEFAULT_CLOCK_SKEW,
		}
	}

	/// Sets the OAuth 2.0 client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Adds a single requested scope.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scopes.push(scope.into());

		self
	}

	/// Replaces the requested scopes.
	pub fn scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Overrides the client authentication method.
	pub fn client_auth_method(mut self, method: ClientAuthMethod) -> Self {
		self.client_auth_method = method;

		self
	}

	/// Overrides the lifetime assumed for responses without `expires_in` (defaults to 5 minutes).
	pub fn default_token_lifetime(mut self, lifetime: Duration) -> Self {
		self.default_token_lifetime = lifetime;

		self
	}

	/// Overrides the refresh window ahead of expiry (defaults to 60 seconds).
	pub fn clock_skew(mut self, skew: Duration) -> Self {
		self.clock_skew = skew;

		self
	}

	/// Consumes the builder and validates the resulting registration.
	pub fn build(self) -> Result<ClientRegistration, RegistrationError> {
		let client_id = self
			.client_id
			.filter(|value| !value.trim().is_empty())
			.ok_or(RegistrationError::MissingClientId)?;
		let token_endpoint = self.token_endpoint.ok_or(RegistrationError::MissingTokenEndpoint)?;
		let mut scopes = Vec::with_capacity(self.scopes.len());

		for scope in self.scopes {
			if scope.is_empty() || scope.chars().any(char::is_whitespace) {
				return Err(RegistrationError::InvalidScope { scope });
			}
			if !scopes.contains(&scope) {
				scopes.push(scope);
			}
		}

		let registration = ClientRegistration {
			id: self.id,
			client_id,
			client_secret: self.client_secret,
			token_endpoint,
			scopes,
			client_auth_method: self.client_auth_method,
			default_token_lifetime: self.default_token_lifetime,
			clock_skew: self.clock_skew,
		};

		registration.validate()?;

		Ok(registration)
	}
}

impl ClientRegistration {
	fn validate(&self) -> Result<(), RegistrationError> {
		if !matches!(self.token_endpoint.scheme(), "http" | "https") {
			return Err(RegistrationError::UnsupportedScheme {
				url: self.token_endpoint.to_string(),
			});
		}
		if self.client_secret.as_deref().is_none_or(str::is_empty) {
			return Err(RegistrationError::MissingClientSecret { method: self.client_auth_method });
		}
		if !self.default_token_lifetime.is_positive() {
			return Err(RegistrationError::NonPositiveLifetime);
		}
		if self.clock_skew.is_negative() {
			return Err(RegistrationError::NegativeClockSkew);
		}

		Ok(())
	}
}
