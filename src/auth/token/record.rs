//! Access token records issued by the client-credentials grant.

// self
use crate::{
	_prelude::*,
	auth::{RegistrationId, token::secret::TokenSecret},
};

/// Errors produced by [`AccessTokenBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum AccessTokenBuilderError {
	/// Issued when no access token value was provided.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// Issued when no expiry (absolute or relative) was configured.
	#[error("Expiry must be supplied via expires_at or expires_in.")]
	MissingExpiry,
}

/// Bearer token plus the lifetime bounds used by the token cache.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessToken {
	/// Registration that minted the token.
	pub registration: RegistrationId,
	/// Token value; callers must avoid logging it.
	pub value: TokenSecret,
	/// Scopes granted by the authorization server (may differ from the requested ones).
	pub scopes: Vec<String>,
	/// Issued-at instant recorded when the token endpoint answered.
	pub issued_at: OffsetDateTime,
	/// Expiry instant derived from issued_at plus expires_in.
	pub expires_at: OffsetDateTime,
}
impl AccessToken {
	/// Returns a builder for the given registration.
	pub fn builder(registration: RegistrationId) -> AccessTokenBuilder {
		AccessTokenBuilder::new(registration)
	}

	/// Returns `true` once `instant` reaches the expiry instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}

	/// Returns `true` if the token expires within `window` of `instant`.
	///
	/// Tokens that are about to lapse are treated as stale so a request never leaves with a
	/// credential the server will reject mid-flight.
	pub fn expires_within(&self, window: Duration, instant: OffsetDateTime) -> bool {
		self.is_expired_at(instant) || self.expires_at - instant <= window
	}

	/// Remaining lifetime relative to `instant`, clamped at zero.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - instant;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("registration", &self.registration)
			.field("value", &"<redacted>")
			.field("scopes", &self.scopes)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder for [`AccessToken`].
#[derive(Clone, Debug)]
pub struct AccessTokenBuilder {
	registration: RegistrationId,
	value: Option<TokenSecret>,
	scopes: Vec<String>,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
}
impl AccessTokenBuilder {
	fn new(registration: RegistrationId) -> Self {
		Self {
			registration,
			value: None,
			scopes: Vec::new(),
			issued_at: None,
			expires_at: None,
			expires_in: None,
		}
	}

	/// Provides the access token value.
	pub fn value(mut self, token: impl Into<String>) -> Self {
		self.value = Some(TokenSecret::new(token));

		self
	}

	/// Records the granted scopes.
	pub fn scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Sets the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry duration from the issued instant.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Consumes the builder and produces an [`AccessToken`].
	pub fn build(self) -> Result<AccessToken, AccessTokenBuilderError> {
		let value = self.value.ok_or(AccessTokenBuilderError::MissingAccessToken)?;
		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let expires_at = match (self.expires_at, self.expires_in) {
			(Some(instant), _) => instant,
			(None, Some(delta)) => issued_at + delta,
			(None, None) => return Err(AccessTokenBuilderError::MissingExpiry),
		};

		Ok(AccessToken {
			registration: self.registration,
			value,
			scopes: self.scopes,
			issued_at,
			expires_at,
		})
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn registration() -> RegistrationId {
		RegistrationId::new("springauth").expect("Registration fixture should be valid.")
	}

	#[test]
	fn builder_handles_relative_expiry() {
		let token = AccessToken::builder(registration())
			.value("secret")
			.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
			.expires_in(Duration::minutes(30))
			.build()
			.expect("Builder should support relative expiry calculations.");

		assert_eq!(token.expires_at, macros::datetime!(2025-01-01 00:30 UTC));
		assert_eq!(
			token.remaining_at(macros::datetime!(2025-01-01 00:20 UTC)),
			Duration::minutes(10)
		);
		assert_eq!(token.remaining_at(macros::datetime!(2025-01-02 00:00 UTC)), Duration::ZERO);
	}

	#[test]
	fn builder_requires_value_and_expiry() {
		assert_eq!(
			AccessToken::builder(registration()).expires_in(Duration::minutes(1)).build().err(),
			Some(AccessTokenBuilderError::MissingAccessToken)
		);
		assert_eq!(
			AccessToken::builder(registration()).value("v").build().err(),
			Some(AccessTokenBuilderError::MissingExpiry)
		);
	}

	#[test]
	fn staleness_honors_the_skew_window() {
		let token = AccessToken::builder(registration())
			.value("secret")
			.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
			.expires_at(macros::datetime!(2025-01-01 01:00 UTC))
			.build()
			.expect("Token fixture should build.");
		let window = Duration::seconds(60);

		assert!(!token.expires_within(window, macros::datetime!(2025-01-01 00:30 UTC)));
		assert!(token.expires_within(window, macros::datetime!(2025-01-01 00:59:30 UTC)));
		assert!(token.is_expired_at(macros::datetime!(2025-01-01 01:00 UTC)));
		assert!(format!("{token:?}").contains("<redacted>"));
	}
}
