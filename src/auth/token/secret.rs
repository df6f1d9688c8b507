//! Bearer token secret wrapper that keeps credentials out of logs.

// crates.io
use reqwest::header::{HeaderValue, InvalidHeaderValue};
// self
use crate::_prelude::*;

/// Opaque access token value; formatting never reveals the credential.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw token. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Renders the `Authorization` header value (`Bearer <token>`), flagged as sensitive so
	/// HTTP-level debug output redacts it.
	pub fn bearer_header(&self) -> Result<HeaderValue, InvalidHeaderValue> {
		let mut value = HeaderValue::from_str(&format!("Bearer {}", self.0))?;

		value.set_sensitive(true);

		Ok(value)
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn formatters_redact_and_header_is_sensitive() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");

		let header = secret.bearer_header().expect("Plain ASCII tokens should form a header.");

		assert!(header.is_sensitive());
		assert_eq!(header.to_str().expect("Header should be visible ASCII."), "Bearer super-secret");
	}

	#[test]
	fn control_characters_cannot_reach_the_header() {
		assert!(TokenSecret::new("bad\ntoken").bearer_header().is_err());
	}
}
