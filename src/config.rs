//! Client configuration: where the catalog lives and how to authenticate against it.
//!
//! Configuration can be assembled in code or deserialized from JSON:
//!
//! ```json
//! {
//!   "base-url": "http://localhost:8080",
//!   "registration": {
//!     "id": "springauth",
//!     "client-id": "messaging-client",
//!     "client-secret": "secret",
//!     "token-uri": "http://localhost:9000/oauth2/token",
//!     "scopes": ["message.read", "message.write"]
//!   }
//! }
//! ```

// self
use crate::{_prelude::*, error::ConfigError, registration::ClientRegistration};

/// Catalog root used by a locally running service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
/// Registration name the catalog's authorization server is configured with.
pub const DEFAULT_REGISTRATION_ID: &str = "springauth";

/// Settings required to build a [`BeerClient`](crate::client::BeerClient).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
	/// Catalog service root; API paths are resolved beneath it.
	#[serde(deserialize_with = "deserialize_base_url")]
	pub base_url: Url,
	/// OAuth 2.0 client registration.
	pub registration: ClientRegistration,
}
impl ClientConfig {
	/// Creates a configuration after normalizing `base_url`.
	pub fn new(base_url: Url, registration: ClientRegistration) -> Result<Self> {
		Ok(Self { base_url: normalize_base_url(base_url)?, registration })
	}

	/// Creates a configuration pointing at [`DEFAULT_BASE_URL`].
	pub fn local(registration: ClientRegistration) -> Result<Self> {
		let base_url = Url::parse(DEFAULT_BASE_URL).map_err(ConfigError::from)?;

		Self::new(base_url, registration)
	}

	/// Parses a JSON document.
	pub fn from_json_str(raw: &str) -> Result<Self> {
		let de = &mut serde_json::Deserializer::from_str(raw);

		serde_path_to_error::deserialize(de).map_err(|source| ConfigError::Parse { source }.into())
	}

	/// Parses a JSON document from bytes.
	pub fn from_json_slice(raw: &[u8]) -> Result<Self> {
		let de = &mut serde_json::Deserializer::from_slice(raw);

		serde_path_to_error::deserialize(de).map_err(|source| ConfigError::Parse { source }.into())
	}
}

/// Ensures `url` can act as a base and that its path ends in `/`, so joining relative API
/// paths keeps any prefix (`http://host/catalog` + `api/v1/beer` → `/catalog/api/v1/beer`).
pub fn normalize_base_url(mut url: Url) -> Result<Url, ConfigError> {
	if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
		return Err(ConfigError::InvalidBaseUrl { url: url.to_string() });
	}
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	url.set_query(None);
	url.set_fragment(None);

	Ok(url)
}

fn deserialize_base_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let url = Url::deserialize(deserializer)?;

	normalize_base_url(url).map_err(serde::de::Error::custom)
}
