//! Typed async client for the beer catalog REST API.
//!
//! [`client::BeerClient`] covers create, read, update, delete, and paginated listing over HTTP.
//! Every request passes through [`interceptor::AuthInterceptor`], which attaches an OAuth 2.0
//! client-credentials bearer token obtained and cached by [`token::TokenProvider`].

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod interceptor;
pub mod model;
pub mod oauth;
pub mod obs;
pub mod registration;
pub mod token;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::RegistrationId,
		client::BeerClient,
		config::DEFAULT_REGISTRATION_ID,
		http::ReqwestHttpClient,
		interceptor::AuthInterceptor,
		model::{BeerRecord, BeerStyle},
		oauth::ReqwestTransportErrorMapper,
		registration::{ClientAuthMethod, ClientRegistration},
		token::{AccessTokenSource, StaticTokenSource, TokenProvider},
	};

	/// Token provider type alias used by reqwest-backed integration tests.
	pub type ReqwestTestTokenProvider = TokenProvider<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Client identifier registered with the mock authorization server.
	pub const TEST_CLIENT_ID: &str = "messaging-client";
	/// Client secret registered with the mock authorization server.
	pub const TEST_CLIENT_SECRET: &str = "secret";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Registration pointing at a mock token endpoint.
	pub fn test_registration(token_endpoint: &str) -> ClientRegistration {
		let id = RegistrationId::new(DEFAULT_REGISTRATION_ID)
			.expect("Registration identifier should be valid.");

		ClientRegistration::builder(id)
			.client_id(TEST_CLIENT_ID)
			.client_secret(TEST_CLIENT_SECRET)
			.token_endpoint(Url::parse(token_endpoint).expect("Mock token endpoint should parse."))
			.scopes(["message.read", "message.write"])
			.client_auth_method(ClientAuthMethod::ClientSecretBasic)
			.build()
			.expect("Test registration should build successfully.")
	}

	/// Builds a token provider backed by the insecure reqwest transport.
	pub fn build_test_token_provider(token_endpoint: &str) -> Arc<ReqwestTestTokenProvider> {
		Arc::new(ReqwestTestTokenProvider::with_http_client(
			test_registration(token_endpoint),
			test_reqwest_http_client(),
			ReqwestTransportErrorMapper,
		))
	}

	/// Builds a [`BeerClient`] that talks to `base_url` and authenticates through `tokens`.
	pub fn build_test_client(base_url: &str, tokens: Arc<dyn AccessTokenSource>) -> BeerClient {
		let base_url = Url::parse(base_url).expect("Mock catalog base URL should parse.");
		let interceptor = AuthInterceptor::new(test_reqwest_http_client(), tokens);

		BeerClient::with_interceptor(base_url, interceptor)
	}

	/// Builds a [`BeerClient`] that always sends `Bearer test`.
	pub fn build_static_test_client(base_url: &str) -> BeerClient {
		build_test_client(base_url, Arc::new(StaticTokenSource::new("test")))
	}

	/// Record fixture without an identifier, ready for creation.
	pub fn new_beer_fixture() -> BeerRecord {
		BeerRecord::builder()
			.beer_name("Mango Monny")
			.beer_style(BeerStyle::Gose)
			.price(Decimal::new(1099, 2))
			.quantity_on_hand(500)
			.upc("123245")
			.build()
			.expect("Beer fixture should build successfully.")
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use rust_decimal::Decimal;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;
	pub use uuid::Uuid;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use rust_decimal;
pub use url;
pub use uuid;
#[cfg(test)] use {color_eyre as _, httpmock as _};
