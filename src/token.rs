//! Bearer token sources: the caching client-credentials provider and a fixed-token source.
//!
//! [`TokenProvider`] keeps the last issued [`AccessToken`] in memory and hands it out until it
//! is about to expire. Refreshes are single-flight: the first caller that finds the cache stale
//! takes the refresh lock and contacts the token endpoint, later callers wait on the same lock
//! and then reuse the freshly cached token.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenSecret},
	http::{ReqwestHttpClient, TokenHttpClient},
	oauth::{self, ReqwestTransportErrorMapper, TransportErrorMapper},
	obs::{self, OperationKind},
	registration::ClientRegistration,
};

/// Boxed future returned by [`AccessTokenSource::access_token`].
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<TokenSecret>> + 'a + Send>>;

/// Anything able to produce the bearer token attached to outgoing requests.
pub trait AccessTokenSource
where
	Self: Send + Sync,
{
	/// Returns a currently valid token, acquiring one if needed.
	fn access_token(&self) -> TokenFuture<'_>;

	/// Drops any cached token so the next call acquires a new one.
	///
	/// The default implementation does nothing, which suits sources without a cache.
	fn invalidate(&self) {}
}

/// Token provider specialized for the crate's default reqwest transport stack.
pub type ReqwestTokenProvider = TokenProvider<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Caching client-credentials token provider.
pub struct TokenProvider<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	registration: ClientRegistration,
	http_client: Arc<C>,
	transport_mapper: Arc<M>,
	cache: RwLock<Option<AccessToken>>,
	refresh_guard: AsyncMutex<()>,
}
impl<C, M> TokenProvider<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a provider that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		registration: ClientRegistration,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			registration,
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			cache: RwLock::new(None),
			refresh_guard: AsyncMutex::new(()),
		}
	}

	/// Registration the provider exchanges credentials for.
	pub fn registration(&self) -> &ClientRegistration {
		&self.registration
	}

	/// Returns the cached token without contacting the token endpoint.
	pub fn cached(&self) -> Option<AccessToken> {
		self.cache.read().clone()
	}

	/// Drops the cached token.
	pub fn invalidate(&self) {
		self.cache.write().take();
	}

	/// Returns a valid token, performing the client-credentials grant when the cache is empty
	/// or the cached token expires within the registration's clock skew.
	pub async fn token(&self) -> Result<AccessToken> {
		if let Some(token) = self.fresh_cached(OffsetDateTime::now_utc()) {
			return Ok(token);
		}

		let _singleflight = self.refresh_guard.lock().await;

		// Another caller may have refreshed while this one waited on the guard.
		if let Some(token) = self.fresh_cached(OffsetDateTime::now_utc()) {
			return Ok(token);
		}

		let token = obs::observe(
			OperationKind::Token,
			"client_credentials",
			oauth::exchange_client_credentials(
				&self.registration,
				self.http_client.as_ref(),
				self.transport_mapper.as_ref(),
			),
		)
		.await?;

		*self.cache.write() = Some(token.clone());

		Ok(token)
	}

	fn fresh_cached(&self, now: OffsetDateTime) -> Option<AccessToken> {
		self.cache
			.read()
			.as_ref()
			.filter(|token| !token.expires_within(self.registration.clock_skew, now))
			.cloned()
	}
}
impl TokenProvider<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a provider backed by a default reqwest client.
	pub fn new(registration: ClientRegistration) -> Self {
		Self::with_http_client(
			registration,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> AccessTokenSource for TokenProvider<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn access_token(&self) -> TokenFuture<'_> {
		Box::pin(async move { self.token().await.map(|token| token.value) })
	}

	fn invalidate(&self) {
		TokenProvider::invalidate(self);
	}
}
impl<C, M> Debug for TokenProvider<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenProvider")
			.field("registration", &self.registration)
			.field("cached", &self.cache.read().is_some())
			.finish()
	}
}

/// Source that always returns the same pre-provisioned token.
#[derive(Clone, Debug)]
pub struct StaticTokenSource(TokenSecret);
impl StaticTokenSource {
	/// Wraps a fixed token value.
	pub fn new(token: impl Into<String>) -> Self {
		Self(TokenSecret::new(token))
	}
}
impl AccessTokenSource for StaticTokenSource {
	fn access_token(&self) -> TokenFuture<'_> {
		let token = self.0.clone();

		Box::pin(async move { Ok(token) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::RegistrationId;

	fn provider() -> ReqwestTokenProvider {
		let registration = ClientRegistration::builder(
			RegistrationId::new("springauth").expect("Registration fixture should be valid."),
		)
		.client_id("messaging-client")
		.client_secret("secret")
		.token_endpoint(
			Url::parse("http://127.0.0.1:9/oauth2/token").expect("Token URL should parse."),
		)
		.build()
		.expect("Registration fixture should build.");

		TokenProvider::new(registration)
	}

	fn seeded(provider: &ReqwestTokenProvider, lifetime: Duration) {
		let token = AccessToken::builder(provider.registration().id.clone())
			.value("seeded")
			.expires_in(lifetime)
			.build()
			.expect("Seed token should build.");

		*provider.cache.write() = Some(token);
	}

	#[tokio::test]
	async fn fresh_cached_token_is_served_without_network() {
		let provider = provider();

		seeded(&provider, Duration::hours(1));

		let token = provider.access_token().await.expect("Cached token should be served.");

		assert_eq!(token.expose(), "seeded");
	}

	#[test]
	fn tokens_inside_the_skew_window_are_stale() {
		let provider = provider();

		seeded(&provider, Duration::seconds(30));

		assert!(provider.cached().is_some());
		assert!(provider.fresh_cached(OffsetDateTime::now_utc()).is_none());
	}

	#[test]
	fn invalidate_clears_the_cache() {
		let provider = provider();

		seeded(&provider, Duration::hours(1));
		AccessTokenSource::invalidate(&provider);

		assert!(provider.cached().is_none());
	}

	#[tokio::test]
	async fn static_source_returns_its_token() {
		let source = StaticTokenSource::new("test");
		let token = source.access_token().await.expect("Static token should resolve.");

		assert_eq!(token.expose(), "test");
	}
}
