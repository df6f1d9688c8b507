//! Catalog operations against `/api/v1/beer`.
//!
//! Every call is one authenticated HTTP exchange through [`AuthInterceptor`]; create and update
//! add a follow-up GET so callers always receive the server's view of the record. Nothing is
//! cached or retried here, and failures surface immediately.

// crates.io
use reqwest::{
	Method, RequestBuilder, Response,
	header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, LOCATION},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	config::{self, ClientConfig},
	error::{ConfigError, DecodeError, TransportError, truncate_preview},
	http::ReqwestHttpClient,
	interceptor::AuthInterceptor,
	model::{BeerRecord, ListBeersQuery, Page},
	obs::{self, OperationKind},
	oauth::ReqwestTransportErrorMapper,
	token::{AccessTokenSource, ReqwestTokenProvider},
};

/// Collection path, relative to the base URL.
pub const BEER_PATH: &str = "api/v1/beer";

const APPLICATION_JSON: &str = "application/json";

/// Typed client for the beer catalog.
///
/// Cloning is cheap; clones share the transport and token cache.
#[derive(Clone, Debug)]
pub struct BeerClient {
	base_url: Url,
	interceptor: AuthInterceptor,
}
impl BeerClient {
	/// Builds a client from configuration, with a default reqwest transport and a caching
	/// client-credentials token provider.
	pub fn from_config(config: ClientConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::default();
		let tokens = Arc::new(ReqwestTokenProvider::with_http_client(
			config.registration,
			http_client.clone(),
			ReqwestTransportErrorMapper,
		));

		Self::new(config.base_url, http_client, tokens)
	}

	/// Builds a client from explicit parts.
	pub fn new(
		base_url: Url,
		http_client: ReqwestHttpClient,
		tokens: Arc<dyn AccessTokenSource>,
	) -> Result<Self> {
		let base_url = config::normalize_base_url(base_url)?;

		Ok(Self { base_url, interceptor: AuthInterceptor::new(http_client, tokens) })
	}

	/// Builds a client around an existing interceptor.
	///
	/// `base_url` should already be normalized; a missing trailing slash is added when possible.
	pub fn with_interceptor(base_url: Url, interceptor: AuthInterceptor) -> Self {
		let base_url = config::normalize_base_url(base_url.clone()).unwrap_or(base_url);

		Self { base_url, interceptor }
	}

	/// Catalog root every path is resolved against.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// URL of the beer collection.
	pub fn beer_url(&self) -> Result<Url> {
		self.base_url.join(BEER_PATH).map_err(|e| ConfigError::from(e).into())
	}

	/// URL of a single beer.
	pub fn beer_id_url(&self, id: Uuid) -> Result<Url> {
		self.base_url.join(&format!("{BEER_PATH}/{id}")).map_err(|e| ConfigError::from(e).into())
	}

	/// Fetches one record.
	pub async fn get_beer_by_id(&self, id: Uuid) -> Result<BeerRecord> {
		obs::observe(OperationKind::GetBeer, "get_beer_by_id", async move {
			let url = self.beer_id_url(id)?;

			self.fetch(url).await
		})
		.await
	}

	/// Creates a record and returns it as stored by the server.
	///
	/// The server answers with a `Location` header and no body; the record is then fetched from
	/// that location. Any identifier already on `record` is not sent.
	pub async fn create_beer(&self, record: &BeerRecord) -> Result<BeerRecord> {
		obs::observe(OperationKind::CreateBeer, "create_beer", async move {
			let url = self.beer_url()?;
			let body = record.for_create();
			let request = self.json_request(Method::POST, url.clone(), &body)?;
			let response = self.send(request, &url).await?;
			let location = resolve_location(&url, response.headers())?;

			self.follow_up(OperationKind::CreateBeer, location).await
		})
		.await
	}

	/// Replaces a record and returns the server's current state.
	///
	/// `record.id` must be set.
	pub async fn update_beer(&self, record: &BeerRecord) -> Result<BeerRecord> {
		obs::observe(OperationKind::UpdateBeer, "update_beer", async move {
			let id = record
				.id
				.ok_or_else(|| Error::invalid_request("a record without an id cannot be updated"))?;
			let url = self.beer_id_url(id)?;
			let request = self.json_request(Method::PUT, url.clone(), record)?;

			self.send(request, &url).await?;
			self.follow_up(OperationKind::UpdateBeer, url).await
		})
		.await
	}

	/// Deletes a record. A missing record fails with [`Error::NotFound`].
	pub async fn delete_beer(&self, id: Uuid) -> Result<()> {
		obs::observe(OperationKind::DeleteBeer, "delete_beer", async move {
			let url = self.beer_id_url(id)?;
			let request = self.request(Method::DELETE, url.clone());

			self.send(request, &url).await.map(drop)
		})
		.await
	}

	/// Lists the first page using the server's defaults.
	pub async fn list_beers(&self) -> Result<Page<BeerRecord>> {
		self.list_beers_with(&ListBeersQuery::default()).await
	}

	/// Lists a page, sending only the filters set on `query`.
	pub async fn list_beers_with(&self, query: &ListBeersQuery) -> Result<Page<BeerRecord>> {
		obs::observe(OperationKind::ListBeers, "list_beers", async move {
			let mut url = self.beer_url()?;

			query.apply_to(&mut url);

			self.fetch(url).await
		})
		.await
	}

	fn request(&self, method: Method, url: Url) -> RequestBuilder {
		self.interceptor
			.http_client()
			.request(method, url)
			.header(ACCEPT, HeaderValue::from_static(APPLICATION_JSON))
	}

	fn json_request<T>(&self, method: Method, url: Url, body: &T) -> Result<RequestBuilder>
	where
		T: Serialize,
	{
		let bytes = serde_json::to_vec(body)
			.map_err(|e| Error::invalid_request(format!("request body cannot be encoded: {e}")))?;

		Ok(self
			.request(method, url)
			.header(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))
			.body(bytes))
	}

	async fn fetch<T>(&self, url: Url) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let request = self.request(Method::GET, url.clone());
		let response = self.send(request, &url).await?;
		let bytes = response.bytes().await.map_err(TransportError::from)?;

		decode_json(&url, &bytes)
	}

	async fn follow_up(&self, operation: OperationKind, location: Url) -> Result<BeerRecord> {
		self.fetch(location.clone()).await.map_err(|source| Error::FollowUp {
			operation,
			location: location.to_string(),
			source: Box::new(source),
		})
	}

	async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response> {
		let request = request.build().map_err(ConfigError::from)?;
		let response = self.interceptor.execute(request).await?;
		let status = response.status();

		if status.is_success() {
			return Ok(response);
		}

		let body = response.text().await.ok();

		Err(Error::from_status(status.as_u16(), url, body))
	}
}

fn decode_json<T>(url: &Url, bytes: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let de = &mut serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(de).map_err(|source| {
		DecodeError::Json {
			url: url.to_string(),
			source,
			body: Some(truncate_preview(String::from_utf8_lossy(bytes).into_owned())),
		}
		.into()
	})
}

/// Resolves the `Location` header of a create response against the request URL.
fn resolve_location(request_url: &Url, headers: &HeaderMap) -> Result<Url> {
	let raw = headers
		.get(LOCATION)
		.ok_or_else(|| DecodeError::MissingLocation { url: request_url.to_string() })?;
	let location = raw.to_str().map_err(|_| DecodeError::InvalidLocation {
		location: String::from_utf8_lossy(raw.as_bytes()).into_owned(),
	})?;

	request_url
		.join(location)
		.map_err(|_| DecodeError::InvalidLocation { location: location.to_owned() }.into())
}
