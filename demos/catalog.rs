//! Walks through the catalog operations against an in-process mock authorization server and
//! catalog API, authenticating with the client-credentials grant.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use rust_decimal::Decimal;
use url::Url;
use uuid::Uuid;
// self
use beer_client::{
	auth::RegistrationId,
	client::BeerClient,
	http::ReqwestHttpClient,
	model::{BeerRecord, BeerStyle, ListBeersQuery},
	oauth::ReqwestTransportErrorMapper,
	registration::ClientRegistration,
	reqwest::Client,
	token::ReqwestTokenProvider,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let auth_server = MockServer::start_async().await;
	let catalog = MockServer::start_async().await;
	let id = Uuid::new_v4();
	let location = format!("/api/v1/beer/{id}");
	let stored = serde_json::json!({
		"id": id,
		"version": 0,
		"beerName": "Mango Monny",
		"beerStyle": "GOSE",
		"upc": "123245",
		"quantityOnHand": 500,
		"price": 10.99
	});
	let token_mock = auth_server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":300}",
			);
		})
		.await;

	catalog
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/beer").header("authorization", "Bearer demo-access");
			then.status(201).header("location", &location);
		})
		.await;
	catalog
		.mock_async(|when, then| {
			when.method(GET).path(&location);
			then.status(200).json_body(stored.clone());
		})
		.await;
	catalog
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/beer").query_param("beerStyle", "GOSE");
			then.status(200).json_body(serde_json::json!({
				"content": [stored.clone()],
				"number": 0,
				"size": 25,
				"totalElements": 1
			}));
		})
		.await;
	catalog
		.mock_async(|when, then| {
			when.method(DELETE).path(&location);
			then.status(204);
		})
		.await;

	let registration = ClientRegistration::builder(RegistrationId::new("springauth")?)
		.client_id("messaging-client")
		.client_secret("secret")
		.token_endpoint(Url::parse(&auth_server.url("/oauth2/token"))?)
		.scopes(["message.read", "message.write"])
		.build()?;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let tokens = Arc::new(ReqwestTokenProvider::with_http_client(
		registration,
		http_client.clone(),
		ReqwestTransportErrorMapper,
	));
	let client = BeerClient::new(Url::parse(&catalog.base_url())?, http_client, tokens)?;
	let draft = BeerRecord::builder()
		.beer_name("Mango Monny")
		.beer_style(BeerStyle::Gose)
		.price(Decimal::new(1099, 2))
		.quantity_on_hand(500)
		.upc("123245")
		.build()?;
	let created = client.create_beer(&draft).await?;

	println!("Created {} with id {:?}.", created.beer_name, created.id);

	let page = client.list_beers_with(&ListBeersQuery::new().beer_style(BeerStyle::Gose)).await?;

	for beer in &page {
		println!("Listed {} ({}) at {}.", beer.beer_name, beer.beer_style, beer.price);
	}

	client.delete_beer(id).await?;

	println!("Deleted {id}.");

	token_mock.assert_calls_async(1).await;

	Ok(())
}
