// crates.io
use httpmock::prelude::*;
// self
use beer_client::{
	_preludet::*,
	error::{AuthError, DecodeError},
	model::{BeerRecord, BeerStyle, ListBeersQuery},
	obs::OperationKind,
};

const BEER_PATH: &str = "/api/v1/beer";

fn beer_json(id: Uuid, name: &str) -> serde_json::Value {
	serde_json::json!({
		"id": id,
		"version": 0,
		"beerName": name,
		"beerStyle": "GOSE",
		"upc": "123245",
		"quantityOnHand": 500,
		"price": 10.99,
		"createdDate": "2024-04-01T10:00:00",
		"updateDate": "2024-04-01T10:00:00"
	})
}

fn page_json(content: Vec<serde_json::Value>) -> serde_json::Value {
	let total = content.len();

	serde_json::json!({
		"content": content,
		"number": 0,
		"size": 25,
		"totalElements": total,
		"totalPages": 1,
		"first": true,
		"last": true
	})
}

fn assert_same_beer(actual: &BeerRecord, expected: &BeerRecord) {
	assert_eq!(actual.beer_name, expected.beer_name);
	assert_eq!(actual.beer_style, expected.beer_style);
	assert_eq!(actual.price, expected.price);
	assert_eq!(actual.quantity_on_hand, expected.quantity_on_hand);
	assert_eq!(actual.upc, expected.upc);
}

#[tokio::test]
async fn get_beer_by_id_sends_bearer_and_decodes() {
	let server = MockServer::start_async().await;
	let client = build_static_test_client(&server.base_url());
	let id = Uuid::new_v4();
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(format!("{BEER_PATH}/{id}"))
				.header("authorization", "Bearer test")
				.header("accept", "application/json");
			then.status(200).json_body(beer_json(id, "Mango Bobs"));
		})
		.await;
	let beer = client.get_beer_by_id(id).await.expect("Existing beer should be fetched.");

	assert_eq!(beer.id, Some(id));
	assert_eq!(beer.beer_name, "Mango Bobs");
	assert_eq!(beer.beer_style, BeerStyle::Gose);
	assert_eq!(beer.price, Decimal::new(1099, 2));
	assert_eq!(beer.quantity_on_hand, Some(500));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn get_beer_by_id_maps_missing_record_to_not_found() {
	let server = MockServer::start_async().await;
	let client = build_static_test_client(&server.base_url());
	let id = Uuid::new_v4();

	server
		.mock_async(|when, then| {
			when.method(GET).path(format!("{BEER_PATH}/{id}"));
			then.status(404);
		})
		.await;

	let err = client.get_beer_by_id(id).await.expect_err("Missing beer should fail.");

	assert!(err.is_not_found());
	assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn create_beer_follows_location_header() {
	let server = MockServer::start_async().await;
	let client = build_static_test_client(&server.base_url());
	let id = Uuid::new_v4();
	let location = format!("{BEER_PATH}/{id}");
	let create = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(BEER_PATH)
				.header("authorization", "Bearer test")
				.header("content-type", "application/json")
				.body_includes("\"beerName\":\"Mango Monny\"")
				.body_includes("\"beerStyle\":\"GOSE\"")
				.body_excludes("\"id\"");
			then.status(201).header("location", &location);
		})
		.await;
	let fetch = server
		.mock_async(|when, then| {
			when.method(GET).path(&location).header("authorization", "Bearer test");
			then.status(200).json_body(beer_json(id, "Mango Monny"));
		})
		.await;
	let fixture = new_beer_fixture().with_id(Uuid::new_v4());
	let created = client.create_beer(&fixture).await.expect("Create should succeed.");

	assert_eq!(created.id, Some(id));
	assert_eq!(created.version, Some(0));
	assert_same_beer(&created, &fixture);

	let fetched = client.get_beer_by_id(id).await.expect("Created beer should be fetchable.");

	assert_eq!(fetched, created);

	create.assert_calls_async(1).await;
	fetch.assert_calls_async(2).await;
}

#[tokio::test]
async fn create_beer_accepts_202_with_absolute_location() {
	let server = MockServer::start_async().await;
	let client = build_static_test_client(&server.base_url());
	let id = Uuid::new_v4();
	let path = format!("{BEER_PATH}/{id}");
	let location = server.url(&path);
	let create = server
		.mock_async(|when, then| {
			when.method(POST).path(BEER_PATH);
			then.status(202).header("location", &location);
		})
		.await;
	let fetch = server
		.mock_async(|when, then| {
			when.method(GET).path(&path);
			then.status(200).json_body(beer_json(id, "Mango Monny"));
		})
		.await;
	let fixture = new_beer_fixture();
	let created = client.create_beer(&fixture).await.expect("Accepted create should succeed.");

	assert_eq!(created.id, Some(id));
	assert_same_beer(&created, &fixture);

	create.assert_calls_async(1).await;
	fetch.assert_calls_async(1).await;
}

#[tokio::test]
async fn create_beer_without_location_is_a_decode_error() {
	let server = MockServer::start_async().await;
	let client = build_static_test_client(&server.base_url());

	server
		.mock_async(|when, then| {
			when.method(POST).path(BEER_PATH);
			then.status(201);
		})
		.await;

	let err = client.create_beer(&new_beer_fixture()).await.expect_err("Create should fail.");

	assert!(matches!(err, Error::Decode(DecodeError::MissingLocation { .. })), "{err:?}");
}

#[tokio::test]
async fn create_beer_wraps_follow_up_failures() {
	let server = MockServer::start_async().await;
	let client = build_static_test_client(&server.base_url());
	let id = Uuid::new_v4();
	let location = format!("{BEER_PATH}/{id}");

	server
		.mock_async(|when, then| {
			when.method(POST).path(BEER_PATH);
			then.status(201).header("location", &location);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(&location);
			then.status(500).body("boom");
		})
		.await;

	let err = client.create_beer(&new_beer_fixture()).await.expect_err("Follow-up should fail.");

	match &err {
		Error::FollowUp { operation, location: fetched, source } => {
			assert_eq!(*operation, OperationKind::CreateBeer);
			assert!(fetched.ends_with(&location));
			assert!(matches!(**source, Error::Server { status: 500, .. }));
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	assert_eq!(err.status(), Some(500));
	assert_eq!(err.body(), Some("boom"));
}

#[tokio::test]
async fn update_beer_puts_then_refetches() {
	let server = MockServer::start_async().await;
	let client = build_static_test_client(&server.base_url());
	let id = Uuid::new_v4();
	let path = format!("{BEER_PATH}/{id}");
	let put = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path(&path)
				.header("authorization", "Bearer test")
				.body_includes("\"beerName\":\"Mango Bobs\"");
			then.status(204);
		})
		.await;
	let get = server
		.mock_async(|when, then| {
			when.method(GET).path(&path);
			then.status(200).json_body(beer_json(id, "Mango Bobs"));
		})
		.await;
	let record = new_beer_fixture().with_id(id).with_name("Mango Bobs");
	let updated = client.update_beer(&record).await.expect("Update should succeed.");

	assert_eq!(updated.beer_name, "Mango Bobs");
	assert_eq!(updated.id, Some(id));

	put.assert_calls_async(1).await;
	get.assert_calls_async(1).await;
}

#[tokio::test]
async fn update_beer_without_id_never_reaches_the_server() {
	let server = MockServer::start_async().await;
	let client = build_static_test_client(&server.base_url());
	let any = server
		.mock_async(|when, then| {
			when.any_request();
			then.status(204);
		})
		.await;
	let err = client.update_beer(&new_beer_fixture()).await.expect_err("Update should fail.");

	assert!(matches!(err, Error::Client { status: None, .. }), "{err:?}");

	any.assert_calls_async(0).await;
}

#[tokio::test]
async fn delete_beer_succeeds_on_no_content_and_reports_missing_records() {
	let server = MockServer::start_async().await;
	let client = build_static_test_client(&server.base_url());
	let existing = Uuid::new_v4();
	let missing = Uuid::new_v4();
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE)
				.path(format!("{BEER_PATH}/{existing}"))
				.header("authorization", "Bearer test");
			then.status(204);
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(DELETE).path(format!("{BEER_PATH}/{missing}"));
			then.status(404);
		})
		.await;

	client.delete_beer(existing).await.expect("Delete should succeed.");

	let err = client.delete_beer(missing).await.expect_err("Deleting a missing beer should fail.");

	assert!(err.is_not_found());

	delete.assert_calls_async(1).await;
}

#[tokio::test]
async fn list_beers_without_filters_sends_no_query() {
	let server = MockServer::start_async().await;
	let client = build_static_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(BEER_PATH)
				.query_param_missing("beerName")
				.query_param_missing("beerStyle")
				.query_param_missing("pageNumber")
				.query_param_missing("pageSize");
			then.status(200).json_body(page_json(vec![
				beer_json(Uuid::new_v4(), "Galaxy Cat"),
				beer_json(Uuid::new_v4(), "Crank"),
			]));
		})
		.await;
	let page = client.list_beers().await.expect("Listing should succeed.");

	assert_eq!(page.len(), 2);
	assert_eq!(page.total_elements, 2);
	assert!(page.is_first() && page.is_last());

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn list_beers_sends_only_set_filters() {
	let server = MockServer::start_async().await;
	let client = build_static_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(BEER_PATH)
				.query_param("beerStyle", "GOSE")
				.query_param("pageSize", "10")
				.query_param_missing("beerName");
			then.status(200).json_body(page_json(vec![beer_json(Uuid::new_v4(), "Mango Bobs")]));
		})
		.await;
	let query = ListBeersQuery::new().beer_style(BeerStyle::Gose).page_size(10);
	let page = client.list_beers_with(&query).await.expect("Filtered listing should succeed.");
	let names = page.iter().map(|beer: &BeerRecord| beer.beer_name.as_str()).collect::<Vec<_>>();

	assert_eq!(names, ["Mango Bobs"]);

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn list_beers_reports_malformed_bodies_with_a_path() {
	let server = MockServer::start_async().await;
	let client = build_static_test_client(&server.base_url());

	server
		.mock_async(|when, then| {
			when.method(GET).path(BEER_PATH);
			then.status(200).json_body(serde_json::json!({
				"content": [{ "beerName": "Nameless", "beerStyle": "LAMBIC", "upc": "1", "price": 1 }]
			}));
		})
		.await;

	let err = client.list_beers().await.expect_err("Unknown style should fail to decode.");

	match err {
		Error::Decode(DecodeError::Json { source, body, .. }) => {
			assert!(source.path().to_string().starts_with("content[0]"));
			assert!(body.is_some_and(|body| body.contains("LAMBIC")));
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn status_codes_map_onto_error_kinds() {
	let server = MockServer::start_async().await;
	let client = build_static_test_client(&server.base_url());
	let cases = [(400, "bad"), (401, "unauthorized"), (403, "forbidden"), (503, "down")];

	for (status, body) in cases {
		let id = Uuid::new_v4();

		server
			.mock_async(|when, then| {
				when.method(GET).path(format!("{BEER_PATH}/{id}"));
				then.status(status).body(body);
			})
			.await;

		let err = client.get_beer_by_id(id).await.expect_err("Non-success status should fail.");

		assert_eq!(err.status(), Some(status));
		assert_eq!(err.body(), Some(body));

		match status {
			400 => assert!(matches!(err, Error::Client { .. })),
			401 | 403 => assert!(matches!(err, Error::Auth(AuthError::Rejected { .. }))),
			_ => assert!(matches!(err, Error::Server { .. })),
		}
	}
}

#[tokio::test]
async fn statuses_outside_the_error_ranges_are_unexpected() {
	let server = MockServer::start_async().await;
	let client = build_static_test_client(&server.base_url());
	let id = Uuid::new_v4();

	server
		.mock_async(|when, then| {
			when.method(GET).path(format!("{BEER_PATH}/{id}"));
			then.status(304);
		})
		.await;

	let err = client.get_beer_by_id(id).await.expect_err("Not Modified should fail.");

	assert!(matches!(err, Error::UnexpectedStatus { status: 304, .. }), "{err:?}");
	assert_eq!(err.status(), Some(304));
}

#[tokio::test]
async fn base_path_prefix_is_preserved() {
	let server = MockServer::start_async().await;
	let client = build_static_test_client(&server.url("/catalog"));
	let id = Uuid::new_v4();
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/catalog{BEER_PATH}/{id}"));
			then.status(200).json_body(beer_json(id, "Prefixed"));
		})
		.await;

	assert!(client.base_url().as_str().ends_with("/catalog/"));

	client.get_beer_by_id(id).await.expect("Prefixed base should resolve.");

	mock.assert_calls_async(1).await;
}
