#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use marquee_client::{
	auth::{SessionTokens, TokenSecret},
	catalog::{MovieDraft, MovieQuery, PersonPatch},
	client::{ApiClient, ReqwestApiClient},
	error::Error,
	store::{MemoryStore, SessionStore},
};

fn build_client(server: &MockServer) -> ReqwestApiClient {
	let seed = SessionTokens::new(TokenSecret::new("A1"), Some(TokenSecret::new("R1")));
	let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::with_tokens(seed));

	ApiClient::new(server.url("/api"), store).expect("Client fixture should build.")
}

const MOVIE_BODY: &str = r#"{
	"id": 1,
	"title": "Alien",
	"year": 1979,
	"genres": ["horror", "sci-fi"],
	"rating": 8.5,
	"description": "A commercial crew answers a distress call.",
	"poster_url": null,
	"created_at": "2024-05-01T12:00:00Z",
	"updated_at": "2024-05-01T12:00:00Z",
	"director_data": {"id": 3, "name": "Ridley Scott", "country": "GB", "total_movies": 2},
	"actors_data": [{"id": 7, "name": "Sigourney Weaver", "country": "US", "total_movies": 1}]
}"#;

#[tokio::test]
async fn movie_list_renders_filters_and_sends_no_bearer_header() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let authed = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/movies/").header_exists("authorization");
			then.status(500);
		})
		.await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/movies/")
				.query_param("search", "alien")
				.query_param("genres", "sci-fi");
			then.status(200)
				.header("content-type", "application/json")
				.body(format!("[{MOVIE_BODY}]"));
		})
		.await;
	let movies = client
		.movies(&MovieQuery::new().search("alien").genre("sci-fi"))
		.await
		.expect("Filtered list should succeed.");

	authed.assert_calls_async(0).await;
	mock.assert_async().await;

	assert_eq!(movies.len(), 1);
	assert_eq!(movies[0].title, "Alien");
	assert_eq!(movies[0].director.name, "Ridley Scott");
}

#[tokio::test]
async fn movie_detail_decodes_the_expanded_shape() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/movies/1/");
			then.status(200).header("content-type", "application/json").body(MOVIE_BODY);
		})
		.await;
	let movie = client.movie(1).await.expect("Detail fetch should succeed.");

	mock.assert_async().await;

	assert_eq!(movie.id, 1);
	assert_eq!(movie.year, Some(1979));
	assert_eq!(movie.actors.len(), 1);
}

#[tokio::test]
async fn create_movie_sends_the_write_shape_with_a_bearer_header() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/movies/")
				.header("authorization", "Bearer A1")
				.header("content-type", "application/json")
				.json_body(serde_json::json!({
					"title": "Alien",
					"year": 1979,
					"genres": ["horror", "sci-fi"],
					"rating": 8.5,
					"director": 3,
					"actors_id": [7]
				}));
			then.status(201).header("content-type", "application/json").body(MOVIE_BODY);
		})
		.await;
	let draft = MovieDraft {
		title: "Alien".into(),
		year: 1979,
		genres: vec!["horror".into(), "sci-fi".into()],
		rating: 8.5,
		description: None,
		poster_url: None,
		director: 3,
		actors_id: vec![7],
	};
	let movie = client.create_movie(&draft).await.expect("Creation should succeed.");

	mock.assert_async().await;

	assert_eq!(movie.id, 1);
}

#[tokio::test]
async fn validation_failures_surface_as_api_errors_with_the_raw_body() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);

	server
		.mock_async(|when, then| {
			when.method(PATCH).path("/api/directors/3/");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"country\":[\"Country must be a valid ISO 3166-1 alpha-2 code\"]}");
		})
		.await;

	let err = client
		.update_director(3, &PersonPatch { country: Some("XX".into()), ..Default::default() })
		.await
		.expect_err("A validation failure should be an error.");

	match err {
		Error::Api { status, body } => {
			assert_eq!(status, 400);
			assert!(body.contains("ISO 3166-1"));
		},
		other => panic!("Expected an API error, got {other:?}."),
	}
}

#[tokio::test]
async fn delete_treats_204_as_success() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/actors/7/").header("authorization", "Bearer A1");
			then.status(204);
		})
		.await;

	client.delete_actor(7).await.expect("Deletion should succeed.");

	mock.assert_async().await;
}

#[tokio::test]
async fn people_listing_decodes_the_shared_person_shape() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/directors/");
			then.status(200)
				.header("content-type", "application/json")
				.body("[{\"id\":3,\"name\":\"Ridley Scott\",\"country\":\"GB\",\"total_movies\":2}]");
		})
		.await;

	let directors = client.directors().await.expect("Director list should succeed.");

	assert_eq!(directors.len(), 1);
	assert_eq!(directors[0].total_movies, 2);
}
