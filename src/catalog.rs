//! Typed movie-catalog resources layered over the raw request client.
//!
//! List and detail reads go out unauthenticated (the catalog is public); create, update,
//! and delete go through the authenticated path and therefore benefit from the 401
//! recovery protocol. Non-2xx responses surface as [`Error::Api`] with the raw body, so
//! callers can show the server's validation messages as-is.

// crates.io
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	client::{ApiClient, RequestOptions},
	http::{ApiResponse, HttpTransport},
};

/// Director or actor entry; the two collections share one shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
	/// Server-assigned identifier.
	pub id: u64,
	/// Display name, unique per collection.
	pub name: String,
	/// ISO 3166-1 alpha-2 country code.
	pub country: String,
	/// Number of catalog movies the person is attached to.
	#[serde(default)]
	pub total_movies: u64,
}

/// Payload for creating a director or actor.
#[derive(Clone, Debug, Serialize)]
pub struct PersonDraft {
	/// Display name.
	pub name: String,
	/// ISO 3166-1 alpha-2 country code.
	pub country: String,
}

/// Sparse payload for updating a director or actor; unset fields are left untouched.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PersonPatch {
	/// Replacement display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Replacement country code.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub country: Option<String>,
}

/// Movie entry as the list and detail endpoints return it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Movie {
	/// Server-assigned identifier.
	pub id: u64,
	/// Title, unique within the catalog.
	pub title: String,
	/// Release year.
	#[serde(default)]
	pub year: Option<i32>,
	/// Free-form genre labels.
	#[serde(default)]
	pub genres: Vec<String>,
	/// Rating on a 1-10 scale.
	#[serde(default)]
	pub rating: Option<f64>,
	/// Synopsis.
	#[serde(default)]
	pub description: Option<String>,
	/// Poster image URL.
	#[serde(default)]
	pub poster_url: Option<String>,
	/// Creation timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last-update timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
	/// Expanded director entry.
	#[serde(rename = "director_data")]
	pub director: Person,
	/// Expanded actor entries.
	#[serde(rename = "actors_data", default)]
	pub actors: Vec<Person>,
}

/// Payload for creating a movie.
///
/// The write shape references people by id (`director`, `actors_id`), matching what the
/// server's serializer expects; the expanded entries only appear on reads.
#[derive(Clone, Debug, Serialize)]
pub struct MovieDraft {
	/// Title, unique within the catalog.
	pub title: String,
	/// Release year (the server rejects years before 1880 or in the future).
	pub year: i32,
	/// Free-form genre labels.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub genres: Vec<String>,
	/// Rating on a 1-10 scale.
	pub rating: f64,
	/// Synopsis.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Poster image URL.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub poster_url: Option<String>,
	/// Director id.
	pub director: u64,
	/// Actor ids.
	pub actors_id: Vec<u64>,
}

/// Sparse payload for updating a movie; unset fields are left untouched.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MoviePatch {
	/// Replacement title.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Replacement release year.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub year: Option<i32>,
	/// Replacement genre labels.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub genres: Option<Vec<String>>,
	/// Replacement rating.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub rating: Option<f64>,
	/// Replacement synopsis.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Replacement poster URL.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub poster_url: Option<String>,
	/// Replacement director id.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub director: Option<u64>,
	/// Replacement actor ids.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub actors_id: Option<Vec<u64>>,
}

/// Filters accepted by the movie list endpoint.
#[derive(Clone, Debug, Default)]
pub struct MovieQuery {
	search: Option<String>,
	director: Option<u64>,
	actor: Option<u64>,
	genre: Option<String>,
}
impl MovieQuery {
	/// Creates an empty query matching every movie.
	pub fn new() -> Self {
		Self::default()
	}

	/// Filters by a free-text search term.
	pub fn search(mut self, term: impl Into<String>) -> Self {
		self.search = Some(term.into());

		self
	}

	/// Filters by director id.
	pub fn director(mut self, id: u64) -> Self {
		self.director = Some(id);

		self
	}

	/// Filters by actor id.
	pub fn actor(mut self, id: u64) -> Self {
		self.actor = Some(id);

		self
	}

	/// Filters by genre label (substring match server-side, query key `genres`).
	pub fn genre(mut self, genre: impl Into<String>) -> Self {
		self.genre = Some(genre.into());

		self
	}

	pub(crate) fn to_path(&self) -> String {
		let mut pairs = form_urlencoded::Serializer::new(String::new());
		let mut any = false;

		if let Some(search) = &self.search {
			pairs.append_pair("search", search);
			any = true;
		}
		if let Some(director) = self.director {
			pairs.append_pair("director", &director.to_string());
			any = true;
		}
		if let Some(actor) = self.actor {
			pairs.append_pair("actor", &actor.to_string());
			any = true;
		}
		if let Some(genre) = &self.genre {
			pairs.append_pair("genres", genre);
			any = true;
		}

		if any { format!("/movies/?{}", pairs.finish()) } else { "/movies/".into() }
	}
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Lists movies matching the provided filters.
	pub async fn movies(&self, query: &MovieQuery) -> Result<Vec<Movie>> {
		self.fetch_list(&query.to_path()).await
	}

	/// Fetches a single movie by id.
	pub async fn movie(&self, id: u64) -> Result<Movie> {
		self.fetch_one(&format!("/movies/{id}/")).await
	}

	/// Creates a movie; requires an authenticated session.
	pub async fn create_movie(&self, draft: &MovieDraft) -> Result<Movie> {
		self.create("/movies/", draft).await
	}

	/// Applies a sparse update to a movie; requires an authenticated session.
	pub async fn update_movie(&self, id: u64, patch: &MoviePatch) -> Result<Movie> {
		self.update(&format!("/movies/{id}/"), patch).await
	}

	/// Deletes a movie; requires an authenticated session.
	pub async fn delete_movie(&self, id: u64) -> Result<()> {
		self.remove(&format!("/movies/{id}/")).await
	}

	/// Lists all directors.
	pub async fn directors(&self) -> Result<Vec<Person>> {
		self.fetch_list("/directors/").await
	}

	/// Fetches a single director by id.
	pub async fn director(&self, id: u64) -> Result<Person> {
		self.fetch_one(&format!("/directors/{id}/")).await
	}

	/// Creates a director; requires an authenticated session.
	pub async fn create_director(&self, draft: &PersonDraft) -> Result<Person> {
		self.create("/directors/", draft).await
	}

	/// Applies a sparse update to a director; requires an authenticated session.
	pub async fn update_director(&self, id: u64, patch: &PersonPatch) -> Result<Person> {
		self.update(&format!("/directors/{id}/"), patch).await
	}

	/// Deletes a director; requires an authenticated session.
	pub async fn delete_director(&self, id: u64) -> Result<()> {
		self.remove(&format!("/directors/{id}/")).await
	}

	/// Lists all actors.
	pub async fn actors(&self) -> Result<Vec<Person>> {
		self.fetch_list("/actors/").await
	}

	/// Fetches a single actor by id.
	pub async fn actor(&self, id: u64) -> Result<Person> {
		self.fetch_one(&format!("/actors/{id}/")).await
	}

	/// Creates an actor; requires an authenticated session.
	pub async fn create_actor(&self, draft: &PersonDraft) -> Result<Person> {
		self.create("/actors/", draft).await
	}

	/// Applies a sparse update to an actor; requires an authenticated session.
	pub async fn update_actor(&self, id: u64, patch: &PersonPatch) -> Result<Person> {
		self.update(&format!("/actors/{id}/"), patch).await
	}

	/// Deletes an actor; requires an authenticated session.
	pub async fn delete_actor(&self, id: u64) -> Result<()> {
		self.remove(&format!("/actors/{id}/")).await
	}

	async fn fetch_list<R>(&self, path: &str) -> Result<Vec<R>>
	where
		R: DeserializeOwned,
	{
		let response = self.request(path, RequestOptions::new(Method::GET).skip_auth()).await?;

		Ok(expect_success(response)?.json()?)
	}

	async fn fetch_one<R>(&self, path: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let response = self.request(path, RequestOptions::new(Method::GET).skip_auth()).await?;

		Ok(expect_success(response)?.json()?)
	}

	async fn create<R, B>(&self, path: &str, body: &B) -> Result<R>
	where
		R: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		let response = self.post(path, body).await?;

		Ok(expect_success(response)?.json()?)
	}

	async fn update<R, B>(&self, path: &str, body: &B) -> Result<R>
	where
		R: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		let response = self.patch(path, body).await?;

		Ok(expect_success(response)?.json()?)
	}

	async fn remove(&self, path: &str) -> Result<()> {
		let response = self.delete(path).await?;

		expect_success(response)?;

		Ok(())
	}
}

fn expect_success(response: ApiResponse) -> Result<ApiResponse> {
	if response.is_success() {
		Ok(response)
	} else {
		Err(Error::Api { status: response.status().as_u16(), body: response.text() })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn query_renders_the_server_side_filter_keys() {
		assert_eq!(MovieQuery::new().to_path(), "/movies/");
		assert_eq!(
			MovieQuery::new().search("alien covenant").genre("sci-fi").to_path(),
			"/movies/?search=alien+covenant&genres=sci-fi",
		);
		assert_eq!(
			MovieQuery::new().director(3).actor(7).to_path(),
			"/movies/?director=3&actor=7",
		);
	}

	#[test]
	fn movie_parses_the_expanded_read_shape() {
		let payload = r#"{
			"id": 1,
			"title": "Alien",
			"year": 1979,
			"genres": ["horror", "sci-fi"],
			"rating": 8.5,
			"description": null,
			"poster_url": null,
			"created_at": "2024-05-01T12:00:00Z",
			"updated_at": "2024-05-01T12:30:00.123456Z",
			"director_data": {"id": 3, "name": "Ridley Scott", "country": "GB", "total_movies": 2},
			"actors_data": [{"id": 7, "name": "Sigourney Weaver", "country": "US", "total_movies": 1}]
		}"#;
		let movie: Movie = serde_json::from_str(payload).expect("Movie payload should parse.");

		assert_eq!(movie.title, "Alien");
		assert_eq!(movie.year, Some(1979));
		assert_eq!(movie.director.name, "Ridley Scott");
		assert_eq!(movie.actors.len(), 1);
		assert_eq!(movie.created_at.year(), 2024);
	}

	#[test]
	fn patches_serialize_sparsely() {
		let patch = MoviePatch { rating: Some(9.0), ..Default::default() };
		let json = serde_json::to_string(&patch).expect("Patch should serialize.");

		assert_eq!(json, "{\"rating\":9.0}");

		let person = PersonPatch { country: Some("FR".into()), ..Default::default() };
		let json = serde_json::to_string(&person).expect("Patch should serialize.");

		assert_eq!(json, "{\"country\":\"FR\"}");
	}
}
