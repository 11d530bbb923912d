//! Endpoint paths and query construction for the TMDB v3 API.

/// One logical catalog operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Popular { page: u32 },
    SearchMovies { query: &'a str, page: u32 },
    SearchPeople { query: &'a str, page: u32 },
    Movie(i64),
    MovieCredits(i64),
    Person(i64),
    PersonMovieCredits(i64),
}

impl<'a> Endpoint<'a> {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Popular { .. } => "/movie/popular".to_string(),
            Endpoint::SearchMovies { .. } => "/search/movie".to_string(),
            Endpoint::SearchPeople { .. } => "/search/person".to_string(),
            Endpoint::Movie(id) => format!("/movie/{}", id),
            Endpoint::MovieCredits(id) => format!("/movie/{}/credits", id),
            Endpoint::Person(id) => format!("/person/{}", id),
            Endpoint::PersonMovieCredits(id) => format!("/person/{}/movie_credits", id),
        }
    }

    /// Endpoint-specific query parameters, unencoded
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::Popular { page } => vec![("page", (*page).max(1).to_string())],
            Endpoint::SearchMovies { query, page } | Endpoint::SearchPeople { query, page } => vec![
                ("include_adult", "false".to_string()),
                ("page", (*page).max(1).to_string()),
                ("query", query.to_string()),
            ],
            _ => Vec::new(),
        }
    }
}

/// Full request URL. Every request carries the API key and language.
pub fn build_url(base_url: &str, endpoint: &Endpoint<'_>, api_key: &str, language: &str) -> String {
    let mut url = format!("{}{}", base_url.trim_end_matches('/'), endpoint.path());

    let mut params = vec![
        ("api_key", api_key.to_string()),
        ("language", language.to_string()),
    ];
    params.extend(endpoint.params());

    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    url.push('?');
    url.push_str(&query);
    url
}
