use reelkeep_models::SearchMode;
use std::fmt;

pub const SEARCH_PATH: &str = "/search";

/// A path plus ordered query parameters, the terminal stand-in for a page URL
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    query: Vec<(String, String)>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Parse `/path?a=1&b=2`, `?a=1` or `a=1`. A bare query keeps an empty path.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let (path, query) = match s.split_once('?') {
            Some((path, query)) => (path, query),
            None if s.contains('=') && !s.starts_with('/') => ("", s),
            None => (s, ""),
        };

        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(k), decode_component(v))
            })
            .collect();

        Self {
            path: path.to_string(),
            query,
        }
    }

    /// The search page location for a mode and query
    pub fn search(mode: SearchMode, q: &str) -> Self {
        let mut location = Self::new(SEARCH_PATH);
        location.set("mode", mode.as_str());
        location.set("q", q);
        location
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace all values for `key` with one
    pub fn set(&mut self, key: &str, value: &str) {
        match self.query.iter().position(|(k, _)| k == key) {
            Some(idx) => {
                self.query[idx].1 = value.to_string();
                let mut seen = false;
                self.query.retain(|(k, _)| {
                    if k != key {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => self.query.push((key.to_string(), value.to_string())),
        }
    }

    pub fn has_query(&self) -> bool {
        !self.query.is_empty()
    }

    /// `?a=1&b=2`, or empty when there are no parameters
    pub fn query_string(&self) -> String {
        if self.query.is_empty() {
            return String::new();
        }
        let pairs = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("?{}", pairs)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.path, self.query_string())
    }
}

/// Form-style decoding: `+` is a space, invalid escapes are kept verbatim
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_location() {
        let location = Location::parse("/search?mode=person&q=Christopher%20Nolan");
        assert_eq!(location.path, "/search");
        assert_eq!(location.get("mode"), Some("person"));
        assert_eq!(location.get("q"), Some("Christopher Nolan"));
        assert_eq!(location.get("missing"), None);
    }

    #[test]
    fn test_parse_bare_query() {
        let location = Location::parse("?mode=people&q=Nolan");
        assert_eq!(location.path, "");
        assert_eq!(location.get("mode"), Some("people"));

        let location = Location::parse("q=the+matrix");
        assert_eq!(location.get("q"), Some("the matrix"));
    }

    #[test]
    fn test_parse_path_only() {
        let location = Location::parse("/search");
        assert_eq!(location.path, "/search");
        assert!(!location.has_query());
        assert_eq!(location.to_string(), "/search");
    }

    #[test]
    fn test_search_location_is_encoded() {
        let location = Location::search(SearchMode::Movie, "Amélie & co");
        assert_eq!(location.to_string(), "/search?mode=movie&q=Am%C3%A9lie%20%26%20co");
        assert_eq!(Location::parse(&location.to_string()), location);
    }

    #[test]
    fn test_set_replaces_duplicates() {
        let mut location = Location::parse("/search?q=a&mode=movie&q=b");
        location.set("q", "c");
        assert_eq!(location.to_string(), "/search?q=c&mode=movie");
    }

    #[test]
    fn test_invalid_escape_kept() {
        let location = Location::parse("?q=100%");
        assert_eq!(location.get("q"), Some("100%"));
    }
}
