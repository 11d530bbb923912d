use std::fmt;
use std::str::FromStr;

/// Poster width buckets served by the image CDN
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PosterSize {
    W92,
    W154,
    W185,
    #[default]
    W342,
    W500,
    W780,
    Original,
}

impl PosterSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosterSize::W92 => "w92",
            PosterSize::W154 => "w154",
            PosterSize::W185 => "w185",
            PosterSize::W342 => "w342",
            PosterSize::W500 => "w500",
            PosterSize::W780 => "w780",
            PosterSize::Original => "original",
        }
    }
}

impl fmt::Display for PosterSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PosterSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "w92" => Ok(PosterSize::W92),
            "w154" => Ok(PosterSize::W154),
            "w185" => Ok(PosterSize::W185),
            "w342" => Ok(PosterSize::W342),
            "w500" => Ok(PosterSize::W500),
            "w780" => Ok(PosterSize::W780),
            "original" => Ok(PosterSize::Original),
            other => Err(format!("Unknown poster size: {}", other)),
        }
    }
}

/// Compose an image URL; empty when the path is empty
pub fn poster_url(image_base_url: &str, path: &str, size: PosterSize) -> String {
    if path.is_empty() {
        return String::new();
    }
    format!("{}/{}{}", image_base_url.trim_end_matches('/'), size, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMG: &str = "https://image.tmdb.org/t/p";

    #[test]
    fn test_poster_url() {
        assert_eq!(
            poster_url(IMG, "/abc.jpg", PosterSize::W342),
            "https://image.tmdb.org/t/p/w342/abc.jpg"
        );
        assert_eq!(
            poster_url("https://cdn.example/", "/x.png", PosterSize::Original),
            "https://cdn.example/original/x.png"
        );
    }

    #[test]
    fn test_poster_url_empty_path() {
        assert_eq!(poster_url(IMG, "", PosterSize::W500), "");
    }

    #[test]
    fn test_parse_size() {
        assert_eq!("W500".parse::<PosterSize>().unwrap(), PosterSize::W500);
        assert!("w1000".parse::<PosterSize>().is_err());
    }
}
