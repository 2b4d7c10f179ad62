use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500/";
const POSTER_PLACEHOLDER: &str = "/no-movie.png";
const TRAILER_EMBED_BASE_URL: &str = "https://www.youtube.com/embed/";

pub const TRAILER_SITE: &str = "YouTube";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: String,
}

impl MovieSummary {
    pub fn poster_url(&self) -> String {
        match self.poster_path.as_deref() {
            Some(path) if !path.is_empty() => {
                format!("{POSTER_BASE_URL}{}", path.trim_start_matches('/'))
            }
            _ => POSTER_PLACEHOLDER.to_string(),
        }
    }

    pub fn rating_label(&self) -> String {
        match self.vote_average {
            Some(average) if average != 0.0 => format!("{average:.1}"),
            _ => "N/A".to_string(),
        }
    }

    pub fn release_year(&self) -> String {
        let Some(date) = self.release_date.as_deref().filter(|d| !d.is_empty()) else {
            return "N/A".to_string();
        };
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(|parsed| parsed.year().to_string())
            .unwrap_or_else(|_| date.split('-').next().unwrap_or(date).to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieListResponse {
    #[serde(default)]
    pub results: Vec<MovieSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Video {
    pub fn is_embeddable_trailer(&self) -> bool {
        matches!(self.kind.as_str(), "Trailer" | "Teaser") && self.site == TRAILER_SITE
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub results: Vec<Video>,
}

pub fn trailer_embed_url(key: &str) -> String {
    format!("{TRAILER_EMBED_BASE_URL}{key}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
