use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Movie or episodic series. Rendered as `movie` / `tv` in routes and list entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MediaKind {
    #[default]
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Movie => "Movie",
            MediaKind::Series => "TV Show",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "movie" => Ok(MediaKind::Movie),
            "tv" => Ok(MediaKind::Series),
            other => Err(format!("unknown media kind `{other}`")),
        }
    }
}

/// Movie or show details. TMDB names movies by `title` and shows by `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TitleDetails {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
}

impl TitleDetails {
    pub fn display_name(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    /// Seasons offered in the picker. A show without the field still gets season 1.
    pub fn season_count(&self) -> u32 {
        self.number_of_seasons.unwrap_or(1).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Episode {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub still_path: Option<String>,
    pub episode_number: u32,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SeasonDetails {
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchResult {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl SearchResult {
    pub fn display_name(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    /// Multi-search also returns people; anything that is not a show opens as a movie.
    pub fn media_kind(&self) -> MediaKind {
        match self.media_type.as_deref() {
            Some("tv") => MediaKind::Series,
            _ => MediaKind::Movie,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchPage {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

pub fn image_url(path: &str, size: &str) -> String {
    format!("{IMAGE_BASE_URL}/{size}{path}")
}
