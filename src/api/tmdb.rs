use crate::api::models::*;
use once_cell::sync::Lazy;
use thiserror::Error;

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

const BASE_URL: &str = "https://api.themoviedb.org/3";
const SEARCH_PAGES: u32 = 5;
const SEARCH_LIMIT: usize = 100;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("content not found")]
    NotFound,
    #[error("no TMDB API key configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Http(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for MetadataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            MetadataError::Decode(err.to_string())
        } else {
            MetadataError::Http(err.to_string())
        }
    }
}

/// Read-only client for the TMDB v3 API.
#[derive(Debug, Clone, PartialEq)]
pub struct TmdbClient {
    api_key: String,
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into().trim().to_string(),
        }
    }

    fn build_url(&self, endpoint: &str, extra_params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}/{}?api_key={}",
            BASE_URL,
            endpoint.trim_start_matches('/'),
            urlencoding::encode(&self.api_key)
        );

        for (key, value) in extra_params {
            url.push_str(&format!("&{}={}", key, urlencoding::encode(value)));
        }

        url
    }

    async fn get_json<T>(&self, url: &str) -> Result<T, MetadataError>
    where
        T: serde::de::DeserializeOwned,
    {
        if self.api_key.is_empty() {
            return Err(MetadataError::MissingApiKey);
        }

        let response = HTTP_CLIENT.get(url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MetadataError::NotFound);
        }
        if !response.status().is_success() {
            return Err(MetadataError::Http(format!("HTTP {}", response.status())));
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn get_title_details(
        &self,
        kind: MediaKind,
        id: u64,
    ) -> Result<TitleDetails, MetadataError> {
        let url = self.build_url(&format!("{}/{}", kind.as_str(), id), &[]);
        let details: TitleDetails = self.get_json(&url).await?;
        tracing::debug!(%kind, id, name = details.display_name(), "loaded title details");
        Ok(details)
    }

    pub async fn get_season_episodes(
        &self,
        id: u64,
        season: u32,
    ) -> Result<Vec<Episode>, MetadataError> {
        let url = self.build_url(&format!("tv/{id}/season/{season}"), &[]);
        let season: SeasonDetails = self.get_json(&url).await?;
        Ok(season.episodes)
    }

    /// Multi-search over the first pages, poster-less results dropped.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, MetadataError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let pages = futures_util::future::join_all((1..=SEARCH_PAGES).map(|page| {
            let url = self.build_url("search/multi", &[("query", query), ("page", &page.to_string())]);
            async move { self.get_json::<SearchPage>(&url).await }
        }))
        .await;

        let mut results = Vec::new();
        for page in pages {
            results.extend(page?.results);
        }

        Ok(filter_search_results(results))
    }
}

fn filter_search_results(results: Vec<SearchResult>) -> Vec<SearchResult> {
    results
        .into_iter()
        .filter(|item| item.poster_path.is_some())
        .take(SEARCH_LIMIT)
        .collect()
}
