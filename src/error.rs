use crate::legislatives::ResultRecord;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("failed to fetch {url}")]
    Fetch {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("{detail} in {url}")]
    Structure { url: Url, detail: String },

    #[error("{winners} winners found in {url}\n{dump}")]
    Validation {
        url: Url,
        winners: usize,
        dump: String,
    },

    #[error("Database error")]
    Database(#[from] sqlx::error::Error),

    #[error("Serialization error")]
    Json(#[from] serde_json::Error),

    #[error("Invalid url")]
    Url(#[from] url::ParseError),
}

impl ScrapeError {
    pub(crate) fn structure<D: Into<String>>(url: &Url, detail: D) -> ScrapeError {
        ScrapeError::Structure {
            url: url.clone(),
            detail: detail.into(),
        }
    }

    pub(crate) fn validation(url: &Url, winners: usize, records: &[ResultRecord]) -> ScrapeError {
        ScrapeError::Validation {
            url: url.clone(),
            winners,
            dump: serde_json::to_string_pretty(records).unwrap_or_default(),
        }
    }
}
