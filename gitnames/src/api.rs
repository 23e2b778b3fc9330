use async_trait::async_trait;
use derive_more::Constructor;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Network, HTTP status, timeout or payload decoding failure of the data source.
    #[error("Fetch error: {0:#}")]
    Fetch(anyhow::Error),
    #[error("Malformed timestamp {timestamp:?}: {reason}")]
    MalformedTimestamp { timestamp: String, reason: String },
    #[error("No language bytes reported for {0}")]
    DegenerateInput(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn fetch<E: Into<anyhow::Error>>(err: E) -> Self {
        Error::Fetch(err.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Language name to byte count of one repository (or merged over several).
pub type LanguageBytes = HashMap<String, u64>;

/// Calendar year to number of events in that year.
pub type YearBuckets = BTreeMap<i32, u32>;

/// Language name (or [`OTHERS`]) to its percentage of the total bytes.
pub type LanguageProportion = BTreeMap<String, f64>;

pub const OTHERS: &str = "Others";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserProfile {
    pub login: String,
    pub id: u64,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub public_repos: u32,
    pub public_gists: u32,
    pub followers: u32,
    pub following: u32,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct RepositorySummary {
    pub name: String,
    pub language: Option<String>,
    pub forks: u32,
    pub created_at: String,
    pub updated_at: String,
}

#[async_trait]
pub trait Client: Send + Sync {
    async fn profile(&self, username: &str) -> Result<UserProfile>;

    /// First page of the user's public repositories.
    async fn repositories(&self, username: &str) -> Result<Vec<RepositorySummary>>;

    async fn languages(&self, owner: &str, repository: &str) -> Result<LanguageBytes>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(err: &Error) -> &'static str {
        match err {
            Error::Fetch(_) => "fetch",
            Error::MalformedTimestamp { .. } => "timestamp",
            Error::DegenerateInput(_) => "degenerate",
            Error::Other(_) => "other",
        }
    }

    #[test]
    fn error_kinds_test() {
        let fetch = Error::fetch(anyhow::anyhow!("404 Not Found"));
        assert_eq!(kind(&fetch), "fetch");
        assert_eq!(fetch.to_string(), "Fetch error: 404 Not Found");

        let other: Error = anyhow::anyhow!("bad base URL").into();
        assert_eq!(kind(&other), "other");
        assert_eq!(other.to_string(), "bad base URL");

        assert_eq!(
            Error::DegenerateInput("octocat/empty".to_string()).to_string(),
            "No language bytes reported for octocat/empty"
        );
    }
}
