use crate::aggregator::{aggregate, degenerate_repositories, UserStats};
use crate::api::{Client, Error, Result};
use futures::{stream, Stream, StreamExt};
use log::{debug, error, warn};
use std::pin::Pin;
use std::sync::Arc;

/// Result of processing a single username.
#[derive(Debug)]
pub enum UserOutcome {
    Report(UserStats),
    Skipped { username: String, reason: Error },
}

impl UserOutcome {
    pub fn username(&self) -> &str {
        match self {
            UserOutcome::Report(stats) => &stats.profile.login,
            UserOutcome::Skipped { username, .. } => username,
        }
    }
}

pub type UserOutcomeStream = Pin<Box<dyn Stream<Item = UserOutcome> + std::marker::Send>>;

pub struct StatsCollector<CLIENT>
where
    CLIENT: 'static + Client,
{
    client: Arc<CLIENT>,
    top_n: usize,
}

impl<CLIENT> StatsCollector<CLIENT>
where
    CLIENT: 'static + Client,
{
    pub fn new(client: CLIENT, top_n: usize) -> Self {
        StatsCollector {
            client: Arc::new(client),
            top_n,
        }
    }

    /// Processes `usernames` one after another, yielding one outcome per username in input order.
    pub fn collect(self, usernames: Vec<String>) -> UserOutcomeStream {
        let client = self.client;
        let top_n = self.top_n;
        stream::iter(usernames)
            .then(move |username| Self::user_outcome(client.clone(), username, top_n))
            .boxed()
    }

    async fn user_outcome(client: Arc<CLIENT>, username: String, top_n: usize) -> UserOutcome {
        match Self::user_stats(&client, &username, top_n).await {
            Ok(stats) => UserOutcome::Report(stats),
            Err(reason) => {
                error!("Skipping {}: {}", username, reason);
                UserOutcome::Skipped { username, reason }
            }
        }
    }

    async fn user_stats(client: &CLIENT, username: &str, top_n: usize) -> Result<UserStats> {
        let profile = client.profile(username).await?;
        if !profile.login.eq_ignore_ascii_case(username) {
            return Err(Error::fetch(anyhow::anyhow!(
                "Requested user {} but received {}",
                username,
                profile.login
            )));
        }
        let repositories = client.repositories(username).await?;
        debug!("Found {} repositories of {}", repositories.len(), username);

        let mut languages = Vec::with_capacity(repositories.len());
        for repo in &repositories {
            languages.push(client.languages(username, &repo.name).await?);
        }

        for degenerate in degenerate_repositories(&repositories, &languages) {
            debug!("{}: {}", username, degenerate);
        }

        let stats = aggregate(profile, &repositories, &languages, top_n);
        for warning in &stats.warnings {
            warn!("{}: {}", username, warning);
        }
        if stats.languages.values().all(|percentage| *percentage == 0.0) {
            debug!("{}", Error::DegenerateInput(username.to_string()));
        }
        Ok(stats)
    }
}
