//! GitHub user statistics
//!
//! # Overview
//!
//! Given a list of usernames, library fetches each user's profile, the first page of their public repositories and the language byte counts of every repository.
//! Then, for each user, it aggregates:
//! * the number of repositories and the total number of forks,
//! * the language distribution: byte counts merged over all repositories, the `top_n` largest languages named individually and the remainder reported as `Others`,
//! * per calendar year histograms of repository creation and last update, and the activity histogram summing both.
//!
//! Users are processed sequentially and independently. A failure to fetch any data of a user skips that user only.
//! Malformed timestamps are left out of the histograms and reported as warnings.

#[cfg(feature = "report")]
pub mod aggregator;
#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "report")]
pub mod collector;
#[cfg(feature = "report")]
pub mod reporter;

#[cfg(feature = "report")]
pub use aggregator::UserStats;
#[cfg(feature = "report")]
pub use collector::{StatsCollector, UserOutcome, UserOutcomeStream};
#[cfg(feature = "report")]
pub use reporter::{OutputStyle, UserReportRow};
