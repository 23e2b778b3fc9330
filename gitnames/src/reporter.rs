use crate::aggregator::UserStats;
use crate::api::{LanguageProportion, YearBuckets};
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, Table};
use std::fmt::Display;
use strum_macros::{Display as StrumDisplay, EnumString};

pub const HEADER: [&str; 8] = [
    "Username",
    "Repos",
    "Languages",
    "Followers",
    "Forks",
    "Creation Year",
    "Update Year",
    "Activity Distribution",
];

#[derive(Debug, Clone, Copy, PartialEq, EnumString, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum OutputStyle {
    Table,
    Plain,
}

/// Display strings of one user's report.
#[derive(Debug, Clone, PartialEq)]
pub struct UserReportRow {
    pub username: String,
    pub repos: String,
    pub languages: String,
    pub followers: String,
    pub forks: String,
    pub created: String,
    pub updated: String,
    pub activity: String,
}

impl UserReportRow {
    fn cells(&self) -> [&str; 8] {
        [
            self.username.as_str(),
            self.repos.as_str(),
            self.languages.as_str(),
            self.followers.as_str(),
            self.forks.as_str(),
            self.created.as_str(),
            self.updated.as_str(),
            self.activity.as_str(),
        ]
    }
}

impl Display for UserReportRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "user: {}\trepos: {}\tlanguages: {}\tfollowers: {}\tforks: {}\tcreated: {}\tupdated: {}\tactivity: {}",
            self.username,
            self.repos,
            self.languages,
            self.followers,
            self.forks,
            self.created,
            self.updated,
            self.activity
        ))
    }
}

pub fn render_user_report_row(stats: &UserStats) -> UserReportRow {
    UserReportRow {
        username: stats.profile.login.clone(),
        repos: stats.repo_count.to_string(),
        languages: format_language_proportion(&stats.languages),
        followers: stats.profile.followers.to_string(),
        forks: stats.total_forks.to_string(),
        created: format_year_distribution(&stats.created),
        updated: format_year_distribution(&stats.updated),
        activity: format_year_distribution(&stats.activity),
    }
}

/// `"<language>: <percentage>%"` entries ordered by language name.
pub fn format_language_proportion(proportion: &LanguageProportion) -> String {
    join(proportion.iter().map(|(lang, percentage)| format!("{}: {:.2}%", lang, percentage)))
}

/// `"<year>: <count>"` entries ordered by year.
pub fn format_year_distribution(buckets: &YearBuckets) -> String {
    join(buckets.iter().map(|(year, count)| format!("{}: {}", year, count)))
}

fn join(entries: impl Iterator<Item = String>) -> String {
    entries.collect::<Vec<_>>().join(", ")
}

pub fn render_table(rows: &[UserReportRow]) -> String {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(HEADER.iter().map(|title| Cell::new(title).add_attribute(Attribute::Bold)));
    for row in rows {
        table.add_row(row.cells());
    }
    table.to_string()
}

pub fn render(style: OutputStyle, rows: &[UserReportRow]) -> String {
    match style {
        OutputStyle::Table => render_table(rows),
        OutputStyle::Plain => rows.iter().map(UserReportRow::to_string).collect::<Vec<_>>().join("\n"),
    }
}
