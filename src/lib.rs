use gitnames::api::Result;
use gitnames::reporter::{render, render_user_report_row};
use gitnames::{OutputStyle, StatsCollector, UserOutcome, UserOutcomeStream};
use github_client::GithubClientBuilder;
use log::info;
use std::time::Duration;

mod args;
mod usernames;

pub use args::Args;
pub use usernames::load_usernames;

/// Loads the usernames listed in `args` and returns their outcomes in the listed order.
pub fn collect_stats(args: Args) -> Result<UserOutcomeStream> {
    let usernames = load_usernames(&args.usernames_file)?;
    info!("Collecting statistics of {} users", usernames.len());

    let mut client = GithubClientBuilder::default()
        .with_github_url(args.api_url)
        .with_timeout(Duration::from_secs(args.timeout));
    if let Some(token) = args.api_token {
        client = client.try_with_token(token)?;
    }
    let client = client.build()?;

    let collector = StatsCollector::new(client, args.top_languages);
    Ok(collector.collect(usernames))
}

pub fn render_outcome(style: OutputStyle, outcome: &UserOutcome) -> String {
    match outcome {
        UserOutcome::Report(stats) => {
            let mut report = format!(
                "Statistics Report for {}\n{}",
                stats.profile.login,
                render(style, &[render_user_report_row(stats)])
            );
            for warning in &stats.warnings {
                report.push_str(&format!("\nwarning: {}", warning));
            }
            report
        }
        UserOutcome::Skipped { username, reason } => format!("Skipped {}: {}", username, reason),
    }
}
