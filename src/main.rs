use clap::Parser;
use futures::StreamExt;
use gitnames::api::Error;
use gitnames_app::Args;

/// Prints repository statistics of every user listed in the usernames file.

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    env_logger::init();
    let args = Args::parse();
    let style = args.style;

    let outcomes = gitnames_app::collect_stats(args)?;

    outcomes
        .for_each(|outcome| async move {
            println!("{}", gitnames_app::render_outcome(style, &outcome));
        })
        .await;

    Ok(())
}
