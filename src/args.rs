use clap::Parser;
use gitnames::OutputStyle;
use github_client::DEFAULT_GITHUB_URL;
use secrecy::SecretString;
use std::path::PathBuf;
use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// File with one GitHub username per line
    #[clap(short, long, env = "GITNAMES_USERNAMES_FILE")]
    pub usernames_file: PathBuf,

    /// API OAuth access token
    #[clap(short, long, env = "GITNAMES_API_TOKEN")]
    pub api_token: Option<SecretString>,

    /// Repository API URL
    #[clap(long, env = "GITNAMES_API_URL", default_value = DEFAULT_GITHUB_URL)]
    pub api_url: String,

    /// Number of languages named in the language distribution, the rest is summed up as "Others"
    #[clap(short, long, env = "GITNAMES_TOP_LANGUAGES", default_value_t = 4, parse(try_from_str=top_languages_in_range))]
    pub top_languages: usize,

    /// Timeout of a single API request in seconds
    #[clap(long, env = "GITNAMES_TIMEOUT", default_value_t = 10, parse(try_from_str=timeout_in_range))]
    pub timeout: u64,

    /// Report style: table or plain
    #[clap(short, long, env = "GITNAMES_STYLE", default_value = "table")]
    pub style: OutputStyle,
}

fn top_languages_in_range(value: &str) -> clap::Result<usize, String> {
    number_in_range(value, 1, 100, "top_languages".to_string())
}

fn timeout_in_range(value: &str) -> clap::Result<u64, String> {
    number_in_range(value, 1, 300, "timeout".to_string())
}

fn number_in_range<T>(value: &str, min: T, max: T, name: String) -> clap::Result<T, String>
where
    T: FromStr + PartialOrd + Display,
    <T as FromStr>::Err: Display,
{
    value.parse::<T>().map_err(|err| format!("{}", err)).and_then(|value| {
        if value < min || value > max {
            return Err(format!("{} is not in range {} .. {}.", name, min, max));
        }
        Ok(value)
    })
}

#[test]
fn number_in_range_test() {
    assert_eq!(top_languages_in_range("2"), Ok(2));
    assert!(top_languages_in_range("0").is_err());
    assert!(top_languages_in_range("two").is_err());
    assert_eq!(timeout_in_range("300"), Ok(300));
    assert!(timeout_in_range("301").is_err());
}

#[test]
fn args_defaults_test() {
    let args = Args::try_parse_from(["gitnames", "--usernames-file", "users.txt"]).unwrap();
    assert_eq!(args.usernames_file, PathBuf::from("users.txt"));
    assert_eq!(args.top_languages, 4);
    assert_eq!(args.timeout, 10);
    assert_eq!(args.style, OutputStyle::Table);
    assert!(args.api_token.is_none());
}

#[test]
fn args_style_test() {
    let args = Args::try_parse_from(["gitnames", "-u", "users.txt", "-s", "plain", "-t", "2"]).unwrap();
    assert_eq!(args.style, OutputStyle::Plain);
    assert_eq!(args.top_languages, 2);
    assert!(Args::try_parse_from(["gitnames", "-u", "users.txt", "-s", "html"]).is_err());
}

#[test]
fn args_env_names_test() {
    use clap::CommandFactory;
    use std::ffi::OsStr;

    let command = Args::command();
    let env = |long: &str| {
        command
            .get_arguments()
            .find(|arg| arg.get_long() == Some(long))
            .and_then(|arg| arg.get_env())
    };
    assert_eq!(env("api-token"), Some(OsStr::new("GITNAMES_API_TOKEN")));
    assert_eq!(env("usernames-file"), Some(OsStr::new("GITNAMES_USERNAMES_FILE")));
    assert_eq!(env("api-url"), Some(OsStr::new("GITNAMES_API_URL")));
}
