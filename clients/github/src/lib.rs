use async_trait::async_trait;
use gitnames::api::{Error, LanguageBytes, RepositorySummary, Result, UserProfile};
use log::debug;
use reqwest::Client;
use reqwest::Response;
use reqwest::Url;
use serde::de::DeserializeOwned;

mod builder;
mod payload;

pub use builder::{GithubClientBuilder, DEFAULT_GITHUB_URL};

/// Single page of repositories, the largest the API serves.
const REPOS_PER_PAGE: &str = "100";

pub struct GithubClient {
    client: Client,
    github_url: Url,
}

impl GithubClient {
    /// Appends `segments` to the API URL, each one percent-encoded as a single path segment.
    fn request_url(&self, segments: &[&str]) -> Result<Url> {
        let mut request_url = self.github_url.clone();
        request_url
            .path_segments_mut()
            .map_err(|_| anyhow::anyhow!("{} cannot be a base URL", self.github_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(request_url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<T> {
        let request_url = self.request_url(segments)?;
        debug!("GET {}", request_url);
        let response = self.client.get(request_url).query(query).send().await.map_err(Error::fetch)?;
        read_response::<T>(response).await.map_err(Error::fetch)
    }
}

pub(crate) async fn read_response<T: DeserializeOwned>(response: Response) -> reqwest::Result<T> {
    response.error_for_status()?.json::<T>().await
}

#[async_trait]
impl gitnames::api::Client for GithubClient {
    async fn profile(&self, username: &str) -> Result<UserProfile> {
        let user = self.get::<payload::User>(&["users", username], &[]).await?;
        Ok(user.into())
    }

    async fn repositories(&self, username: &str) -> Result<Vec<RepositorySummary>> {
        let repos = self
            .get::<Vec<payload::Repo>>(&["users", username, "repos"], &[("per_page", REPOS_PER_PAGE)])
            .await?;
        Ok(repos.into_iter().map(RepositorySummary::from).collect())
    }

    async fn languages(&self, owner: &str, repository: &str) -> Result<LanguageBytes> {
        self.get::<LanguageBytes>(&["repos", owner, repository, "languages"], &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::GithubClientBuilder;
    use gitnames::api::{Client, Error};
    use reqwest::Url;
    use secrecy::SecretString;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USER_BODY: &str = r#"{
        "login": "octocat",
        "id": 583231,
        "name": "The Octocat",
        "bio": null,
        "public_repos": 8,
        "public_gists": 8,
        "followers": 9001,
        "following": 9,
        "created_at": "2011-01-25T18:44:36Z",
        "site_admin": false
    }"#;

    #[tokio::test]
    async fn profile_test() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .and(header("Accept", "application/vnd.github.v3+json"))
            .and(header("Authorization", "token s3cr3t"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(USER_BODY, "application/json"))
            .mount(&server)
            .await;

        let client = GithubClientBuilder::default()
            .with_github_url(server.uri())
            .try_with_token(SecretString::new("s3cr3t".to_string()))?
            .build()?;
        let profile = client.profile("octocat").await?;
        assert_eq!(profile.login, "octocat");
        assert_eq!(profile.id, 583231);
        assert_eq!(profile.name.as_deref(), Some("The Octocat"));
        assert_eq!(profile.bio, None);
        assert_eq!(profile.followers, 9001);
        Ok(())
    }

    #[tokio::test]
    async fn repositories_and_languages_test() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .and(query_param("per_page", "100"))
            .and(header("User-Agent", "gitnames-test"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"[{
                    "name": "Hello-World",
                    "language": null,
                    "forks": 9,
                    "stargazers_count": 80,
                    "created_at": "2011-01-26T19:01:12Z",
                    "updated_at": "2011-01-26T19:14:43Z"
                }]"#,
                "application/json",
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/Hello-World/languages"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"C": 78769, "Python": 7769}"#, "application/json"))
            .mount(&server)
            .await;

        let client = GithubClientBuilder::default()
            .with_github_url(server.uri())
            .try_with_user_agent("gitnames-test")?
            .build()?;
        let repos = client.repositories("octocat").await?;
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].name, "Hello-World");
        assert_eq!(repos[0].forks, 9);
        assert_eq!(repos[0].language, None);

        let languages = client.languages("octocat", "Hello-World").await?;
        assert_eq!(languages.get("C"), Some(&78769));
        assert_eq!(languages.get("Python"), Some(&7769));
        Ok(())
    }

    #[tokio::test]
    async fn not_found_is_fetch_error_test() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/ghost"))
            .respond_with(ResponseTemplate::new(404).set_body_raw(r#"{"message": "Not Found"}"#, "application/json"))
            .mount(&server)
            .await;

        let client = GithubClientBuilder::default().with_github_url(server.uri()).build()?;
        let err = client.profile("ghost").await.err();
        assert!(matches!(err, Some(Error::Fetch(_))), "got {:?}", err);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_fetch_error_test() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/broken/languages"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"C": "lots"}"#, "application/json"))
            .mount(&server)
            .await;

        let client = GithubClientBuilder::default().with_github_url(server.uri()).build()?;
        let err = client.languages("octocat", "broken").await.err();
        assert!(matches!(err, Some(Error::Fetch(_))), "got {:?}", err);
        Ok(())
    }

    #[tokio::test]
    async fn timeout_is_fetch_error_test() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/slowpoke"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(USER_BODY, "application/json")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = GithubClientBuilder::default()
            .with_github_url(server.uri())
            .with_timeout(Duration::from_millis(200))
            .build()?;
        let err = client.profile("slowpoke").await.err();
        assert!(matches!(err, Some(Error::Fetch(_))), "got {:?}", err);
        Ok(())
    }

    #[tokio::test]
    async fn reserved_characters_stay_in_path_segment_test() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(USER_BODY, "application/json"))
            .mount(&server)
            .await;

        let client = GithubClientBuilder::default().with_github_url(server.uri()).build()?;
        assert_eq!(client.profile("octocat").await?.login, "octocat");
        for username in ["octocat?evil", "octocat#evil", "octocat/repos"] {
            let err = client.profile(username).await.err();
            assert!(matches!(err, Some(Error::Fetch(_))), "{} got {:?}", username, err);
        }
        Ok(())
    }

    #[test]
    fn request_url_test() -> anyhow::Result<()> {
        let client = GithubClientBuilder::default()
            .with_github_url("https://ghe.example.com/api/v3/")
            .build()?;
        assert_eq!(
            client.request_url(&["repos", "octo cat", "a?b#c/d", "languages"])?,
            Url::parse("https://ghe.example.com/api/v3/repos/octo%20cat/a%3Fb%23c%2Fd/languages")?
        );
        Ok(())
    }

    #[test]
    fn invalid_github_url_test() {
        assert!(GithubClientBuilder::default().with_github_url("not a url").build().is_err());
        assert!(GithubClientBuilder::default().with_github_url("mailto:octocat@github.com").build().is_err());
    }
}
