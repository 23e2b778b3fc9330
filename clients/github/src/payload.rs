use gitnames::api::{RepositorySummary, UserProfile};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct User {
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

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            login: user.login,
            id: user.id,
            name: user.name,
            bio: user.bio,
            public_repos: user.public_repos,
            public_gists: user.public_gists,
            followers: user.followers,
            following: user.following,
            created_at: user.created_at,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Repo {
    pub name: String,
    pub language: Option<String>,
    pub forks: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Repo> for RepositorySummary {
    fn from(repo: Repo) -> Self {
        RepositorySummary::new(repo.name, repo.language, repo.forks, repo.created_at, repo.updated_at)
    }
}
