use anyhow::{Context, Result};
use log::debug;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::{
    http::HttpClient,
    registry::{GitHubRegistry, PackageRegistry},
    runtime::Runtime,
};

const TOKEN_VAR: &str = "GITHUB_TOKEN";

pub struct Config<R: Runtime, P: PackageRegistry> {
    pub runtime: R,
    pub registry: P,
}

impl<R: Runtime> Config<R, GitHubRegistry> {
    pub fn new(runtime: R, api_url: Option<String>) -> Result<Self> {
        let token = runtime
            .env_var(TOKEN_VAR)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .with_context(|| {
                format!(
                    "{} must be set to a token with read:packages and delete:packages scopes",
                    TOKEN_VAR
                )
            })?;

        let mut headers = HeaderMap::new();
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .with_context(|| format!("{} contains invalid characters", TOKEN_VAR))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        debug!("Using {} for authentication: {}", TOKEN_VAR, mask(&token));

        let client = Client::builder()
            .user_agent("ghcr-prune")
            .default_headers(headers)
            .build()?;

        let registry = GitHubRegistry::new(HttpClient::new(client), api_url);

        Ok(Self { runtime, registry })
    }
}

fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() < 16 {
        return "*********".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
