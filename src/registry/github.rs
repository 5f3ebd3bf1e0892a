//! GitHub Packages implementation of [`PackageRegistry`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;

use crate::http::HttpClient;
use crate::retention::{PackageVersion, VersionId};

use super::{Owner, OwnerKind, PackageRegistry, PackageType};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub API response types (internal).
mod api {
    use chrono::{DateTime, Utc};
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct User {
        pub login: String,
        #[serde(rename = "type")]
        pub kind: String,
    }

    #[derive(Deserialize, Debug)]
    pub struct PackageVersion {
        pub id: u64,
        pub name: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        #[serde(default)]
        pub metadata: Option<Metadata>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Metadata {
        #[serde(default)]
        pub container: Option<ContainerMetadata>,
    }

    #[derive(Deserialize, Debug)]
    pub struct ContainerMetadata {
        #[serde(default)]
        pub tags: Vec<String>,
    }
}

pub struct GitHubRegistry {
    http_client: HttpClient,
    api_url: String,
}

impl GitHubRegistry {
    pub fn new(http_client: HttpClient, api_url: Option<String>) -> Self {
        let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    fn versions_url(&self, owner: &Owner, package_name: &str, package_type: PackageType) -> String {
        let scope = match owner.kind {
            OwnerKind::Personal => "users",
            OwnerKind::Organizational => "orgs",
        };
        format!(
            "{}/{}/{}/packages/{}/{}/versions",
            self.api_url,
            scope,
            owner.login,
            package_type,
            encode_path_segment(package_name)
        )
    }
}

/// Container names may contain `/`, which GitHub expects escaped within one segment.
fn encode_path_segment(segment: &str) -> String {
    segment.replace('%', "%25").replace('/', "%2F")
}

#[async_trait]
impl PackageRegistry for GitHubRegistry {
    #[tracing::instrument(skip(self))]
    async fn get_owner(&self, login: &str) -> Result<Owner> {
        let url = format!("{}/users/{}", self.api_url, login);
        debug!("Fetching owner from {}...", url);

        let user: api::User = self
            .http_client
            .get_json(&url)
            .await
            .with_context(|| format!("Failed to look up owner {}", login))?;

        Ok(Owner {
            kind: user.kind.parse()?,
            login: user.login,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn get_package_versions(
        &self,
        owner: &Owner,
        package_name: &str,
        package_type: PackageType,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PackageVersion>> {
        let url = self.versions_url(owner, package_name, package_type);
        let page = page.to_string();
        let per_page = per_page.to_string();

        let versions: Vec<api::PackageVersion> = self
            .http_client
            .get_json_with_query(
                &url,
                &[
                    ("page", page.as_str()),
                    ("per_page", per_page.as_str()),
                    ("state", "active"),
                ],
            )
            .await?;

        Ok(versions.into_iter().map(|v| v.into()).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_package_version(
        &self,
        owner: &Owner,
        package_name: &str,
        package_type: PackageType,
        version_id: VersionId,
    ) -> Result<()> {
        let url = format!(
            "{}/{}",
            self.versions_url(owner, package_name, package_type),
            version_id
        );
        self.http_client.delete(&url).await
    }
}

impl From<api::PackageVersion> for PackageVersion {
    fn from(v: api::PackageVersion) -> Self {
        PackageVersion {
            id: v.id,
            name: v.name,
            created_at: v.created_at,
            updated_at: v.updated_at,
            tags: v
                .metadata
                .and_then(|m| m.container)
                .map(|c| c.tags)
                .unwrap_or_default(),
        }
    }
}
