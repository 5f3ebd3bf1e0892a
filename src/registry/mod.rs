//! Access to the remote package registry.
//!
//! [`PackageRegistry`] is the seam between the run and the network: owner lookup,
//! one page of versions, and deletion of one version. [`GitHubRegistry`] implements
//! it against the GitHub REST API; [`fetch_all_versions`] and [`delete_versions`]
//! build the catalog and deletion loop on top of any implementation.

mod catalog;
mod github;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

use crate::retention::{PackageVersion, VersionId};

pub use catalog::{DEFAULT_PER_PAGE, delete_versions, fetch_all_versions};
pub use github::GitHubRegistry;

/// Kind of account owning a package. Selects the API routes used for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    Personal,
    Organizational,
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerKind::Personal => write!(f, "User"),
            OwnerKind::Organizational => write!(f, "Organization"),
        }
    }
}

impl FromStr for OwnerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(OwnerKind::Personal),
            "Organization" => Ok(OwnerKind::Organizational),
            _ => anyhow::bail!("Invalid owner type: {}", s),
        }
    }
}

/// The account holding the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub login: String,
    pub kind: OwnerKind,
}

/// Package ecosystem. Only container images are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackageType {
    #[default]
    Container,
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageType::Container => write!(f, "container"),
        }
    }
}

impl FromStr for PackageType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "container" => Ok(PackageType::Container),
            _ => anyhow::bail!("Invalid package type: {}. Expected container.", s),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Look up an account. Fails for account kinds other than user or organization.
    async fn get_owner(&self, login: &str) -> Result<Owner>;

    /// Fetch one page (1-based) of active versions, in registry order.
    async fn get_package_versions(
        &self,
        owner: &Owner,
        package_name: &str,
        package_type: PackageType,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PackageVersion>>;

    async fn delete_package_version(
        &self,
        owner: &Owner,
        package_name: &str,
        package_type: PackageType,
        version_id: VersionId,
    ) -> Result<()>;
}
