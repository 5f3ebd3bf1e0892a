use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::HashSet;

use super::{Owner, PackageRegistry, PackageType};
use crate::retention::PackageVersion;

/// Page size for version listing. A shorter page is the last one.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Drains every page of versions and returns them newest-first.
///
/// Pages are requested strictly in order. A version id seen on an earlier page is
/// dropped if the listing shifts underneath us and repeats it.
#[tracing::instrument(skip(registry))]
pub async fn fetch_all_versions<P: PackageRegistry + ?Sized>(
    registry: &P,
    owner: &Owner,
    package_name: &str,
    package_type: PackageType,
) -> Result<Vec<PackageVersion>> {
    let mut versions = Vec::new();
    let mut seen = HashSet::new();
    let mut page = 1;

    loop {
        debug!("Fetching versions page {} of {}...", page, package_name);

        let batch = registry
            .get_package_versions(owner, package_name, package_type, page, DEFAULT_PER_PAGE)
            .await
            .with_context(|| {
                format!("Failed to list versions of {} (page {})", package_name, page)
            })?;

        let len = batch.len();
        versions.extend(batch.into_iter().filter(|v| seen.insert(v.id)));

        if len < DEFAULT_PER_PAGE as usize {
            break;
        }
        page += 1;
    }

    versions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(versions)
}

/// Deletes `versions` one at a time, in order. Stops at the first failure;
/// versions deleted before it stay deleted.
#[tracing::instrument(skip(registry, versions))]
pub async fn delete_versions<P: PackageRegistry + ?Sized>(
    registry: &P,
    owner: &Owner,
    package_name: &str,
    package_type: PackageType,
    versions: &[PackageVersion],
) -> Result<Vec<PackageVersion>> {
    let mut deleted = Vec::with_capacity(versions.len());

    for version in versions {
        registry
            .delete_package_version(owner, package_name, package_type, version.id)
            .await
            .with_context(|| format!("Failed to delete package version {}", version))?;
        info!("Deleted {}", version);
        deleted.push(version.clone());
    }

    Ok(deleted)
}
