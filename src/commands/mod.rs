//! Run orchestration: fetch, classify, report, delete.

pub mod config;
mod report;

use anyhow::Result;
use log::info;
use regex_lite::Regex;

use crate::{
    registry::{PackageRegistry, PackageType, delete_versions, fetch_all_versions},
    retention::{
        RetentionPolicy, expired_versions, filter_versions, retained_versions, unwanted_versions,
        versions_of,
    },
    runtime::Runtime,
};

use config::Config;

pub use report::{RunReport, render_lines};

/// Typed options for one run. Validation happens before this is built.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub owner: String,
    pub package_name: String,
    pub package_type: PackageType,
    pub tag_regex: Regex,
    pub untagged: bool,
    pub expire_period_days: u32,
    pub retained_tagged_top: usize,
    pub retain_untagged: bool,
    pub retain_untagged_drift_seconds: u64,
    pub dry_run: bool,
}

impl RunOptions {
    pub fn policy(&self) -> RetentionPolicy {
        RetentionPolicy {
            retained_tagged_top: self.retained_tagged_top,
            retain_untagged: self.retain_untagged,
            untagged_drift_seconds: self.retain_untagged_drift_seconds,
        }
    }
}

/// Build the GitHub-backed configuration and run against it.
#[tracing::instrument(skip(runtime, options, api_url))]
pub async fn prune<R: Runtime>(
    runtime: R,
    options: &RunOptions,
    api_url: Option<String>,
) -> Result<RunReport> {
    let config = Config::new(runtime, api_url)?;
    run(&config.runtime, &config.registry, options).await
}

/// Runs every stage in order, logging each result before moving on.
/// Deletions are skipped on a dry run; the first failed deletion aborts.
pub async fn run<R, P>(runtime: &R, registry: &P, options: &RunOptions) -> Result<RunReport>
where
    R: Runtime + ?Sized,
    P: PackageRegistry + ?Sized,
{
    info!("Target owner: {}.", options.owner);
    let owner = registry.get_owner(&options.owner).await?;
    info!("Owner type: {}.", owner.kind);
    info!(
        "Target package: {}. Package type: {}.",
        options.package_name, options.package_type
    );

    let all = fetch_all_versions(registry, &owner, &options.package_name, options.package_type)
        .await?;
    info!("All package versions:\n{}\n", render_lines(&all));

    info!(
        "Tag regex: {}. Untagged: {}.",
        options.tag_regex.as_str(),
        options.untagged
    );
    let filtered = filter_versions(&all, &options.tag_regex, options.untagged);
    let filtered_versions = versions_of(&filtered);
    info!("Filtered package versions:\n{}\n", render_lines(&filtered));

    info!("Expire period days: {}.", options.expire_period_days);
    let expired = expired_versions(
        &filtered_versions,
        options.expire_period_days,
        &runtime.now(),
    );
    info!("Expired package versions:\n{}\n", render_lines(&expired));

    info!("Retained tagged top: {}.", options.retained_tagged_top);
    info!(
        "Retain untagged: {}, drift: {} seconds.",
        options.retain_untagged, options.retain_untagged_drift_seconds
    );
    let retained = retained_versions(&all, &filtered_versions, &options.policy());
    info!("Retained package versions:\n{}\n", render_lines(&retained));

    let unwanted = unwanted_versions(&versions_of(&expired), &versions_of(&retained));
    info!("Unwanted package versions:\n{}\n", render_lines(&unwanted));

    info!("Dry run: {}.", options.dry_run);
    let deleted = if options.dry_run {
        Vec::new()
    } else {
        delete_versions(
            registry,
            &owner,
            &options.package_name,
            options.package_type,
            &unwanted,
        )
        .await?
    };
    info!("Deleted package versions:\n{}", render_lines(&deleted));

    Ok(RunReport {
        owner,
        all,
        filtered,
        expired,
        retained,
        unwanted,
        deleted,
        dry_run: options.dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{MockPackageRegistry, Owner, OwnerKind};
    use crate::retention::{PackageVersion, Reason};
    use crate::runtime::MockRuntime;
    use crate::test_utils::{at, version};
    use chrono::Local;
    use mockall::Sequence;
    use mockall::predicate::eq;

    fn owner() -> Owner {
        Owner {
            login: "acme".into(),
            kind: OwnerKind::Organizational,
        }
    }

    fn options(dry_run: bool) -> RunOptions {
        RunOptions {
            owner: "acme".into(),
            package_name: "app".into(),
            package_type: PackageType::Container,
            tag_regex: Regex::new(r"^v\d").unwrap(),
            untagged: true,
            expire_period_days: 7,
            retained_tagged_top: 2,
            retain_untagged: false,
            retain_untagged_drift_seconds: 600,
            dry_run,
        }
    }

    fn catalog() -> Vec<PackageVersion> {
        // Deliberately unsorted: the catalog fetch sorts newest-first.
        vec![
            version(1, "2022-01-01T00:00:00Z", &[]),
            version(6, "2022-02-01T10:00:00Z", &["v6", "latest"]),
            version(5, "2022-01-20T00:00:00Z", &[]),
            version(4, "2022-01-15T00:00:00Z", &["v4"]),
            version(3, "2022-01-10T00:00:00Z", &["dev-3"]),
            version(2, "2022-01-05T00:00:00Z", &["v2"]),
        ]
    }

    fn runtime() -> MockRuntime {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_now()
            .returning(|| at("2022-02-01T12:00:00Z").with_timezone(&Local));
        runtime
    }

    fn registry() -> MockPackageRegistry {
        let mut registry = MockPackageRegistry::new();
        registry
            .expect_get_owner()
            .with(eq("acme"))
            .times(1)
            .returning(|_| Ok(owner()));
        registry
            .expect_get_package_versions()
            .withf(|o, name, _, page, _| *o == owner() && name == "app" && *page == 1)
            .times(1)
            .returning(|_, _, _, _, _| Ok(catalog()));
        registry
    }

    fn ids(versions: &[PackageVersion]) -> Vec<u64> {
        versions.iter().map(|v| v.id).collect()
    }

    #[test_log::test(tokio::test)]
    async fn test_dry_run_classifies_without_deleting() {
        let mut registry = registry();
        registry.expect_delete_package_version().never();

        let report = run(&runtime(), &registry, &options(true)).await.unwrap();

        assert_eq!(report.owner, owner());
        assert_eq!(ids(&report.all), vec![6, 5, 4, 3, 2, 1]);
        assert_eq!(ids(&versions_of(&report.filtered)), vec![6, 5, 4, 2, 1]);
        assert_eq!(ids(&versions_of(&report.expired)), vec![5, 4, 2, 1]);
        assert_eq!(
            report
                .retained
                .iter()
                .map(|r| (r.version.id, r.reason))
                .collect::<Vec<_>>(),
            vec![(6, Reason::RetainedTagged), (4, Reason::RetainedTagged)]
        );
        assert_eq!(ids(&report.unwanted), vec![5, 2, 1]);
        assert!(report.deleted.is_empty());
        assert!(report.dry_run);
    }

    #[test_log::test(tokio::test)]
    async fn test_run_deletes_unwanted_in_order() {
        let mut registry = registry();
        let mut seq = Sequence::new();
        for id in [5u64, 2, 1] {
            registry
                .expect_delete_package_version()
                .with(eq(owner()), eq("app"), eq(PackageType::Container), eq(id))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _, _, _| Ok(()));
        }

        let report = run(&runtime(), &registry, &options(false)).await.unwrap();

        assert_eq!(ids(&report.deleted), vec![5, 2, 1]);
        assert_eq!(report.summary(), "Deleted 3 of 6 version(s).");
    }

    #[test_log::test(tokio::test)]
    async fn test_run_aborts_on_failed_delete() {
        let mut registry = registry();
        registry
            .expect_delete_package_version()
            .with(eq(owner()), eq("app"), eq(PackageType::Container), eq(5u64))
            .times(1)
            .returning(|_, _, _, _| Err(anyhow::anyhow!("Access forbidden")));

        let result = run(&runtime(), &registry, &options(false)).await;

        assert!(result.is_err());
    }

    #[test_log::test(tokio::test)]
    async fn test_run_fails_on_unknown_owner() {
        let mut registry = MockPackageRegistry::new();
        registry
            .expect_get_owner()
            .returning(|login| Err(anyhow::anyhow!("Invalid owner type: Bot ({})", login)));
        registry.expect_get_package_versions().never();

        let err = run(&runtime(), &registry, &options(true)).await.unwrap_err();

        assert!(err.to_string().contains("Invalid owner type"));
    }

    #[test_log::test(tokio::test)]
    async fn test_run_keeps_newest_when_everything_matches_and_quota_is_zero() {
        let mut registry = registry();
        registry.expect_delete_package_version().never();
        let options = RunOptions {
            tag_regex: Regex::new(".").unwrap(),
            retained_tagged_top: 0,
            expire_period_days: 0,
            ..options(true)
        };

        let report = run(&runtime(), &registry, &options).await.unwrap();

        assert_eq!(report.filtered.len(), report.all.len());
        assert_eq!(ids(&versions_of(&report.retained)), vec![6]);
        assert_eq!(ids(&report.unwanted), vec![5, 4, 3, 2, 1]);
    }
}
