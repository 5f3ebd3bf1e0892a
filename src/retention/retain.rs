use chrono::TimeDelta;

use super::{PackageVersion, Reason, ReasonedPackageVersion};

/// Quota settings for [`retained_versions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Number of newest tagged versions to keep. Zero keeps none, except for the
    /// newest version when every version in the package is a candidate.
    pub retained_tagged_top: usize,
    /// Whether untagged versions can be retained at all.
    pub retain_untagged: bool,
    /// Window in which an untagged version still belongs to the last retained tagged one.
    pub untagged_drift_seconds: u64,
}

/// Decides which candidate versions survive regardless of age.
///
/// `all` is the full catalog and `filtered` the candidate subsequence of it, both
/// newest-first. The walk over `filtered` is single pass:
///
/// - tagged versions are kept until `retained_tagged_top` of them are kept
/// - untagged versions, when enabled, are kept unconditionally while the quota is
///   unfilled; afterwards only while they are younger than the drift window measured
///   from the last kept tagged version. The first one outside the window ends the walk.
pub fn retained_versions(
    all: &[PackageVersion],
    filtered: &[PackageVersion],
    policy: &RetentionPolicy,
) -> Vec<ReasonedPackageVersion> {
    let Some(newest) = filtered.first() else {
        return Vec::new();
    };

    if policy.retained_tagged_top == 0 {
        // Without this the whole package could be wiped.
        if all.len() == filtered.len() {
            return vec![ReasonedPackageVersion::new(newest, Reason::RetainedNewest)];
        }
        return Vec::new();
    }

    let drift_window = i64::try_from(policy.untagged_drift_seconds)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX);

    let mut retained = Vec::new();
    let mut retained_tagged = 0;
    let mut last_retained_created_at = newest.created_at;

    for version in filtered {
        if version.is_tagged() {
            if retained_tagged < policy.retained_tagged_top {
                retained.push(ReasonedPackageVersion::new(version, Reason::RetainedTagged));
                retained_tagged += 1;
                last_retained_created_at = version.created_at;
            }
            continue;
        }

        if !policy.retain_untagged {
            continue;
        }

        if retained_tagged < policy.retained_tagged_top {
            retained.push(ReasonedPackageVersion::new(version, Reason::RetainedUntagged));
        } else if last_retained_created_at - version.created_at < drift_window {
            retained.push(ReasonedPackageVersion::new(
                version,
                Reason::RetainedUntaggedDrift,
            ));
        } else {
            break;
        }
    }

    retained
}
