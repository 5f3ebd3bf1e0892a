//! Retention decision engine.
//!
//! Turns the catalog of a package into four derived lists:
//!
//! - `filter` - versions that are candidates for lifecycle management at all
//! - `expire` - candidates older than the expire period
//! - `retain` - candidates kept regardless of age
//! - `unwanted` - expired minus retained, the deletion set
//!
//! Everything here is synchronous and side-effect free. Callers pass the catalog
//! sorted newest-first; nothing in this module re-sorts it.

mod expire;
mod filter;
mod retain;
mod unwanted;

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::hash::{Hash, Hasher};

pub use expire::expired_versions;
pub use filter::filter_versions;
pub use retain::{RetentionPolicy, retained_versions};
pub use unwanted::unwanted_versions;

/// Registry-assigned identifier, unique within one package.
pub type VersionId = u64;

/// Snapshot of one published package version.
///
/// Equality and hashing only look at [`PackageVersion::id`].
#[derive(Debug, Clone)]
pub struct PackageVersion {
    pub id: VersionId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

impl PackageVersion {
    pub fn is_tagged(&self) -> bool {
        !self.tags.is_empty()
    }
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PackageVersion {}

impl Hash for PackageVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.tags.join(", "))
    }
}

/// Why a version ended up in one of the derived lists. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    TagPattern,
    Untagged,
    Expired(NaiveDate),
    RetainedNewest,
    RetainedTagged,
    RetainedUntagged,
    RetainedUntaggedDrift,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::TagPattern => write!(f, "Tag regex"),
            Reason::Untagged => write!(f, "Untagged"),
            Reason::Expired(created_on) => {
                write!(f, "Expired: created at {}", created_on.format("%a %b %d %Y"))
            }
            Reason::RetainedNewest => {
                write!(f, "Retained newest, impossible to delete all versions")
            }
            Reason::RetainedTagged => write!(f, "Retained tagged"),
            Reason::RetainedUntagged => write!(f, "Retained untagged"),
            Reason::RetainedUntaggedDrift => write!(f, "Retained untagged due to drift"),
        }
    }
}

/// A version paired with the reason it was selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonedPackageVersion {
    pub version: PackageVersion,
    pub reason: Reason,
}

impl ReasonedPackageVersion {
    pub fn new(version: &PackageVersion, reason: Reason) -> Self {
        Self {
            version: version.clone(),
            reason,
        }
    }
}

impl fmt::Display for ReasonedPackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.version, self.reason)
    }
}

/// Drops the reasons, keeping order.
pub fn versions_of(reasoned: &[ReasonedPackageVersion]) -> Vec<PackageVersion> {
    reasoned.iter().map(|r| r.version.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::version;

    #[test]
    fn test_equality_uses_id_only() {
        let a = version(1, "2022-01-01T00:00:00Z", &["latest"]);
        let mut b = version(1, "2023-05-05T00:00:00Z", &[]);
        b.name = "renamed".into();
        assert_eq!(a, b);
        assert_ne!(a, version(2, "2022-01-01T00:00:00Z", &["latest"]));
    }

    #[test]
    fn test_is_tagged() {
        assert!(version(1, "2022-01-01T00:00:00Z", &["v1"]).is_tagged());
        assert!(version(1, "2022-01-01T00:00:00Z", &[""]).is_tagged());
        assert!(!version(1, "2022-01-01T00:00:00Z", &[]).is_tagged());
    }

    #[test]
    fn test_version_display() {
        let v = version(7, "2022-01-01T00:00:00Z", &["v1", "latest"]);
        assert_eq!(v.to_string(), "sha256:7(v1, latest)");

        let untagged = version(8, "2022-01-01T00:00:00Z", &[]);
        assert_eq!(untagged.to_string(), "sha256:8()");
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(Reason::TagPattern.to_string(), "Tag regex");
        assert_eq!(Reason::Untagged.to_string(), "Untagged");
        assert_eq!(
            Reason::Expired(NaiveDate::from_ymd_opt(2022, 1, 2).unwrap()).to_string(),
            "Expired: created at Sun Jan 02 2022"
        );
        assert_eq!(
            Reason::RetainedUntaggedDrift.to_string(),
            "Retained untagged due to drift"
        );
    }

    #[test]
    fn test_reasoned_display_and_versions_of() {
        let v = version(3, "2022-01-01T00:00:00Z", &["v3"]);
        let reasoned = vec![ReasonedPackageVersion::new(&v, Reason::RetainedTagged)];

        assert_eq!(reasoned[0].to_string(), "sha256:3(v3) - Retained tagged");
        assert_eq!(versions_of(&reasoned), vec![v]);
    }
}
