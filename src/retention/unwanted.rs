use std::collections::HashSet;

use super::{PackageVersion, VersionId};

/// Expired versions that are not retained, in the order of `expired`.
pub fn unwanted_versions(
    expired: &[PackageVersion],
    retained: &[PackageVersion],
) -> Vec<PackageVersion> {
    let retained_ids: HashSet<VersionId> = retained.iter().map(|v| v.id).collect();

    expired
        .iter()
        .filter(|version| !retained_ids.contains(&version.id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::version;

    #[test]
    fn test_nothing_retained() {
        let expired = vec![
            version(2, "2022-01-02T00:00:00Z", &[]),
            version(1, "2022-01-01T00:00:00Z", &[]),
        ];
        assert_eq!(unwanted_versions(&expired, &[]), expired);
    }

    #[test]
    fn test_retained_are_removed_and_order_kept() {
        let expired = vec![
            version(1, "2022-01-01T00:00:00Z", &[]),
            version(4, "2022-01-04T00:00:00Z", &["v4"]),
            version(2, "2022-01-02T00:00:00Z", &[]),
            version(3, "2022-01-03T00:00:00Z", &["v3"]),
        ];
        let retained = vec![
            version(3, "2022-01-03T00:00:00Z", &["v3"]),
            version(9, "2022-01-09T00:00:00Z", &["v9"]),
            version(1, "2022-01-01T00:00:00Z", &[]),
        ];

        let ids: Vec<_> = unwanted_versions(&expired, &retained)
            .iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, vec![4, 2]);
    }

    #[test]
    fn test_nothing_expired() {
        let retained = vec![version(1, "2022-01-01T00:00:00Z", &[])];
        assert!(unwanted_versions(&[], &retained).is_empty());
    }
}
