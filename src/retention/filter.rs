use regex_lite::Regex;

use super::{PackageVersion, Reason, ReasonedPackageVersion};

/// Selects the versions eligible for lifecycle management, keeping input order.
///
/// A version with any tag matching `tag_pattern` is selected as
/// [`Reason::TagPattern`]. Otherwise an untagged version is selected as
/// [`Reason::Untagged`] when `include_untagged` is set. Everything else is left out.
pub fn filter_versions(
    versions: &[PackageVersion],
    tag_pattern: &Regex,
    include_untagged: bool,
) -> Vec<ReasonedPackageVersion> {
    versions
        .iter()
        .filter_map(|version| {
            if version.tags.iter().any(|tag| tag_pattern.is_match(tag)) {
                Some(ReasonedPackageVersion::new(version, Reason::TagPattern))
            } else if include_untagged && !version.is_tagged() {
                Some(ReasonedPackageVersion::new(version, Reason::Untagged))
            } else {
                None
            }
        })
        .collect()
}
