use std::fmt::Display;

use crate::registry::Owner;
use crate::retention::{PackageVersion, ReasonedPackageVersion};

/// Everything a run computed, stage by stage.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub owner: Owner,
    pub all: Vec<PackageVersion>,
    pub filtered: Vec<ReasonedPackageVersion>,
    pub expired: Vec<ReasonedPackageVersion>,
    pub retained: Vec<ReasonedPackageVersion>,
    pub unwanted: Vec<PackageVersion>,
    pub deleted: Vec<PackageVersion>,
    pub dry_run: bool,
}

impl RunReport {
    /// One-line outcome for the operator.
    pub fn summary(&self) -> String {
        if self.dry_run {
            format!(
                "Dry run: {} of {} version(s) would be deleted.",
                self.unwanted.len(),
                self.all.len()
            )
        } else {
            format!(
                "Deleted {} of {} version(s).",
                self.deleted.len(),
                self.all.len()
            )
        }
    }
}

/// One item per line.
pub fn render_lines<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
