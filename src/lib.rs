pub mod commands;
pub mod http;
pub mod input;
pub mod registry;
pub mod retention;
pub mod runtime;

/// Test fixtures shared across modules.
#[cfg(test)]
pub mod test_utils {
    use crate::retention::PackageVersion;
    use chrono::{DateTime, Utc};

    /// Parses an RFC 3339 timestamp.
    pub fn at(timestamp: &str) -> DateTime<Utc> {
        timestamp.parse().unwrap()
    }

    /// A version named `sha256:<id>`, last updated when it was created.
    pub fn version(id: u64, created_at: &str, tags: &[&str]) -> PackageVersion {
        let created_at = at(created_at);
        PackageVersion {
            id,
            name: format!("sha256:{}", id),
            created_at,
            updated_at: created_at,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}
