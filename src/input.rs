//! Parsing of raw option strings into typed values.
//!
//! Every failure here is a configuration error: the run stops before any network
//! call with the message returned.

use anyhow::{Context, Result, anyhow, bail};
use regex_lite::Regex;
use std::fmt::Display;
use std::str::FromStr;

use crate::registry::PackageType;

/// Accepts exactly `true` or `false`.
pub fn parse_boolean(value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("Invalid boolean value: {}", value),
    }
}

pub fn parse_non_negative_number<T>(value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let trimmed = value.trim();
    if let Ok(n) = trimmed.parse::<i128>()
        && n < 0
    {
        bail!("Invalid {}, must be >= 0", value);
    }
    trimmed
        .parse::<T>()
        .map_err(|e| anyhow!("Invalid number: {} ({})", value, e))
}

pub fn parse_non_empty_string(value: &str) -> Result<String> {
    if value.trim().is_empty() {
        bail!("Invalid {:?}, must be a non-empty string", value);
    }
    Ok(value.to_string())
}

pub fn parse_tag_regex(value: &str) -> Result<Regex> {
    let pattern = parse_non_empty_string(value)?;
    Regex::new(&pattern).with_context(|| format!("Invalid tag regex: {}", pattern))
}

pub fn parse_package_type(value: &str) -> Result<PackageType> {
    value.parse()
}
