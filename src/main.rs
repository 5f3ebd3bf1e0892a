use anyhow::Result;
use clap::{ArgAction, Parser};
use ghcr_prune::commands::{RunOptions, prune};
use ghcr_prune::input::{
    parse_boolean, parse_non_empty_string, parse_non_negative_number, parse_package_type,
    parse_tag_regex,
};
use ghcr_prune::registry::PackageType;
use regex_lite::Regex;

/// ghcr-prune - retention-based cleanup of GitHub Packages versions
///
/// Lists every version of a package, selects the ones matching the tag regex
/// (and optionally untagged ones), and deletes those older than the expire period
/// that are not retained by the tagged quota or the untagged drift window.
///
/// The GITHUB_TOKEN environment variable must hold a token with the
/// read:packages and delete:packages scopes.
///
/// Examples:
///   ghcr-prune --owner acme --package-name app --tag-regex '^pr-' \
///     --expire-period-days 14 --retained-tagged-top 5 --dry-run true
#[derive(Parser, Debug)]
#[command(author, version = env!("GHCR_PRUNE_VERSION"), about)]
struct Cli {
    /// User or organization owning the package
    #[arg(long, value_parser = parse_non_empty_string)]
    owner: String,

    /// Package name, e.g. the container image name
    #[arg(long, value_parser = parse_non_empty_string)]
    package_name: String,

    /// Package type
    #[arg(long, default_value = "container", value_parser = parse_package_type)]
    package_type: PackageType,

    /// Versions with a tag matching this regex are candidates for deletion
    #[arg(long, value_parser = parse_tag_regex)]
    tag_regex: Regex,

    /// Also treat untagged versions as candidates (true/false)
    #[arg(long, action = ArgAction::Set, default_value = "false", value_parser = parse_boolean)]
    untagged: bool,

    /// Candidates created before the start of the day this many days ago are expired
    #[arg(long, value_parser = parse_non_negative_number::<u32>)]
    expire_period_days: u32,

    /// Number of newest tagged candidates to keep regardless of age
    #[arg(long, value_parser = parse_non_negative_number::<usize>)]
    retained_tagged_top: usize,

    /// Keep untagged candidates near retained tagged ones (true/false)
    #[arg(long, action = ArgAction::Set, default_value = "false", value_parser = parse_boolean)]
    retain_untagged: bool,

    /// Drift window in seconds for keeping untagged candidates
    #[arg(long, default_value = "600", value_parser = parse_non_negative_number::<u64>)]
    retain_untagged_drift_seconds: u64,

    /// Report what would be deleted without deleting (true/false)
    #[arg(long, action = ArgAction::Set, default_value = "false", value_parser = parse_boolean)]
    dry_run: bool,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", env = "GITHUB_API_URL", value_name = "URL")]
    api_url: Option<String>,
}

impl Cli {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            owner: self.owner.clone(),
            package_name: self.package_name.clone(),
            package_type: self.package_type,
            tag_regex: self.tag_regex.clone(),
            untagged: self.untagged,
            expire_period_days: self.expire_period_days,
            retained_tagged_top: self.retained_tagged_top,
            retain_untagged: self.retain_untagged,
            retain_untagged_drift_seconds: self.retain_untagged_drift_seconds,
            dry_run: self.dry_run,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,ghcr_prune=info"),
    )
    .init();
    let cli = Cli::parse();
    let runtime = ghcr_prune::runtime::RealRuntime;

    let report = prune(runtime, &cli.run_options(), cli.api_url.clone()).await?;
    println!("{}", report.summary());
    Ok(())
}
