use chrono::{DateTime, NaiveTime, TimeDelta, TimeZone, Utc};

use super::{PackageVersion, Reason, ReasonedPackageVersion};

/// Selects the versions created strictly before the expiration cutoff.
///
/// The cutoff is `now` minus `expire_period_days`, moved back to the start of that
/// day in `now`'s timezone. A period of zero therefore expires everything created
/// before today. The reason carries the creation date as seen in the same timezone.
pub fn expired_versions<Tz: TimeZone>(
    versions: &[PackageVersion],
    expire_period_days: u32,
    now: &DateTime<Tz>,
) -> Vec<ReasonedPackageVersion> {
    let Some(cutoff) = expiration_cutoff(expire_period_days, now) else {
        return Vec::new();
    };
    let tz = now.timezone();

    versions
        .iter()
        .filter(|version| version.created_at < cutoff)
        .map(|version| {
            let created_on = version.created_at.with_timezone(&tz).date_naive();
            ReasonedPackageVersion::new(version, Reason::Expired(created_on))
        })
        .collect()
}

/// `None` when the period reaches past the representable calendar; nothing can be
/// older than that.
fn expiration_cutoff<Tz: TimeZone>(
    expire_period_days: u32,
    now: &DateTime<Tz>,
) -> Option<DateTime<Utc>> {
    let shifted = now
        .clone()
        .checked_sub_signed(TimeDelta::days(i64::from(expire_period_days)))?;
    let start = start_of_day(&shifted).unwrap_or(shifted);
    Some(start.with_timezone(&Utc))
}

fn start_of_day<Tz: TimeZone>(moment: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let tz = moment.timezone();
    let midnight = moment.date_naive().and_time(NaiveTime::MIN);

    // Midnight can fall into a DST gap; use the first hour that exists locally.
    (0..24i64).find_map(|hour| {
        let local = midnight.checked_add_signed(TimeDelta::hours(hour))?;
        tz.from_local_datetime(&local).earliest()
    })
}
