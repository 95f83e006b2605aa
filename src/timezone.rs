//! Resolving the configured timezone name to the local calendar date.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The current calendar date in the timezone `local_timezone`.
///
/// `local_timezone` should be a canonical timezone name, e.g.
/// "Pacific/Auckland".
///
/// # Errors
///
/// Returns an [Error::InvalidTimezone] if `local_timezone` is not a canonical
/// timezone name.
pub fn local_date_today(local_timezone: &str) -> Result<Date, Error> {
    let local_offset = get_local_offset(local_timezone).ok_or_else(|| {
        tracing::error!("could not get local time offset from timezone {local_timezone}");
        Error::InvalidTimezone(local_timezone.to_owned())
    })?;

    Ok(OffsetDateTime::now_utc().to_offset(local_offset).date())
}

#[cfg(test)]
mod timezone_tests {
    use crate::Error;

    use super::{get_local_offset, local_date_today};

    #[test]
    fn resolves_canonical_timezone() {
        assert!(get_local_offset("Pacific/Auckland").is_some());
        assert!(local_date_today("Etc/UTC").is_ok());
    }

    #[test]
    fn rejects_unknown_timezone() {
        assert_eq!(
            local_date_today("Atlantis/Underwater"),
            Err(Error::InvalidTimezone("Atlantis/Underwater".to_owned()))
        );
    }
}
