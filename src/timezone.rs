//! Conversion of canonical timezone names to UTC offsets.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// Get the current UTC offset of `canonical_timezone`, e.g. "Asia/Shanghai".
///
/// Returns `None` if the timezone name is not known.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    local_offset_at(canonical_timezone, OffsetDateTime::now_utc())
}

fn local_offset_at(canonical_timezone: &str, date_time: OffsetDateTime) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&date_time).to_utc())
}

/// Like [get_local_offset], but logs and returns an error for unknown timezones.
pub(crate) fn require_local_offset(canonical_timezone: &str) -> Result<UtcOffset, Error> {
    get_local_offset(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {canonical_timezone}");
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })
}
