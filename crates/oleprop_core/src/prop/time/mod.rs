//! Calendar conversions for the two timestamp encodings.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::prop::{FileTime, PropError, Result};

/// Seconds between 1601-01-01 and 1970-01-01.
const EPOCH_DIFF_SECS: i64 = 11_644_473_600;
const TICKS_PER_SEC: i64 = 10_000_000;
const NANOS_PER_TICK: i64 = 100;
const MILLIS_PER_DAY: i64 = 86_400_000;
/// Exclusive bounds of the day count, years 100 and 10000.
const OA_DATE_MIN: f64 = -657_435.0;
const OA_DATE_MAX: f64 = 2_958_466.0;

/// Signed 100ns ticks since 1601-01-01 UTC; sub-tick precision is truncated.
pub fn to_file_time(dt: DateTime<Utc>) -> i64 {
	let secs = dt.timestamp().saturating_add(EPOCH_DIFF_SECS);
	let ticks = i64::from(dt.timestamp_subsec_nanos()) / NANOS_PER_TICK;
	secs.saturating_mul(TICKS_PER_SEC).saturating_add(ticks)
}

/// Tick count for a calendar date; instants before 1601 clamp to zero.
pub fn to_positive_file_time(dt: DateTime<Utc>) -> FileTime {
	let ticks = to_file_time(dt);
	FileTime(if ticks < 0 { 0 } else { ticks as u64 })
}

/// Calendar instant for a tick count.
pub fn from_file_time(ft: FileTime) -> Result<DateTime<Utc>> {
	let ticks = i64::try_from(ft.0).map_err(|_| PropError::InvalidFileTime { ticks: ft.0 })?;
	let secs = ticks.div_euclid(TICKS_PER_SEC) - EPOCH_DIFF_SECS;
	let nanos = (ticks.rem_euclid(TICKS_PER_SEC) * NANOS_PER_TICK) as u32;
	DateTime::from_timestamp(secs, nanos).ok_or(PropError::InvalidFileTime { ticks: ft.0 })
}

fn oa_base() -> DateTime<Utc> {
	NaiveDate::from_ymd_opt(1899, 12, 30)
		.and_then(|date| date.and_hms_opt(0, 0, 0))
		.map(|naive| naive.and_utc())
		.unwrap_or(DateTime::UNIX_EPOCH)
}

/// Calendar instant for an OLE Automation day count.
///
/// Negative values keep their fractional part as a positive time of day, so
/// `-1.25` is 1899-12-29 06:00.
pub fn from_ole_date(value: f64) -> Result<DateTime<Utc>> {
	if !(value > OA_DATE_MIN && value < OA_DATE_MAX) {
		return Err(PropError::InvalidDate { value });
	}

	let rounding = if value >= 0.0 { 0.5 } else { -0.5 };
	let mut millis = (value * MILLIS_PER_DAY as f64 + rounding) as i64;
	if millis < 0 {
		millis -= (millis % MILLIS_PER_DAY) * 2;
	}

	oa_base()
		.checked_add_signed(TimeDelta::milliseconds(millis))
		.ok_or(PropError::InvalidDate { value })
}

/// OLE Automation day count for a calendar instant, at millisecond precision.
pub fn to_ole_date(dt: DateTime<Utc>) -> Result<f64> {
	let mut millis = (dt - oa_base()).num_milliseconds();
	if millis < 0 {
		let frac = millis % MILLIS_PER_DAY;
		if frac != 0 {
			millis -= (MILLIS_PER_DAY + frac) * 2;
		}
	}

	let value = millis as f64 / MILLIS_PER_DAY as f64;
	if !(value > OA_DATE_MIN && value < OA_DATE_MAX) {
		return Err(PropError::InvalidDate { value });
	}
	Ok(value)
}
