//! Timestamp — turns the raw `Mon DD HH:MM:SS` capture into a reference time.
//!
//! Syslog timestamps carry neither year nor zone; both come from the time the
//! message was received.

use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::parser::Fields;

/// Zone assumed for timestamps that do not carry one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceZone {
    #[default]
    Utc,
    Local,
}

impl FromStr for ReferenceZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utc" => Ok(ReferenceZone::Utc),
            "local" => Ok(ReferenceZone::Local),
            other => Err(format!("unknown reference zone: {other}")),
        }
    }
}

impl ReferenceZone {
    fn localize(&self, received: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            ReferenceZone::Utc => received.fixed_offset(),
            ReferenceZone::Local => received.with_timezone(&Local).fixed_offset(),
        }
    }

    fn assume(&self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            ReferenceZone::Utc => Some(Utc.from_utc_datetime(naive).fixed_offset()),
            ReferenceZone::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
        }
    }
}

/// Reference time for a parsed message: the `timestamp` field placed in the
/// receipt year and `zone`, or the receipt time itself when the field is
/// absent or unreadable.
pub fn resolve_reference_time(
    fields: &Fields,
    received: DateTime<Utc>,
    zone: ReferenceZone,
) -> DateTime<FixedOffset> {
    let received = zone.localize(received);
    fields
        .str_field("timestamp")
        .ok()
        .and_then(|raw| parse_syslog_timestamp(raw, received.year()))
        .and_then(|naive| zone.assume(&naive))
        .unwrap_or(received)
}

/// Parse `Mon DD HH:MM:SS[.frac]` in the given year.
pub fn parse_syslog_timestamp(raw: &str, year: i32) -> Option<NaiveDateTime> {
    let mut parts = raw.split_whitespace();
    let month = month_number(parts.next()?)?;
    let day: u32 = parts.next()?.parse().ok()?;
    let clock = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let mut hms = clock.splitn(3, ':');
    let hour: u32 = hms.next()?.parse().ok()?;
    let minute: u32 = hms.next()?.parse().ok()?;
    let rest = hms.next()?;
    let (second, fraction) = match rest.find(|c| matches!(c, '.' | ',' | ':')) {
        Some(i) => (&rest[..i], Some(&rest[i + 1..])),
        None => (rest, None),
    };
    let mut second: u32 = second.parse().ok()?;
    let mut nanos = match fraction {
        Some(digits) => fraction_nanos(digits)?,
        None => 0,
    };
    // leap second
    if second == 60 {
        second = 59;
        nanos += 1_000_000_000;
    }

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_nano_opt(hour, minute, second, nanos)
}

fn fraction_nanos(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let significant = &digits[..digits.len().min(9)];
    let value: u32 = significant.parse().ok()?;
    Some(value * 10u32.pow(9 - significant.len() as u32))
}

/// Month number for any spelling the marker pattern accepts
/// (`Jan`, `January`, `Mär`, `Mrz`, `Mai`, `Okt`, `Dez`, ...).
fn month_number(token: &str) -> Option<u32> {
    let t = token.to_lowercase();
    let month = if t.starts_with("jan") {
        1
    } else if t.starts_with("feb") {
        2
    } else if t.starts_with("apr") {
        4
    } else if t.starts_with("jun") {
        6
    } else if t.starts_with("jul") {
        7
    } else if t.starts_with("aug") {
        8
    } else if t.starts_with("sep") {
        9
    } else if t.starts_with("nov") {
        11
    } else if t.starts_with("de") {
        12
    } else if t.starts_with('o') {
        10
    } else if t.starts_with('m') {
        // March spellings all contain an 'r', May/Mai never do
        if t.contains('r') {
            3
        } else {
            5
        }
    } else {
        return None;
    };
    Some(month)
}
