use chrono::{DateTime, Utc};

/// One row of the age table: durations below `limit` seconds are shown as
/// `duration / divisor` followed by `unit`.
struct AgeUnit {
    /// Exclusive upper bound in seconds; `None` matches everything.
    limit: Option<i64>,
    divisor: i64,
    unit: &'static str,
    /// Render with one decimal place (trailing ".0" dropped).
    fractional: bool,
}

const fn row(limit: i64, divisor: i64, unit: &'static str, fractional: bool) -> AgeUnit {
    AgeUnit {
        limit: Some(limit),
        divisor,
        unit,
        fractional,
    }
}

/// Evaluated top to bottom; the first row whose limit exceeds the duration wins.
const AGE_TABLE: &[AgeUnit] = &[
    row(60, 1, "s", false),
    row(600, 60, "m", true),
    row(3_600, 60, "m", false),
    row(21_600, 3_600, "h", true),
    row(86_400, 3_600, "h", false),
    row(604_800, 86_400, "d", true),
    row(2_419_200, 604_800, "w", true),
    row(29_030_400, 2_592_000, "mo", true),
    AgeUnit {
        limit: None,
        divisor: 31_536_000,
        unit: "y",
        fractional: true,
    },
];

/// Compact relative age of `published` as seen at `now` (e.g. "45s", "2.1m",
/// "3h", "1.4w").
///
/// Future timestamps are treated as zero seconds old.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use triage::util::format_age;
///
/// let now = Utc::now();
/// assert_eq!(format_age(now, now - Duration::seconds(125)), "2.1m");
/// assert_eq!(format_age(now, now + Duration::hours(1)), "0s");
/// ```
pub fn format_age(now: DateTime<Utc>, published: DateTime<Utc>) -> String {
    let duration = (now - published).num_seconds().max(0);

    let unit = AGE_TABLE
        .iter()
        .find(|u| u.limit.map_or(true, |limit| duration < limit))
        .unwrap_or(&AGE_TABLE[AGE_TABLE.len() - 1]);

    if unit.fractional {
        let value = format!("{:.1}", duration as f64 / unit.divisor as f64);
        let value = value.strip_suffix(".0").unwrap_or(&value);
        format!("{}{}", value, unit.unit)
    } else {
        format!("{}{}", duration / unit.divisor, unit.unit)
    }
}
