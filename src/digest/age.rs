use chrono::Duration;

const MINUTES_IN_DAY: i64 = 1_440;
const MINUTES_IN_ALMOST_TWO_DAYS: i64 = 2_520;
const MINUTES_IN_MONTH: i64 = 43_200;
const MINUTES_IN_TWO_MONTHS: i64 = 86_400;

/// Age shown for a pull request whose review request could not be dated.
pub const UNKNOWN_AGE: &str = "unknown";

/// Describe an elapsed time in words, e.g. "about 3 hours" or "10 days".
///
/// Months are counted as 30 days. The sign of `elapsed` is ignored.
pub fn format_distance(elapsed: Duration) -> String {
    let seconds = elapsed.num_seconds().abs();
    let minutes = round_div(seconds, 60);

    if minutes < 2 {
        if minutes == 0 {
            "less than a minute".to_string()
        } else {
            "1 minute".to_string()
        }
    } else if minutes < 45 {
        format!("{} minutes", minutes)
    } else if minutes < 90 {
        "about 1 hour".to_string()
    } else if minutes < MINUTES_IN_DAY {
        format!("about {} hours", round_div(minutes, 60))
    } else if minutes < MINUTES_IN_ALMOST_TWO_DAYS {
        "1 day".to_string()
    } else if minutes < MINUTES_IN_MONTH {
        format!("{} days", round_div(minutes, MINUTES_IN_DAY))
    } else if minutes < MINUTES_IN_TWO_MONTHS {
        let months = round_div(minutes, MINUTES_IN_MONTH);
        format!("about {}", plural(months, "month"))
    } else {
        let months = minutes / MINUTES_IN_MONTH;
        if months < 12 {
            format!("{} months", round_div(minutes, MINUTES_IN_MONTH))
        } else {
            let years = months / 12;
            match months % 12 {
                0..=2 => format!("about {}", plural(years, "year")),
                3..=8 => format!("over {}", plural(years, "year")),
                _ => format!("almost {}", plural(years + 1, "year")),
            }
        }
    }
}

// Half-up rounding for non-negative integers.
fn round_div(n: i64, d: i64) -> i64 {
    (n + d / 2) / d
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}
