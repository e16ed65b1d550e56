//! Time formatting and parsing helpers

use std::time::Duration;

/// Format a number of seconds as `MM:SS`, or `HH:MM:SS` when `show_hours`.
///
/// Fractional seconds are truncated. Negative input saturates to zero.
pub fn format_clock(seconds: f64, show_hours: bool) -> String {
    let secs = seconds as u64;
    let hours = secs / 3600;
    let rem = secs % 3600;
    let mins = rem / 60;
    let secs = rem % 60;

    if show_hours {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Format a duration, showing hours only if it needs them
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    format_clock(secs, needs_hours(duration))
}

/// Whether a clock for this duration has to show an hours field
pub fn needs_hours(duration: Duration) -> bool {
    duration.as_secs() >= 3600
}

/// Parse a duration given in minutes.
///
/// Accepts a bare number of minutes (`25`, `0.5`) or a sequence of
/// unit-suffixed parts (`90s`, `25m`, `1h30m`, `1h 15m 30s`).
pub fn parse_minutes(text: &str) -> Result<f64, String> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return Err("empty duration".to_string());
    }

    if let Ok(minutes) = text.parse::<f64>() {
        return check_minutes(minutes, &text);
    }

    let mut total = 0.0;
    let mut number = String::new();
    for ch in text.chars() {
        match ch {
            '0'..='9' | '.' => number.push(ch),
            'h' | 'm' | 's' => {
                let value: f64 = number
                    .parse()
                    .map_err(|_| format!("invalid duration '{}'", text))?;
                total += match ch {
                    'h' => value * 60.0,
                    'm' => value,
                    _ => value / 60.0,
                };
                number.clear();
            }
            c if c.is_whitespace() => {}
            _ => return Err(format!("invalid duration '{}'", text)),
        }
    }

    // Trailing bare number counts as minutes ("1h30")
    if !number.is_empty() {
        total += number
            .parse::<f64>()
            .map_err(|_| format!("invalid duration '{}'", text))?;
    }

    check_minutes(total, &text)
}

fn check_minutes(minutes: f64, text: &str) -> Result<f64, String> {
    if minutes.is_finite() && minutes > 0.0 {
        Ok(minutes)
    } else {
        Err(format!("duration must be positive, got '{}'", text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0, false), "00:00");
        assert_eq!(format_clock(59.0, false), "00:59");
        assert_eq!(format_clock(3661.0, true), "01:01:01");
        assert_eq!(format_clock(25.0 * 60.0, false), "25:00");
    }

    #[test]
    fn test_format_clock_truncates_fractions() {
        assert_eq!(format_clock(59.999, false), "00:59");
        assert_eq!(format_clock(-3.0, false), "00:00");
    }

    #[test]
    fn test_format_clock_without_hours_drops_them() {
        assert_eq!(format_clock(3661.0, false), "01:01");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(300)), "05:00");
        assert_eq!(format_duration(Duration::from_secs(5400)), "01:30:00");
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes("25"), Ok(25.0));
        assert_eq!(parse_minutes("0.5"), Ok(0.5));
        assert_eq!(parse_minutes("25m"), Ok(25.0));
        assert_eq!(parse_minutes("90s"), Ok(1.5));
        assert_eq!(parse_minutes("1h30m"), Ok(90.0));
        assert_eq!(parse_minutes("1H 15M 30S"), Ok(75.5));
        assert_eq!(parse_minutes("1h30"), Ok(90.0));
    }

    #[test]
    fn test_parse_minutes_rejects_garbage() {
        assert!(parse_minutes("").is_err());
        assert!(parse_minutes("abc").is_err());
        assert!(parse_minutes("5x").is_err());
        assert!(parse_minutes("0").is_err());
        assert!(parse_minutes("-5").is_err());
        assert!(parse_minutes("m").is_err());
    }
}
