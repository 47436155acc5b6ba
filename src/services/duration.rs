//! Course runtime derivation. Sub-section durations arrive as text from the
//! media pipeline; totals are recomputed on every read, never stored.

/// Best-effort parse of a duration value in seconds. Takes the leading digit
/// run so values like "300s" still count; missing or unparsable text is 0.
pub fn parse_duration_seconds(raw: Option<&str>) -> u64 {
    let digits: String = raw
        .unwrap_or("")
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Render a second count in the platform's human-readable form.
pub fn convert_seconds_to_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_suffixed_values() {
        assert_eq!(parse_duration_seconds(Some("300")), 300);
        assert_eq!(parse_duration_seconds(Some("300s")), 300);
        assert_eq!(parse_duration_seconds(Some("  42 ")), 42);
        assert_eq!(parse_duration_seconds(Some("12.5")), 12);
    }

    #[test]
    fn unparsable_or_missing_values_default_to_zero() {
        assert_eq!(parse_duration_seconds(None), 0);
        assert_eq!(parse_duration_seconds(Some("")), 0);
        assert_eq!(parse_duration_seconds(Some("abc")), 0);
        assert_eq!(parse_duration_seconds(Some("-5")), 0);
    }

    #[test]
    fn renders_each_magnitude() {
        assert_eq!(convert_seconds_to_duration(0), "0s");
        assert_eq!(convert_seconds_to_duration(59), "59s");
        assert_eq!(convert_seconds_to_duration(60), "1m 0s");
        assert_eq!(convert_seconds_to_duration(150), "2m 30s");
        assert_eq!(convert_seconds_to_duration(3600), "1h 0m");
        assert_eq!(convert_seconds_to_duration(9000), "2h 30m");
    }
}
