/// Format seconds into a compact human-readable duration (e.g. 59s, 1m, 1h, 1d, 1h 30m).
pub fn format_compact_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        return if hours > 0 {
            format!("{}d {}h", days, hours)
        } else {
            format!("{}d", days)
        };
    }

    if hours > 0 {
        return if minutes > 0 {
            format!("{}h {}m", hours, minutes)
        } else {
            format!("{}h", hours)
        };
    }

    if minutes > 0 {
        return if seconds > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}m", minutes)
        };
    }

    format!("{}s", seconds)
}

/// Label a rolling window length for user-facing text ("1 day", "7 days").
pub fn window_label_days(days: u64) -> String {
    if days == 1 {
        "1 day".to_owned()
    } else {
        format!("{} days", days)
    }
}

/// Escape mentions in user-controlled text before echoing it back.
pub fn sanitize_mentions(raw: &str) -> String {
    raw.replace('@', "@\u{200B}")
}

#[cfg(test)]
mod tests {
    use super::{format_compact_duration, sanitize_mentions, window_label_days};

    #[test]
    fn compact_duration_formatting() {
        assert_eq!(format_compact_duration(0), "0s");
        assert_eq!(format_compact_duration(59), "59s");
        assert_eq!(format_compact_duration(60), "1m");
        assert_eq!(format_compact_duration(61), "1m 1s");
        assert_eq!(format_compact_duration(3600), "1h");
        assert_eq!(format_compact_duration(3660), "1h 1m");
        assert_eq!(format_compact_duration(86400), "1d");
        assert_eq!(format_compact_duration(90000), "1d 1h");
        assert_eq!(format_compact_duration(7 * 86400), "7d");
    }

    #[test]
    fn window_labels_pluralize() {
        assert_eq!(window_label_days(1), "1 day");
        assert_eq!(window_label_days(7), "7 days");
    }

    #[test]
    fn mentions_are_neutralized() {
        assert_eq!(sanitize_mentions("@everyone"), "@\u{200B}everyone");
        assert_eq!(sanitize_mentions("plain"), "plain");
    }
}
