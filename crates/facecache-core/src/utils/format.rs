/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Human readable age of a cache entry ("just now", "12m ago", "2h ago", "3d ago").
pub fn format_age_millis(age_ms: i64) -> String {
    let minutes = age_ms / 60_000;
    if minutes < 1 {
        // Negative ages come from clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Hello", 2), "He");
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age_millis(-5_000), "just now");
        assert_eq!(format_age_millis(30_000), "just now");
        assert_eq!(format_age_millis(12 * 60_000), "12m ago");
        assert_eq!(format_age_millis(90 * 60_000), "2h ago");
        assert_eq!(format_age_millis(70 * 60_000), "1h ago");
        assert_eq!(format_age_millis(36 * 60 * 60_000), "2d ago");
    }
}
