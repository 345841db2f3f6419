use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};

static EMOJI_REPLACER: LazyLock<gh_emoji::Replacer> = LazyLock::new(gh_emoji::Replacer::new);

/// Expand GitHub emoji shortcodes (e.g. `:tada:`) in issue titles.
pub(crate) fn expand_emoji(text: &str) -> Cow<'_, str> {
    EMOJI_REPLACER.replace_all(text)
}

/// Format a timestamp per `date_format`: `"relative"` (or empty) gives
/// `"2h"`, `"3d"`, …; anything else is a strftime pattern.
pub(crate) fn format_date(dt: Option<&DateTime<Utc>>, date_format: &str) -> String {
    let Some(dt) = dt else {
        return String::new();
    };
    if date_format.is_empty() || date_format == "relative" {
        format_relative(Utc::now().signed_duration_since(dt))
    } else {
        dt.format(date_format).to_string()
    }
}

fn format_relative(elapsed: chrono::TimeDelta) -> String {
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "now".to_owned();
    }
    if minutes < 60 {
        return format!("{minutes}m");
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{hours}h");
    }
    match elapsed.num_days() {
        d if d < 7 => format!("{d}d"),
        d if d < 30 => format!("{}w", d / 7),
        d if d < 365 => format!("{}mo", d / 30),
        d => format!("{}y", d / 365),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    #[test]
    fn known_shortcode_is_expanded() {
        assert_eq!(expand_emoji("Crash :bug:").as_ref(), "Crash \u{1f41b}");
    }

    #[test]
    fn text_without_shortcodes_is_borrowed() {
        assert!(matches!(expand_emoji("Plain title"), Cow::Borrowed(_)));
    }

    #[test]
    fn relative_buckets() {
        assert_eq!(format_relative(TimeDelta::seconds(20)), "now");
        assert_eq!(format_relative(TimeDelta::minutes(5)), "5m");
        assert_eq!(format_relative(TimeDelta::hours(3)), "3h");
        assert_eq!(format_relative(TimeDelta::days(2)), "2d");
        assert_eq!(format_relative(TimeDelta::days(15)), "2w");
        assert_eq!(format_relative(TimeDelta::days(90)), "3mo");
        assert_eq!(format_relative(TimeDelta::days(800)), "2y");
    }

    #[test]
    fn strftime_pattern_is_applied() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(format_date(Some(&dt), "%Y-%m-%d"), "2024-03-01");
        assert_eq!(format_date(None, "%Y-%m-%d"), "");
    }
}
