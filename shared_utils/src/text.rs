use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

const WORDS_PER_MINUTE: usize = 200;
const ID_LENGTH: usize = 9;
const LONG_DATE_FORMAT: &str = "%B %-d, %Y";

/// Formats a timestamp in the long form used across the site, e.g. `January 15, 2024`.
#[must_use]
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format(LONG_DATE_FORMAT).to_string()
}

/// Formats an RFC 3339 timestamp or a `YYYY-MM-DD` date in long form.
///
/// Input that parses as neither is returned unchanged.
#[must_use]
pub fn format_date_str(input: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return format_date(&parsed.with_timezone(&Utc));
    }
    match NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        Ok(date) => date.format(LONG_DATE_FORMAT).to_string(),
        Err(_) => input.to_owned(),
    }
}

/// Estimated reading time in whole minutes at 200 words per minute.
///
/// Empty content still counts as one word, so it reads as one minute.
#[must_use]
pub fn estimate_read_time(content: &str) -> usize {
    let words = content.split_whitespace().count().max(1);
    words.div_ceil(WORDS_PER_MINUTE)
}

/// Short random identifier made of lowercase hex characters.
#[must_use]
pub fn generate_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(ID_LENGTH);
    id
}

/// Returns an owned copy of `value` that shares no state with the original.
///
/// Records are plain data (strings, vectors, timestamps), so `Clone` already
/// copies them deeply; this exists so call sites read as intent.
#[must_use]
pub fn deep_clone<T: Clone>(value: &T) -> T {
    value.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    #[test]
    fn formats_long_dates() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap();
        assert_eq!(format_date(&date), "January 15, 2024");
    }

    #[test]
    fn formats_date_strings() {
        assert_eq!(format_date_str("2023-12-28T00:00:00Z"), "December 28, 2023");
        assert_eq!(format_date_str("2023-06-30"), "June 30, 2023");
        assert_eq!(format_date_str("2024-03-01T10:00:00+08:00"), "March 1, 2024");
    }

    #[test]
    fn leaves_unparseable_dates_alone() {
        assert_eq!(format_date_str("sometime soon"), "sometime soon");
        assert_eq!(format_date_str(""), "");
    }

    #[test]
    fn read_time_rounds_up() {
        assert_eq!(estimate_read_time("word"), 1);
        assert_eq!(estimate_read_time(&"word ".repeat(200)), 1);
        assert_eq!(estimate_read_time(&"word ".repeat(201)), 2);
        assert_eq!(estimate_read_time(&"word\n\tword ".repeat(300)), 3);
    }

    #[test]
    fn empty_content_reads_as_one_minute() {
        assert_eq!(estimate_read_time(""), 1);
        assert_eq!(estimate_read_time("   \n "), 1);
    }

    #[test]
    fn generated_ids_are_short_and_distinct() {
        let first = generate_id();
        let second = generate_id();
        assert_eq!(first.len(), 9);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(first, second);
    }

    #[test]
    fn deep_clone_is_independent() {
        let original = vec![vec!["rust".to_owned()], vec!["leptos".to_owned()]];
        let mut copy = deep_clone(&original);
        copy[0].push("axum".to_owned());

        assert_eq!(original[0], vec!["rust".to_owned()]);
        assert_eq!(copy[0].len(), 2);
    }
}
