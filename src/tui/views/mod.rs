pub mod compose;
pub mod dashboard;
pub mod detail;

/// Human-readable timestamp for a record's creation time.
pub(crate) fn created_at_label(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_at_label() {
        assert_eq!(created_at_label(0), "1970-01-01 00:00");
        assert_eq!(created_at_label(i64::MAX), "");
    }
}
