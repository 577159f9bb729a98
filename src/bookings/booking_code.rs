use chrono::{Datelike, NaiveDate};

/// Highest queue number the 8-character booking code can encode. The
/// allocator rejects allocations past this instead of truncating the code.
pub const MAX_QUEUE_NO: i32 = 99;

/// Six-digit day prefix (YYMMDD) shared by all booking codes of one
/// calendar day.
pub fn day_prefix(date: NaiveDate) -> String {
    format!(
        "{:02}{:02}{:02}",
        date.year() % 100,
        date.month(),
        date.day()
    )
}

/// Generate the human-facing booking code: YYMMDD + 2-digit queue number.
///
/// Deterministic, so the same (date, queue number) pair always maps back to
/// the same printed ticket. Callers must keep `queue_no` within
/// `1..=MAX_QUEUE_NO`; the allocator enforces this.
pub fn generate(date: NaiveDate, queue_no: i32) -> String {
    debug_assert!((1..=MAX_QUEUE_NO).contains(&queue_no));
    format!("{}{:02}", day_prefix(date), queue_no)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_prefix_zero_pads() {
        assert_eq!(day_prefix(date(2024, 6, 1)), "240601");
        assert_eq!(day_prefix(date(2025, 12, 31)), "251231");
        assert_eq!(day_prefix(date(2030, 1, 9)), "300109");
    }

    #[test]
    fn test_generate_matches_worked_example() {
        let d = date(2024, 6, 1);
        assert_eq!(generate(d, 1), "24060101");
        assert_eq!(generate(d, 4), "24060104");
    }

    #[test]
    fn test_generate_pads_queue_number() {
        assert_eq!(generate(date(2024, 6, 8), 9), "24060809");
        assert_eq!(generate(date(2024, 6, 8), 17), "24060817");
    }

    #[test]
    fn test_generate_is_deterministic() {
        let d = date(2024, 11, 20);
        assert_eq!(generate(d, 13), generate(d, 13));
    }

    #[test]
    fn test_code_starts_with_day_prefix() {
        let d = date(2026, 2, 3);
        assert!(generate(d, 22).starts_with(&day_prefix(d)));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Codes are always 8 characters and decode back to the exact
    /// (day prefix, queue number) pair, i.e. generation is injective over
    /// queue numbers up to the ceiling.
    #[test]
    fn prop_code_round_trips() {
        proptest!(|(
            year in 2020i32..=2099,
            month in 1u32..=12,
            day in 1u32..=28,
            queue_no in 1i32..=MAX_QUEUE_NO
        )| {
            let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
            let code = generate(date, queue_no);
            let prefix = day_prefix(date);

            prop_assert_eq!(code.len(), 8);
            prop_assert_eq!(&code[..6], prefix.as_str());
            prop_assert_eq!(code[6..].parse::<i32>().unwrap(), queue_no);
        });
    }

    /// Distinct queue numbers on the same day never collide.
    #[test]
    fn prop_codes_distinct_within_day() {
        proptest!(|(
            a in 1i32..=MAX_QUEUE_NO,
            b in 1i32..=MAX_QUEUE_NO
        )| {
            let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
            if a != b {
                prop_assert_ne!(generate(date, a), generate(date, b));
            }
        });
    }
}
