use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Days, NaiveDate};

use crate::{
    helpers::month_name,
    model::{DailyActivityMap, MonthlyActivity, StreakStats},
    types::RawTransactionRecord,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Group records by UTC calendar day, optionally restricted to an
/// inclusive date range. Records without a timestamp are skipped.
pub fn bucket_by_day(
    records: &[RawTransactionRecord],
    range: Option<(NaiveDate, NaiveDate)>,
) -> DailyActivityMap {
    let mut daily = DailyActivityMap::new();

    for record in records {
        let Some(date) = record_date(record) else {
            continue;
        };
        if let Some((start, end)) = range {
            if date < start || date > end {
                continue;
            }
        }
        *daily.entry(date.format(DATE_FORMAT).to_string()).or_insert(0) += 1;
    }

    daily
}

/// Day-level streaks over the sorted key set of the daily map.
pub fn compute_streaks(
    daily: &DailyActivityMap,
    today: NaiveDate,
) -> StreakStats {
    let dates: Vec<NaiveDate> = daily
        .keys()
        .filter_map(|key| NaiveDate::parse_from_str(key, DATE_FORMAT).ok())
        .collect();

    // walk backward from today; a gap at today itself means no streak
    let mut current_streak = 0;
    let mut cursor = today;
    while dates.binary_search(&cursor).is_ok() {
        current_streak += 1;
        match cursor.checked_sub_days(Days::new(1)) {
            Some(previous) => cursor = previous,
            None => break,
        }
    }

    let mut longest_streak = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for date in &dates {
        run = match previous {
            Some(previous)
                if previous.checked_add_days(Days::new(1))
                    == Some(*date) =>
            {
                run + 1
            }
            _ => 1,
        };
        longest_streak = longest_streak.max(run);
        previous = Some(*date);
    }

    StreakStats {
        current_streak,
        longest_streak,
        total_active_days: dates.len() as u64,
    }
}

/// Calendar-month histogram; ties for the busiest month resolve to the
/// lowest month number.
pub fn bucket_by_month(records: &[RawTransactionRecord]) -> MonthlyActivity {
    let mut counts = [0u64; 12];

    for record in records {
        if let Some(date) = record_date(record) {
            counts[date.month0() as usize] += 1;
        }
    }

    let mut busiest_month = 1;
    let mut busiest_month_count = 0;
    for (index, count) in counts.iter().enumerate() {
        if *count > busiest_month_count {
            busiest_month_count = *count;
            busiest_month = index as u32 + 1;
        }
    }

    let mut month_counts = BTreeMap::new();
    for (index, count) in counts.iter().enumerate() {
        month_counts.insert(index as u32 + 1, *count);
    }

    MonthlyActivity {
        month_counts,
        busiest_month,
        busiest_month_name: month_name(busiest_month).to_owned(),
        busiest_month_count,
    }
}

fn record_date(record: &RawTransactionRecord) -> Option<NaiveDate> {
    let timestamp = record.timestamp?;
    Some(DateTime::from_timestamp(timestamp, 0)?.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    use crate::types::{Address, RecordSource};

    fn record_at(timestamp: Option<i64>) -> RawTransactionRecord {
        RawTransactionRecord {
            hash: format!("0x{:x}", timestamp.unwrap_or(0)),
            from: Address::ZERO,
            to: None,
            value_wei: BigUint::default(),
            gas_used: None,
            gas_price_wei: None,
            timestamp,
            source: RecordSource::NativeList,
            logs: Vec::new(),
        }
    }

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_bucket_by_day() {
        let records = vec![
            record_at(Some(1704067200)), // 2024-01-01T00:00:00Z
            record_at(Some(1704100000)), // still 2024-01-01
            record_at(Some(1704153600)), // 2024-01-02
            record_at(None),
        ];
        let daily = bucket_by_day(&records, None);
        assert_eq!(daily.get("2024-01-01"), Some(&2));
        assert_eq!(daily.get("2024-01-02"), Some(&1));
        assert_eq!(daily.len(), 2);
    }

    #[test]
    fn test_bucket_by_day_range_filter() {
        let records = vec![
            record_at(Some(1704067200)), // 2024-01-01
            record_at(Some(1704153600)), // 2024-01-02
        ];
        let daily = bucket_by_day(
            &records,
            Some((date("2024-01-02"), date("2024-01-31"))),
        );
        assert_eq!(daily.len(), 1);
        assert!(daily.contains_key("2024-01-02"));
    }

    #[test]
    fn test_streaks() {
        let mut daily = DailyActivityMap::new();
        daily.insert(String::from("2024-01-01"), 1);
        daily.insert(String::from("2024-01-02"), 3);
        daily.insert(String::from("2024-01-04"), 1);

        let stats = compute_streaks(&daily, date("2024-01-04"));
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.total_active_days, 3);
    }

    #[test]
    fn test_current_streak_requires_activity_today() {
        let mut daily = DailyActivityMap::new();
        daily.insert(String::from("2024-01-01"), 1);
        daily.insert(String::from("2024-01-02"), 1);

        let stats = compute_streaks(&daily, date("2024-01-04"));
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 2);
    }

    #[test]
    fn test_empty_daily_map() {
        let stats = compute_streaks(&DailyActivityMap::new(), date("2024-01-04"));
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 0);
        assert_eq!(stats.total_active_days, 0);
    }

    #[test]
    fn test_busiest_month_tie_breaks_low() {
        let march = 1709254800; // 2024-03-01
        let july = 1719792000; // 2024-07-01 (2024-07-01T00:00:00Z = 1719792000)
        let records = vec![
            record_at(Some(march)),
            record_at(Some(march + 60)),
            record_at(Some(july)),
            record_at(Some(july + 60)),
        ];
        let monthly = bucket_by_month(&records);
        assert_eq!(monthly.busiest_month, 3);
        assert_eq!(monthly.busiest_month_name, "March");
        assert_eq!(monthly.busiest_month_count, 2);
        assert_eq!(monthly.month_counts.len(), 12);
        assert_eq!(monthly.month_counts.get(&7), Some(&2));
    }

    #[test]
    fn test_empty_history_monthly() {
        let monthly = bucket_by_month(&[]);
        assert_eq!(monthly.busiest_month, 1);
        assert_eq!(monthly.busiest_month_name, "January");
        assert_eq!(monthly.busiest_month_count, 0);
    }
}
