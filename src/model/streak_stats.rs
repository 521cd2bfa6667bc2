use std::collections::BTreeMap;

use serde::Serialize;

/// ISO date (`YYYY-MM-DD`, UTC) -> transaction count. Only active days are
/// present; every count is >= 1.
pub type DailyActivityMap = BTreeMap<String, u64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakStats {
    pub current_streak: u64,
    pub longest_streak: u64,
    pub total_active_days: u64,
}
