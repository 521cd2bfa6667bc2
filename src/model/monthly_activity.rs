use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyActivity {
    /// Calendar month (1..=12) -> transaction count; all twelve keys are
    /// always present.
    pub month_counts: BTreeMap<u32, u64>,
    pub busiest_month: u32,
    pub busiest_month_name: String,
    pub busiest_month_count: u64,
}
