pub use self::{
    analytics_result::{
        GasSpent, ProtocolInteraction, WalletAnalytics,
        WalletAnalyticsFailure, WalletAnalyticsResult,
    },
    monthly_activity::MonthlyActivity,
    streak_stats::{DailyActivityMap, StreakStats},
    volume_stats::VolumeStats,
};

mod analytics_result;
mod monthly_activity;
mod streak_stats;
mod volume_stats;
