//! API Controller modules

pub mod analytics;
pub mod prices;
pub mod streak;
pub mod version;
