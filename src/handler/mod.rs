pub mod activity;
pub mod history;
pub mod identity;
pub mod protocols;
pub mod rank;
pub mod volume;
pub mod wallet;
