pub mod analytics;
pub mod booking;
pub mod inventory;
pub mod ledger;
pub mod pricing;
pub mod wallet;
