pub mod control;
pub mod decision;
pub mod device;
pub mod hour;
pub mod power;
pub mod price_table;
pub mod provider;
pub mod session;
pub mod thresholds;
