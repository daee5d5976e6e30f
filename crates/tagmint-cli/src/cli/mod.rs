pub mod backfill;
pub mod config;
pub mod encode;
pub mod inventory;
pub mod telemetry;
