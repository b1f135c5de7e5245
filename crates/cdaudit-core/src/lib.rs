pub mod config;
pub mod logging;

pub mod auditor;
pub mod checks;
pub mod conandata;
pub mod fetch_head;
