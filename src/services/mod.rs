pub mod audit;
pub mod availability;
pub mod menus;
pub mod metrics;
pub mod schedules;
