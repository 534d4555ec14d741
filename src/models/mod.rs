pub mod auth;
pub mod menu;
pub mod schedule;
pub mod tenant;
