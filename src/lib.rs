pub mod config;
pub mod humanize;
pub mod input;
pub mod observability;
pub mod worker;
