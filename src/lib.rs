pub mod checkout;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod domain;
pub mod messaging;
pub mod metrics;
pub mod store;
pub mod utils;
