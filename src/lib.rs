pub mod api;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod model;
pub mod normalizer;
pub mod notifier;
pub mod worker;
