//! Core domain types and logic.

pub mod ohlcv;
pub mod snapshot;
pub mod signal;
pub mod position;
pub mod account;
pub mod execution;
pub mod simulator;
pub mod metrics;
pub mod indicator;
pub mod feed;
pub mod journal;
pub mod config_validation;
pub mod error;
