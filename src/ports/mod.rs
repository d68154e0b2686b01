//! Port traits decoupling the domain from storage, configuration and
//! report output.

pub mod config_port;
pub mod data_port;
pub mod report_port;
