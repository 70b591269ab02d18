//! Concrete adapter implementations of the port traits.

pub mod csv_adapter;
pub mod csv_report_adapter;
pub mod file_config_adapter;
