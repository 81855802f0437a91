pub mod scan_service;

pub use scan_service::{run_scan, run_scan_into_state};
