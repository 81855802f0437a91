pub mod dashboard;

pub use dashboard::{dashboard_get, fetch_post};
