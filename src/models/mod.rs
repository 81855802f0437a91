pub mod app_state;
pub mod filter;
pub mod instance;
pub mod scan;

pub use app_state::AppState;
pub use filter::StateFilter;
pub use instance::{Instance, InstanceState, OWNER_NOT_AVAILABLE, OWNER_TAG_KEY};
pub use scan::{ScanPhase, ScanState};
