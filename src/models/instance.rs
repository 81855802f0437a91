use chrono::{DateTime, Utc};

/// Tag key whose value identifies the owning user.
pub const OWNER_TAG_KEY: &str = "user_id";
/// Shown when an instance carries no owner tag.
pub const OWNER_NOT_AVAILABLE: &str = "N/A";

/// Provider lifecycle state of a compute instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstanceState {
    Pending,
    Running,
    ShuttingDown,
    Stopping,
    Stopped,
    Terminated,
}

impl InstanceState {
    /// Selector order used by the dashboard dropdown.
    pub const ALL: [InstanceState; 6] = [
        InstanceState::Running,
        InstanceState::Stopped,
        InstanceState::Terminated,
        InstanceState::Pending,
        InstanceState::ShuttingDown,
        InstanceState::Stopping,
    ];

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(InstanceState::Pending),
            "running" => Some(InstanceState::Running),
            "shutting-down" => Some(InstanceState::ShuttingDown),
            "stopping" => Some(InstanceState::Stopping),
            "stopped" => Some(InstanceState::Stopped),
            "terminated" => Some(InstanceState::Terminated),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            InstanceState::Pending => "pending",
            InstanceState::Running => "running",
            InstanceState::ShuttingDown => "shutting-down",
            InstanceState::Stopping => "stopping",
            InstanceState::Stopped => "stopped",
            InstanceState::Terminated => "terminated",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InstanceState::Pending => "Pending",
            InstanceState::Running => "Running",
            InstanceState::ShuttingDown => "Shutting Down",
            InstanceState::Stopping => "Stopping",
            InstanceState::Stopped => "Stopped",
            InstanceState::Terminated => "Terminated",
        }
    }

    /// Badge class: running reads positive, stopped negative, the rest
    /// neutral.
    pub fn badge_class(&self) -> &'static str {
        match self {
            InstanceState::Running => "badge-positive",
            InstanceState::Stopped => "badge-negative",
            _ => "badge-neutral",
        }
    }
}

impl std::fmt::Display for InstanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// One compute instance as collected during a scan. Transient: the whole
/// list is replaced on every scan, never merged.
#[derive(Clone, Debug)]
pub struct Instance {
    pub id: String,
    pub instance_type: String,
    /// Metric window start; rendering always uses `launch_time_display`.
    pub launch_time: DateTime<Utc>,
    pub launch_time_display: String,
    pub owner: String,
    pub region: String,
    pub state: InstanceState,
    pub network_in_bytes: f64,
    pub network_out_bytes: f64,
}
