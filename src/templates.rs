use askama::Template;

use crate::models::{Instance, InstanceState};
use crate::utils::group_digits;

/// Pre-formatted table row; localization and number formatting happen
/// before the template sees the data.
pub struct InstanceRow {
    pub id: String,
    pub instance_type: String,
    pub launch_time: String,
    pub owner: String,
    pub region: String,
    pub state_label: &'static str,
    pub badge_class: &'static str,
    pub network_in: String,
    pub network_out: String,
}

impl InstanceRow {
    pub fn from_instance(instance: &Instance) -> Self {
        Self {
            id: instance.id.clone(),
            instance_type: instance.instance_type.clone(),
            launch_time: instance.launch_time_display.clone(),
            owner: instance.owner.clone(),
            region: instance.region.clone(),
            state_label: instance.state.label(),
            badge_class: instance.state.badge_class(),
            network_in: group_digits(instance.network_in_bytes),
            network_out: group_digits(instance.network_out_bytes),
        }
    }
}

pub struct StateOption {
    pub value: &'static str,
    pub label: &'static str,
}

impl StateOption {
    /// Fixed selector set, "All States" first.
    pub fn all() -> Vec<StateOption> {
        let mut options = vec![StateOption {
            value: "All",
            label: "All States",
        }];
        for state in InstanceState::ALL {
            options.push(StateOption {
                value: state.as_wire(),
                label: state.label(),
            });
        }
        options
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub rows: Vec<InstanceRow>,
    pub has_rows: bool,
    pub status_message: String,
    pub has_status: bool,
    pub loading: bool,
    pub failed: bool,
    pub filter_value: String,
    pub state_options: Vec<StateOption>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn rows_carry_grouped_byte_totals() {
        let instance = Instance {
            id: "i-1".into(),
            instance_type: "m1.small".into(),
            launch_time: Utc::now(),
            launch_time_display: "2026-03-01 08:30:00".into(),
            owner: "abc".into(),
            region: "us-east-1".into(),
            state: InstanceState::Running,
            network_in_bytes: 1234567.0,
            network_out_bytes: 890.0,
        };
        let row = InstanceRow::from_instance(&instance);
        assert_eq!(row.network_in, "1,234,567");
        assert_eq!(row.network_out, "890");
        assert_eq!(row.state_label, "Running");
        assert_eq!(row.badge_class, "badge-positive");
    }

    #[test]
    fn selector_offers_all_plus_every_state() {
        let options = StateOption::all();
        assert_eq!(options.len(), 7);
        assert_eq!(options[0].value, "All");
        assert_eq!(options[0].label, "All States");
        assert!(options.iter().any(|o| o.value == "shutting-down"));
    }
}
