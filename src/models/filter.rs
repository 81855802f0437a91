use super::instance::{Instance, InstanceState};

/// The dashboard's state selector: everything, or one lifecycle state.
/// Changing the selection only changes the derived view; it never
/// triggers a fetch and never touches the underlying list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StateFilter {
    #[default]
    All,
    State(InstanceState),
}

impl StateFilter {
    /// Parse a selector value. Anything unrecognized (including the
    /// literal "All") selects everything.
    pub fn from_query(s: &str) -> Self {
        match InstanceState::from_wire(s) {
            Some(state) => StateFilter::State(state),
            None => StateFilter::All,
        }
    }

    pub fn as_query(&self) -> &'static str {
        match self {
            StateFilter::All => "All",
            StateFilter::State(state) => state.as_wire(),
        }
    }

    /// Derive the visible subset. Pure; preserves list order.
    pub fn apply<'a>(&self, instances: &'a [Instance]) -> Vec<&'a Instance> {
        match self {
            StateFilter::All => instances.iter().collect(),
            StateFilter::State(wanted) => {
                instances.iter().filter(|i| i.state == *wanted).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn inst(id: &str, state: InstanceState) -> Instance {
        Instance {
            id: id.to_string(),
            instance_type: "m1.small".to_string(),
            launch_time: Utc::now(),
            launch_time_display: String::new(),
            owner: "N/A".to_string(),
            region: "us-east-1".to_string(),
            state,
            network_in_bytes: 0.0,
            network_out_bytes: 0.0,
        }
    }

    #[test]
    fn all_is_identity_in_order() {
        let list = vec![
            inst("i-1", InstanceState::Running),
            inst("i-2", InstanceState::Stopped),
            inst("i-3", InstanceState::Pending),
        ];
        let visible = StateFilter::All.apply(&list);
        let ids: Vec<&str> = visible.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["i-1", "i-2", "i-3"]);
    }

    #[test]
    fn state_filter_is_exact_subset_preserving_order() {
        let list = vec![
            inst("i-1", InstanceState::Running),
            inst("i-2", InstanceState::Stopped),
            inst("i-3", InstanceState::Running),
            inst("i-4", InstanceState::Terminated),
        ];
        let visible = StateFilter::State(InstanceState::Running).apply(&list);
        let ids: Vec<&str> = visible.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["i-1", "i-3"]);
        assert!(visible.iter().all(|i| i.state == InstanceState::Running));
    }

    #[test]
    fn applying_never_mutates_the_source() {
        let list = vec![
            inst("i-1", InstanceState::Running),
            inst("i-2", InstanceState::Stopped),
        ];
        let _ = StateFilter::State(InstanceState::Stopped).apply(&list);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, "i-1");
    }

    #[test]
    fn query_parsing() {
        assert_eq!(StateFilter::from_query("All"), StateFilter::All);
        assert_eq!(StateFilter::from_query(""), StateFilter::All);
        assert_eq!(StateFilter::from_query("nonsense"), StateFilter::All);
        assert_eq!(
            StateFilter::from_query("shutting-down"),
            StateFilter::State(InstanceState::ShuttingDown)
        );
    }
}
