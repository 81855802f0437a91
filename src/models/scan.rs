use super::instance::Instance;

/// Lifecycle of one fetch. The walk is serial by design: parallelizing
/// regions or instances would change the all-or-nothing visibility
/// contract, so the phases form a straight line.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ScanPhase {
    #[default]
    Idle,
    Enumerating,
    Scanning(String),
    Complete,
    Failed,
}

impl ScanPhase {
    pub fn status_message(&self) -> String {
        match self {
            ScanPhase::Idle => String::new(),
            ScanPhase::Enumerating => "Fetching available regions...".to_string(),
            ScanPhase::Scanning(region) => format!("Checking region: {}...", region),
            ScanPhase::Complete => "Fetch complete.".to_string(),
            ScanPhase::Failed => "Error fetching instances.".to_string(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ScanPhase::Enumerating | ScanPhase::Scanning(_))
    }
}

/// View-side snapshot of the last scan. Mutated only by the single scan
/// task at phase checkpoints; the instance list changes in bulk, never
/// incrementally.
#[derive(Clone, Debug, Default)]
pub struct ScanState {
    pub phase: ScanPhase,
    pub instances: Vec<Instance>,
}

impl ScanState {
    pub fn loading(&self) -> bool {
        self.phase.is_loading()
    }

    /// Entering a scan clears the previous result before anything is
    /// fetched.
    pub fn begin(&mut self) {
        self.instances.clear();
        self.phase = ScanPhase::Enumerating;
    }

    /// Atomic replace on success; the accumulated list becomes visible
    /// all at once.
    pub fn complete(&mut self, instances: Vec<Instance>) {
        self.instances = instances;
        self.phase = ScanPhase::Complete;
    }

    pub fn fail(&mut self) {
        self.instances.clear();
        self.phase = ScanPhase::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_tracks_in_flight_phases() {
        assert!(!ScanPhase::Idle.is_loading());
        assert!(ScanPhase::Enumerating.is_loading());
        assert!(ScanPhase::Scanning("us-east-1".into()).is_loading());
        assert!(!ScanPhase::Complete.is_loading());
        assert!(!ScanPhase::Failed.is_loading());
    }

    #[test]
    fn status_messages_name_the_current_region() {
        assert_eq!(
            ScanPhase::Scanning("eu-west-2".into()).status_message(),
            "Checking region: eu-west-2..."
        );
        assert_eq!(ScanPhase::Idle.status_message(), "");
    }

    #[test]
    fn begin_clears_the_previous_result() {
        let mut state = ScanState::default();
        state.complete(vec![]);
        assert_eq!(state.phase, ScanPhase::Complete);
        state.begin();
        assert!(state.instances.is_empty());
        assert_eq!(state.phase, ScanPhase::Enumerating);
        assert!(state.loading());
    }

    #[test]
    fn fail_leaves_the_list_empty_but_keeps_the_message() {
        let mut state = ScanState::default();
        state.begin();
        state.fail();
        assert!(state.instances.is_empty());
        assert!(!state.loading());
        assert_eq!(state.phase.status_message(), "Error fetching instances.");
    }
}
