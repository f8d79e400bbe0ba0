//! Operation states and the events emitted while a publish runs.

use uuid::Uuid;

/// Where a publish operation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublishState {
    Idle,
    Converting,
    AwaitingConversion,
    Uploading,
    OpeningResult,
    CleaningUp,
    Done,
    Failed,
}

impl PublishState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Legal moves: one step along the happy path, or any live state to `Failed`.
    pub fn can_transition_to(self, next: PublishState) -> bool {
        use PublishState::*;
        match (self, next) {
            (from, Failed) => !from.is_terminal(),
            (Idle, Converting)
            | (Converting, AwaitingConversion)
            | (AwaitingConversion, Uploading)
            | (Uploading, OpeningResult)
            | (OpeningResult, CleaningUp)
            | (CleaningUp, Done) => true,
            _ => false,
        }
    }
}

/// Event emitted during a publish operation.
#[derive(Debug, Clone)]
pub enum PublishEvent {
    /// The operation moved to a new state.
    StateChanged {
        operation: Uuid,
        file_name: String,
        state: PublishState,
    },
    /// The space is live at `url`.
    Completed { operation: Uuid, url: String },
    /// The operation stopped; `error` is the user-facing reason.
    Failed { operation: Uuid, error: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use PublishState::*;

    const HAPPY_PATH: [PublishState; 7] = [
        Idle,
        Converting,
        AwaitingConversion,
        Uploading,
        OpeningResult,
        CleaningUp,
        Done,
    ];

    #[test]
    fn happy_path_is_legal() {
        for pair in HAPPY_PATH.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn failed_reachable_from_live_states() {
        for state in &HAPPY_PATH[..6] {
            assert!(state.can_transition_to(Failed), "{state:?}");
        }
    }

    #[test]
    fn terminal_states_are_final() {
        for next in HAPPY_PATH {
            assert!(!Done.can_transition_to(next));
            assert!(!Failed.can_transition_to(next));
        }
        assert!(!Done.can_transition_to(Failed));
    }

    #[test]
    fn skipping_steps_is_illegal() {
        assert!(!Idle.can_transition_to(Uploading));
        assert!(!Converting.can_transition_to(Uploading));
        assert!(!Uploading.can_transition_to(Done));
        assert!(!CleaningUp.can_transition_to(Converting));
    }
}
