use super::error::{StateError, StateResult};
use super::event::StateTransition;
use super::{SessionEvent, SessionState};

#[derive(Debug, Default)]
pub struct StateMachine {
    state: SessionState,
    transition_history: Vec<StateTransition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: SessionState::default(),
            transition_history: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn can_transition(&self, event: SessionEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: SessionEvent) -> Option<SessionState> {
        use SessionEvent::*;
        match (self.state, event) {
            (SessionState::Empty | SessionState::Ready, SourceLoaded) => Some(SessionState::Ready),
            (SessionState::Ready | SessionState::Drawing | SessionState::AwaitingLabel, SourceDiscarded) => {
                Some(SessionState::Empty)
            }
            (SessionState::Ready, StrokeStarted) => Some(SessionState::Drawing),
            (SessionState::Drawing, StrokeFinished) => Some(SessionState::AwaitingLabel),
            (SessionState::AwaitingLabel, LabelSubmitted) => Some(SessionState::Ready),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: SessionEvent) -> StateResult<SessionState> {
        tracing::debug!(from = ?self.state, event = ?event, "request state transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid state transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        let record = StateTransition::new(Some(self.state), event, next);
        self.state = next;
        self.transition_history.push(record);

        Ok(self.state)
    }
}

#[cfg(test)]
impl StateMachine {
    fn history(&self) -> &[StateTransition] {
        &self.transition_history
    }
}
