/// Phases of one annotation session.
///
/// `AwaitingLabel` is the window between a finished stroke and the label
/// submission for its extracted region; stroke input is gated there so at
/// most one pending, unlabeled region exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Empty,
    Ready,
    Drawing,
    AwaitingLabel,
}
