/// Where the most recent rotation attempt is (or ended up).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RotationState {
    /// No attempt has been made yet.
    #[default]
    Idle,
    /// Generating the new keypair.
    Generating,
    /// Registering the new public key with the organization service.
    Registering,
    /// The new key was registered and is now active.
    Promoted,
    /// The attempt failed; the previous key is still active.
    Failed,
}

impl RotationState {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, RotationState::Generating | RotationState::Registering)
    }
}

impl std::fmt::Display for RotationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RotationState::Idle => "IDLE",
            RotationState::Generating => "GENERATING",
            RotationState::Registering => "REGISTERING",
            RotationState::Promoted => "PROMOTED",
            RotationState::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}
