/// The two places a keypair can live.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum KeySlot {
    /// The keypair used for signing.
    Active,
    /// A generated keypair awaiting confirmation of its registration.
    Pending,
}

impl KeySlot {
    pub const VARIANTS: [KeySlot; 2] = [KeySlot::Active, KeySlot::Pending];
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySlot::Active => "active",
            KeySlot::Pending => "pending",
        }
    }
}

impl std::fmt::Display for KeySlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
