use crate::Error;

/// Signature algorithm of an authenticator key.  Only Ed25519 keys are generated by the stampers,
/// but the name travels on the wire, so it's kept as a proper type.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize,
)]
pub enum Algorithm {
    #[default]
    #[serde(rename = "Ed25519")]
    Ed25519,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Ed25519 => "Ed25519",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Algorithm {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ed25519" => Ok(Algorithm::Ed25519),
            _ => Err(Error::Unsupported(
                format!("signature algorithm {:?}", s).into(),
            )),
        }
    }
}
