#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthenticatorKind {
    /// A raw public key whose holder signs requests with stamps.
    #[default]
    Keypair,
}
