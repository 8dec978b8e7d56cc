use phantom_stamper_core::unix_milliseconds;

pub const CREATE_AUTHENTICATOR_METHOD: &str = "createAuthenticator";

/// Body of a request to the organization service's RPC endpoint.  The stamp covers the exact
/// serialized body, so the timestamp makes otherwise-identical requests distinguishable.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RPCRequest<P> {
    pub method: String,
    pub params: P,
    #[serde(with = "unix_milliseconds")]
    pub timestamp_ms: time::OffsetDateTime,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct RPCResponse<R> {
    pub result: R,
}
