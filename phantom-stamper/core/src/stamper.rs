use crate::{Algorithm, Result, StampParams};

/// The base signing capability: produce an encoded stamp (the X-Phantom-Stamp header value)
/// over some bytes.  Stampers that manage their own keys additionally implement
/// StamperWithKeyManagement.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait Stamper: Send + Sync {
    fn algorithm(&self) -> Algorithm;
    async fn stamp(&self, stamp_params: &StampParams<'_>) -> Result<String>;
}
