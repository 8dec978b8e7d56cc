mod api_key_stamper;
pub mod signer;
mod software_stamper;

pub use crate::{api_key_stamper::ApiKeyStamper, software_stamper::SoftwareStamper};
