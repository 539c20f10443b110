pub mod access_jwt;
pub mod bearer;
pub mod factory;
pub mod gate;
pub mod issuer;
pub mod key_store;
pub mod signer;

pub use access_jwt::{DecodedClaims, TokenVerifier};
pub use factory::build_gate;
pub use gate::{Gate, GateConfig};
pub use issuer::IssuerPolicy;
pub use key_store::{KeyFault, KeyLocation, KeyState, KeyStore};
pub use signer::{TokenSigner, sign_token};
