// Security module for credential issuance and verification
//
// This module owns the bearer-token boundary: handlers hand it the raw
// Authorization header and get back a verified identity, or a typed
// failure distinguishing "no credential" from "bad credential".

pub mod token;

pub use token::{AuthError, Identity, TokenSigner};
