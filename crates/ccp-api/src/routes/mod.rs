//! # API Route Modules
//!
//! - `credentials` — complaint credential issuance and verification under
//!   `/api/did/*`.

pub mod credentials;
