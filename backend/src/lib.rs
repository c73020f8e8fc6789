//! Core domain services for the CoachUp strength-coaching platform.
//!
//! The crate is invoked in-process by an embedding application: it owns no
//! wire protocol. Identity arrives as an already-authenticated principal id,
//! persistence goes through repository ports implemented by the Diesel
//! adapters in [`outbound::persistence`], and invite email delivery goes
//! through the Resend adapter in [`outbound::email`].

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
