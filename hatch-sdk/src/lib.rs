//! Shared types for the Delivery Hatch analytics relay.
//!
//! - [`objects`]: request and response bodies for every HTTP endpoint.
//! - [`signature`]: Stripe webhook signature verification.

#![forbid(unsafe_code)]

pub mod objects;
pub mod signature;
