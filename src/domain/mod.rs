//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Domain types (request builders, decoded replies)
//! - `wire.rs` — Raw serde structs matching the OMS request bodies
//! - `convert.rs` — Conversions between the two, where one is needed
//! - `client.rs` — Sub-client with the REST methods

pub mod market;
pub mod order;
pub mod portfolio;
