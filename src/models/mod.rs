//! # Data Models
//!
//! This module contains the data models used throughout the reconciliation
//! engine: the canonical fixture entity and the incoming provider payload.

pub mod fixture;
pub mod incoming;

pub use fixture::Entity as Fixture;
pub use incoming::IncomingFixture;
