//! # Repository Layer
//!
//! This module contains the datastore client for fixture records: the
//! [`fixture::FixtureStore`] trait the engine is constructed against and its
//! SeaORM implementation.

pub mod fixture;

pub use fixture::{FixtureStore, SeaOrmFixtureStore};
