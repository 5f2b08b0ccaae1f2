//! Adapters to the external collaborators: the identity provider and the
//! record store. Each submodule defines the trait the board relies on plus an
//! in-memory implementation.

pub mod auth;
pub mod store;
