//! Domain model: the candidate catalog, the validation engine, and the ballot store.

pub mod api;
pub mod catalog;
pub mod common;
pub mod store;
pub mod validation;
pub mod vote;
pub mod voter;
