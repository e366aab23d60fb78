//! Orchestration of loading, admission and perception
//!
//! `MeaningMaker` is the entry point hosts use: it owns the default loader,
//! local store and dealer, and decides which URLs may be fetched.

pub mod maker;
pub mod policy;

pub use maker::MeaningMaker;
pub use policy::FetchPolicy;
