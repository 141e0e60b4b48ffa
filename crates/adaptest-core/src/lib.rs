//! adaptest-core: Adaptive testing engine, psychometrics, and simulation.
//!
//! This crate holds the 3PL response model, the ability estimator, tier
//! progression, item selection and stopping rules, plus the item bank
//! parser and a concurrent simulator built on top of them.
//!
//! Session state is always owned by the caller and passed into the
//! [`engine::AdaptiveEngine`] explicitly; nothing session-specific is kept
//! inside the engine.

pub mod config;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod examinee;
pub mod irt;
pub mod model;
pub mod parser;
pub mod report;
pub mod selector;
pub mod session;
pub mod simulation;
pub mod statistics;
pub mod stopping;
pub mod tier;
pub mod traits;
