//! # Bomber Headless
//!
//! Runs arena matches without any frontend: scripted or seeded-random
//! controllers play full games for CI verification, batch seed sweeps,
//! and replay capture.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ascii;
pub mod batch;
pub mod match_runner;
pub mod strategies;
