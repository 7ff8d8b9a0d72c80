//! # Bomber Development Tools
//!
//! Command-line tools for development:
//! - World inspection (render a seed's terrain)
//! - Constrained seed search
//! - Curated fixture seed sets for regression tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod fixtures;
