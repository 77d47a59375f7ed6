//! marketpulse — technical analysis for daily crypto and equity series.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`]. The indicator
//! engine in [`domain::indicator`] is pure and stateless; everything that
//! touches the network, the filesystem, or configuration lives behind a
//! port.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
