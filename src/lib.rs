//! Rail Simulation Library
//!
//! A deterministic discrete-event engine for trains moving across a rail
//! network, usable headless or embedded behind any presentation layer.

pub mod simulation;
