//! Synthetic dataset generation for a distribution test feeder.
//!
//! Drives an external circuit-simulation engine through its textual
//! command/query interface: attaches a voltage monitor to every load,
//! injects seeded uniform load profiles, runs a yearly-mode solve, and
//! persists three CSV artifacts per run: the injected profiles, the
//! measured load voltages, and static per-load metadata.

pub mod channel;
pub mod config;
/// Engine dispatch trait, typed query helpers, and the text-protocol transport.
pub mod engine;
pub mod error;
pub mod io;
pub mod metadata;
pub mod monitor;
/// The seven-step run sequence against one engine session.
pub mod pipeline;
pub mod profile;
pub mod table;
