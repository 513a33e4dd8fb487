//! Workspace-level integration tests: the things worth checking across
//! crate boundaries rather than inside any one crate's own unit tests.

#[path = "specs/store/round_trip.rs"]
mod store_round_trip;

#[path = "specs/config/convergence.rs"]
mod config_convergence;

#[path = "specs/detect/registry.rs"]
mod detect_registry;

#[path = "specs/daemon/wiring.rs"]
mod daemon_wiring;
