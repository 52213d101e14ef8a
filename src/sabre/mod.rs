// This code is part of Qiskit.
//
// (C) Copyright IBM 2024
//
// This code is licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// copyright notice, and modified files need to carry a notice indicating
// that they have been altered from the originals.

//! The SABRE heuristic routing engine.
//!
//! The algorithm keeps a *front layer* of operations whose data dependences are satisfied, drains
//! every operation that is already executable on the current layout, and otherwise scores
//! candidate swaps on the neighborhood of the blocked gates, biased by a bounded lookahead window
//! and a per-qubit decay penalty that discourages serial swaps on the same qubits.

mod extended_set;
mod front_layer;
mod heuristic;
mod rng;
mod route;

pub use extended_set::ExtendedSet;
pub use front_layer::FrontLayer;
pub use heuristic::Heuristic;
pub use rng::{ChoiceRng, SabreRng};
pub use route::{route, route_trials};

/// Size of lookahead window.
pub const EXTENDED_SET_SIZE: usize = 20;
/// Decay coefficient for penalizing serial swaps.
pub const DECAY_RATE: f64 = 0.001;
/// How often to reset all decay rates to 1.
pub const DECAY_RESET_INTERVAL: u8 = 5;
/// Weight of lookahead window compared to front_layer.
pub const EXTENDED_SET_WEIGHT: f64 = 0.5;
