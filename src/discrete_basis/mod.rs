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

//! Approximation of arbitrary single-qubit unitaries over a discrete gate alphabet.
//!
//! The entry point is [SolovayKitaev]: it precomputes an epsilon-net of short gate words
//! ([BasicApproximations]) once, and then answers synthesis queries by recursive refinement with
//! balanced group commutators.  All internal arithmetic happens on the SO(3) representation of
//! the gates, which discards the global phase; the phase is reconstructed against the synthesis
//! target at the end.

pub mod basic_approximations;
pub mod gates;
pub mod math;
pub mod solovay_kitaev;

pub use basic_approximations::{BasicApproximations, DiscreteBasisError, GateSequence};
pub use gates::DiscreteGate;
pub use solovay_kitaev::{Approximation, SolovayKitaev};
