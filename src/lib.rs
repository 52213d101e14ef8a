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

//! Hardware-aware routing of quantum circuits, plus discrete-basis synthesis of single-qubit
//! gates.
//!
//! The main entry point is [sabre::route]: given a circuit as a [dag::RoutingDag], a device as a
//! [coupling::CouplingView] and an initial [nlayout::NLayout], it produces an equivalent circuit
//! in which every two-qubit operation acts across a coupling edge, inserting swaps chosen by the
//! SABRE heuristic.  [sabre::route_trials] wraps it in a seeded multi-trial sweep that keeps the
//! cheapest result.
//!
//! The companion [discrete_basis] module approximates arbitrary single-qubit unitaries over a
//! discrete gate alphabet with the Solovay-Kitaev algorithm.

pub mod coupling;
pub mod dag;
pub mod discrete_basis;
pub mod errors;
pub mod nlayout;
pub mod sabre;

pub use coupling::CouplingView;
pub use dag::{MappedDag, MappedOp, OpDescriptor, OpNode, RoutingDag};
pub use errors::RoutingError;
pub use nlayout::{NLayout, PhysicalQubit, VirtualQubit};
pub use sabre::{route, route_trials, ChoiceRng, Heuristic, SabreRng};
