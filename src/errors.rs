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

use thiserror::Error;

/// Errors surfaced by the routing core.  All of these are fatal for the call
/// that produced them; nothing is retried internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// A front-layer operation acts on more than two qubits.  Multi-qubit
    /// operations must be decomposed before routing.
    #[error("node {node} acts on {arity} qubits; only one- and two-qubit operations can be routed")]
    InvalidArity { node: usize, arity: usize },

    /// No candidate swap managed to reduce the front-layer cost within the
    /// progress bound, which means the two qubits of some gate lie in
    /// disconnected components of the coupling graph.
    #[error(
        "virtual qubits {q0} and {q1} cannot be brought together after {attempts} swaps; \
         the coupling graph appears disconnected between them"
    )]
    DisconnectedCoupling { q0: u32, q1: u32, attempts: usize },

    /// The front layer holds unroutable gates but no physical neighbor of any
    /// active qubit exists to swap with.
    #[error("front layer is not routable and produced no swap candidates")]
    EmptySwapCandidates,

    /// The virtual-to-physical map and its inverse disagree.  This indicates
    /// either a malformed input layout or an internal bug.
    #[error("layout is not a bijection between virtual and physical qubits")]
    LayoutInvariantViolation,

    /// A qubit index refers past the end of the device or circuit.
    #[error("qubit index {index} out of range for {num_qubits} qubits")]
    QubitOutOfRange { index: u32, num_qubits: usize },

    /// A clbit index refers past the end of the circuit's classical register.
    #[error("clbit index {index} out of range for {num_clbits} clbits")]
    ClbitOutOfRange { index: usize, num_clbits: usize },

    /// An input container does not have the size the device implies.
    #[error("{what} has size {actual}, expected {expected}")]
    ShapeMismatch {
        what: &'static str,
        actual: usize,
        expected: usize,
    },
}
