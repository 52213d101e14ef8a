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

use std::convert::Infallible;

use ndarray::prelude::*;
use rustworkx_core::petgraph::prelude::*;
use rustworkx_core::shortest_path::dijkstra;
use smallvec::SmallVec;

use crate::errors::RoutingError;
use crate::nlayout::PhysicalQubit;

/// Read-only view of the device connectivity used by the router.
///
/// Couples a dense adjacency matrix (entries are only ever tested against zero), the matching
/// all-pairs distance matrix, and a precomputed neighbor table so the swap-candidate generator
/// does not rescan matrix rows in the inner loop.
#[derive(Clone, Debug)]
pub struct CouplingView {
    // The choice of 4 `PhysicalQubit`s in the stack-allocated region is because a) this causes the
    // `SmallVec<T>` to be the same width as a `Vec` on 64-bit systems (three machine words == 24
    // bytes); b) the majority of coupling maps we're likely to encounter have a degree of 3 (heavy
    // hex) or 4 (grid / heavy square).
    neighbors: Vec<SmallVec<[PhysicalQubit; 4]>>,
    adjacency: Array2<f64>,
    distance: Array2<f64>,
}

impl CouplingView {
    /// Build a view from an adjacency matrix and a caller-supplied distance matrix.  The
    /// adjacency matrix is expected to be symmetric; an edge exists wherever an entry is nonzero.
    pub fn new(adjacency: Array2<f64>, distance: Array2<f64>) -> Result<Self, RoutingError> {
        let num_qubits = adjacency.nrows();
        if adjacency.ncols() != num_qubits {
            return Err(RoutingError::ShapeMismatch {
                what: "adjacency matrix columns",
                actual: adjacency.ncols(),
                expected: num_qubits,
            });
        }
        if distance.nrows() != num_qubits || distance.ncols() != num_qubits {
            return Err(RoutingError::ShapeMismatch {
                what: "distance matrix",
                actual: distance.nrows().max(distance.ncols()),
                expected: num_qubits,
            });
        }
        let neighbors = adjacency
            .axis_iter(Axis(0))
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter_map(|(col, value)| {
                        (*value != 0.).then(|| PhysicalQubit::new(col as u32))
                    })
                    .collect()
            })
            .collect();
        Ok(CouplingView {
            neighbors,
            adjacency,
            distance,
        })
    }

    /// Build a view from an adjacency matrix alone, computing the all-pairs shortest-path
    /// distance matrix with unit edge weights.  Unreachable pairs get `f64::INFINITY`.
    pub fn with_computed_distance(adjacency: Array2<f64>) -> Result<Self, RoutingError> {
        let num_qubits = adjacency.nrows();
        let mut view = Self::new(adjacency, Array2::zeros((num_qubits, num_qubits)))?;
        let graph = view.graph();
        let mut distance = Array2::from_elem((num_qubits, num_qubits), f64::INFINITY);
        for source in 0..num_qubits {
            let result: Result<Vec<Option<f64>>, Infallible> =
                dijkstra(&graph, NodeIndex::new(source), None, |_| Ok(1.), None);
            let row = match result {
                Ok(row) => row,
                Err(never) => match never {},
            };
            for (target, cost) in row.iter().enumerate() {
                if let Some(cost) = cost {
                    distance[[source, target]] = *cost;
                }
            }
        }
        view.distance = distance;
        Ok(view)
    }

    /// Number of physical qubits on the device.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.neighbors.len()
    }

    /// Physical qubits directly coupled to `qubit`.
    #[inline]
    pub fn neighbors(&self, qubit: PhysicalQubit) -> &[PhysicalQubit] {
        &self.neighbors[qubit.index()]
    }

    /// Whether a two-qubit gate may be applied across `(a, b)`.
    #[inline]
    pub fn is_edge(&self, a: PhysicalQubit, b: PhysicalQubit) -> bool {
        self.adjacency[[a.index(), b.index()]] != 0.
    }

    /// Shortest-path distance between two physical qubits.
    #[inline]
    pub fn distance(&self, a: PhysicalQubit, b: PhysicalQubit) -> f64 {
        self.distance[[a.index(), b.index()]]
    }

    /// Dense view of the full distance matrix, for the scorer's inner loop.
    #[inline]
    pub fn distance_matrix(&self) -> ArrayView2<'_, f64> {
        self.distance.view()
    }

    /// Regenerate a graph representation of the coupling from the neighbor table.
    fn graph(&self) -> DiGraph<(), ()> {
        let mut graph = DiGraph::with_capacity(self.neighbors.len(), 0);
        for _ in 0..self.neighbors.len() {
            graph.add_node(());
        }
        for (source, targets) in self.neighbors.iter().enumerate() {
            for target in targets {
                graph.add_edge(NodeIndex::new(source), NodeIndex::new(target.index()), ());
            }
        }
        graph
    }
}
