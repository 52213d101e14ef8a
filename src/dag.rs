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

use std::collections::VecDeque;

use hashbrown::HashSet;
use rustworkx_core::petgraph::prelude::*;
use smallvec::SmallVec;

use crate::errors::RoutingError;
use crate::nlayout::{NLayout, PhysicalQubit, VirtualQubit};

/// Minimal description of the operation attached to a DAG node.  The routing core treats this as
/// an opaque payload: it is cloned onto the output untouched, and only the qubit arguments of the
/// owning node are ever inspected.
#[derive(Clone, Debug, PartialEq)]
pub struct OpDescriptor {
    pub name: String,
    pub params: SmallVec<[f64; 3]>,
}

impl OpDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        OpDescriptor {
            name: name.into(),
            params: SmallVec::new(),
        }
    }

    pub fn with_params(name: impl Into<String>, params: impl IntoIterator<Item = f64>) -> Self {
        OpDescriptor {
            name: name.into(),
            params: params.into_iter().collect(),
        }
    }
}

/// One operation of the input circuit.  `id` is the caller's stable identifier for the node; it is
/// carried through to the routed output so callers can correlate output records with their own
/// circuit representation.  Classical bits ride along opaquely.
#[derive(Clone, Debug, PartialEq)]
pub struct OpNode {
    pub id: usize,
    pub op: OpDescriptor,
    pub qubits: SmallVec<[VirtualQubit; 2]>,
    pub clbits: Vec<usize>,
}

impl OpNode {
    pub fn new(id: usize, op: OpDescriptor, qubits: impl IntoIterator<Item = VirtualQubit>) -> Self {
        OpNode {
            id,
            op,
            qubits: qubits.into_iter().collect(),
            clbits: Vec::new(),
        }
    }

    pub fn with_clbits(mut self, clbits: impl IntoIterator<Item = usize>) -> Self {
        self.clbits = clbits.into_iter().collect();
        self
    }
}

/// Read-only DAG view over the circuit being routed.
///
/// Built from the circuit's operations in topological order: each node gains an edge from the
/// previous user of every wire (quantum or classical) it touches, which reproduces the data
/// dependences of the circuit without the interior wire nodes of a full circuit DAG.
#[derive(Clone, Debug)]
pub struct RoutingDag {
    graph: DiGraph<OpNode, ()>,
    name: Option<String>,
    num_qubits: usize,
    num_clbits: usize,
    first_layer: Vec<NodeIndex>,
}

impl RoutingDag {
    /// Build the DAG from a topologically-ordered list of operations.
    pub fn new(
        name: Option<String>,
        num_qubits: usize,
        num_clbits: usize,
        nodes: Vec<OpNode>,
    ) -> Result<Self, RoutingError> {
        let mut qubit_last: Vec<Option<NodeIndex>> = vec![None; num_qubits];
        let mut clbit_last: Vec<Option<NodeIndex>> = vec![None; num_clbits];
        let mut graph: DiGraph<OpNode, ()> =
            Graph::with_capacity(nodes.len(), 2 * nodes.len());
        for node in nodes {
            for qubit in &node.qubits {
                if qubit.index() >= num_qubits {
                    return Err(RoutingError::QubitOutOfRange {
                        index: qubit.0,
                        num_qubits,
                    });
                }
            }
            for clbit in &node.clbits {
                if *clbit >= num_clbits {
                    return Err(RoutingError::ClbitOutOfRange {
                        index: *clbit,
                        num_clbits,
                    });
                }
            }
            let qubits = node.qubits.clone();
            let clbits = node.clbits.clone();
            let index = graph.add_node(node);
            for qubit in &qubits {
                if let Some(previous) = qubit_last[qubit.index()] {
                    graph.add_edge(previous, index, ());
                }
                qubit_last[qubit.index()] = Some(index);
            }
            for clbit in &clbits {
                if let Some(previous) = clbit_last[*clbit] {
                    graph.add_edge(previous, index, ());
                }
                clbit_last[*clbit] = Some(index);
            }
        }
        let first_layer = graph.externals(Direction::Incoming).collect();
        Ok(RoutingDag {
            graph,
            name,
            num_qubits,
            num_clbits,
            first_layer,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    /// The operation roots: nodes with no operation predecessors, in insertion order.
    pub fn front_layer(&self) -> &[NodeIndex] {
        &self.first_layer
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    #[inline]
    pub fn node(&self, index: NodeIndex) -> &OpNode {
        &self.graph[index]
    }

    /// The virtual-qubit arguments of a node, in argument order.
    #[inline]
    pub fn qargs(&self, index: NodeIndex) -> &[VirtualQubit] {
        &self.graph[index].qubits
    }

    /// Number of qubits the node acts on.
    #[inline]
    pub fn arity(&self, index: NodeIndex) -> usize {
        self.graph[index].qubits.len()
    }

    /// Operation successors of `index`, deduplicated (two shared wires produce parallel edges),
    /// preserving first-encounter order.
    pub fn operation_successors(&self, index: NodeIndex) -> SmallVec<[NodeIndex; 4]> {
        let mut successors = SmallVec::new();
        for successor in self.graph.neighbors_directed(index, Direction::Outgoing) {
            if !successors.contains(&successor) {
                successors.push(successor);
            }
        }
        successors
    }

    /// Operation predecessors of `index`, deduplicated, preserving first-encounter order.
    pub fn operation_predecessors(&self, index: NodeIndex) -> SmallVec<[NodeIndex; 4]> {
        let mut predecessors = SmallVec::new();
        for predecessor in self.graph.neighbors_directed(index, Direction::Incoming) {
            if !predecessors.contains(&predecessor) {
                predecessors.push(predecessor);
            }
        }
        predecessors
    }

    /// Lazy breadth-first traversal of the operation successors of `index`.  Each item pairs a
    /// visited node with its newly-discovered successors, so the caller can consume the traversal
    /// one layer at a time.
    pub fn bfs_successors(&self, index: NodeIndex) -> BfsSuccessors<'_> {
        let mut visited = HashSet::new();
        visited.insert(index);
        let mut queue = VecDeque::new();
        queue.push_back(index);
        BfsSuccessors {
            dag: self,
            queue,
            visited,
        }
    }
}

/// Iterator produced by [RoutingDag::bfs_successors].
pub struct BfsSuccessors<'a> {
    dag: &'a RoutingDag,
    queue: VecDeque<NodeIndex>,
    visited: HashSet<NodeIndex>,
}

impl Iterator for BfsSuccessors<'_> {
    type Item = (NodeIndex, SmallVec<[NodeIndex; 4]>);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        let mut discovered = SmallVec::new();
        for successor in self
            .dag
            .graph
            .neighbors_directed(node, Direction::Outgoing)
        {
            if self.visited.insert(successor) {
                discovered.push(successor);
                self.queue.push_back(successor);
            }
        }
        Some((node, discovered))
    }
}

/// One record of the routed output: the original operation payload with its qubit arguments
/// rewritten to physical indices.  `source` is the input node's `id` for operations taken from
/// the circuit, and `None` for the swaps the router inserted.
#[derive(Clone, Debug, PartialEq)]
pub struct MappedOp {
    pub op: OpDescriptor,
    pub qubits: SmallVec<[PhysicalQubit; 2]>,
    pub clbits: Vec<usize>,
    pub source: Option<usize>,
}

/// The routed circuit: the input circuit's metadata with an operation sequence over physical
/// qubits.
#[derive(Clone, Debug, PartialEq)]
pub struct MappedDag {
    name: Option<String>,
    num_qubits: usize,
    num_clbits: usize,
    ops: Vec<MappedOp>,
}

impl MappedDag {
    /// An empty output circuit inheriting `dag`'s metadata, widened to the device.
    pub(crate) fn for_target(dag: &RoutingDag, num_physical: usize) -> Self {
        MappedDag {
            name: dag.name().map(str::to_owned),
            num_qubits: num_physical,
            num_clbits: dag.num_clbits(),
            ops: Vec::with_capacity(dag.num_nodes()),
        }
    }

    pub(crate) fn push_gate(&mut self, node: &OpNode, layout: &NLayout) {
        self.ops.push(MappedOp {
            op: node.op.clone(),
            qubits: node.qubits.iter().map(|q| q.to_phys(layout)).collect(),
            clbits: node.clbits.clone(),
            source: Some(node.id),
        });
    }

    pub(crate) fn push_swap(&mut self, swap: [VirtualQubit; 2], layout: &NLayout) {
        self.ops.push(MappedOp {
            op: OpDescriptor::new("swap"),
            qubits: swap.iter().map(|q| q.to_phys(layout)).collect(),
            clbits: Vec::new(),
            source: None,
        });
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    pub fn ops(&self) -> &[MappedOp] {
        &self.ops
    }

    /// Number of swaps the router inserted.
    pub fn swap_count(&self) -> usize {
        self.ops.iter().filter(|op| op.source.is_none()).count()
    }
}
