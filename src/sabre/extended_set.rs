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

use hashbrown::HashSet;
use rustworkx_core::petgraph::prelude::*;

use crate::dag::RoutingDag;
use crate::nlayout::VirtualQubit;

use super::front_layer::FrontLayer;

/// The bounded lookahead window used to bias swap scoring toward upcoming gates.
///
/// Membership is by node, deduplicated across the whole window; only the qubit pairs matter for
/// scoring, since the window contributes through an averaged distance sum.
#[derive(Clone, Debug, Default)]
pub struct ExtendedSet {
    nodes: HashSet<NodeIndex>,
    pairs: Vec<[VirtualQubit; 2]>,
}

impl ExtendedSet {
    /// The virtual-qubit pairs of the member gates, in discovery order.
    pub fn pairs(&self) -> &[[VirtualQubit; 2]] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn insert(&mut self, node: NodeIndex, pair: [VirtualQubit; 2]) -> bool {
        if self.nodes.insert(node) {
            self.pairs.push(pair);
            true
        } else {
            false
        }
    }
}

/// Collect up to `capacity` distinct two-qubit operations from the BFS successors of the front
/// layer.
///
/// One BFS cursor is kept per front-layer node and the cursors are cycled round-robin, pulling
/// one discovery layer per visit, so no single deep branch can monopolize the window.  A cursor
/// that yields an empty layer is a no-op pass; a cursor is only retired once its traversal is
/// exhausted.
pub fn build_extended_set(
    dag: &RoutingDag,
    front_layer: &FrontLayer,
    capacity: usize,
) -> ExtendedSet {
    let mut extended_set = ExtendedSet::default();
    let mut cursors: Vec<_> = front_layer
        .iter()
        .map(|node| dag.bfs_successors(*node))
        .collect();
    if cursors.is_empty() || capacity == 0 {
        return extended_set;
    }
    let mut exhausted = vec![false; cursors.len()];
    let mut current = 0;
    while extended_set.len() < capacity && !exhausted.iter().all(|done| *done) {
        if !exhausted[current] {
            match cursors[current].next() {
                None => exhausted[current] = true,
                Some((_, successors)) => {
                    for successor in successors {
                        if dag.arity(successor) == 2 {
                            let qargs = dag.qargs(successor);
                            extended_set.insert(successor, [qargs[0], qargs[1]]);
                            if extended_set.len() >= capacity {
                                break;
                            }
                        }
                    }
                }
            }
        }
        current = (current + 1) % cursors.len();
    }
    extended_set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag::{OpDescriptor, OpNode};

    fn cx(id: usize, a: u32, b: u32) -> OpNode {
        OpNode::new(
            id,
            OpDescriptor::new("cx"),
            [VirtualQubit::new(a), VirtualQubit::new(b)],
        )
    }

    fn h(id: usize, q: u32) -> OpNode {
        OpNode::new(id, OpDescriptor::new("h"), [VirtualQubit::new(q)])
    }

    #[test]
    fn capacity_bounds_the_window() {
        // A long ladder of dependent two-qubit gates on two qubits.
        let nodes: Vec<OpNode> = (0..40).map(|id| cx(id, 0, 1)).collect();
        let dag = RoutingDag::new(None, 2, 0, nodes).unwrap();
        let front = FrontLayer::new(dag.front_layer().iter().copied());
        let extended = build_extended_set(&dag, &front, 20);
        assert_eq!(extended.len(), 20);
    }

    #[test]
    fn single_qubit_successors_are_skipped() {
        let dag = RoutingDag::new(
            None,
            3,
            0,
            vec![cx(0, 0, 1), h(1, 0), h(2, 1), cx(3, 1, 2)],
        )
        .unwrap();
        let front = FrontLayer::new(dag.front_layer().iter().copied());
        let extended = build_extended_set(&dag, &front, 20);
        // Only the trailing cx survives the two-qubit filter, and only once.
        assert_eq!(extended.pairs(), &[[VirtualQubit::new(1), VirtualQubit::new(2)]]);
    }

    #[test]
    fn members_are_distinct_across_cursors() {
        // Two front-layer gates converge on the same successor; it must enter the window once.
        let dag = RoutingDag::new(
            None,
            4,
            0,
            vec![cx(0, 0, 1), cx(1, 2, 3), cx(2, 1, 2)],
        )
        .unwrap();
        let front = FrontLayer::new(dag.front_layer().iter().copied());
        assert_eq!(front.len(), 2);
        let extended = build_extended_set(&dag, &front, 20);
        assert_eq!(extended.len(), 1);
    }

    #[test]
    fn empty_front_layer_yields_empty_window() {
        let dag = RoutingDag::new(None, 2, 0, vec![]).unwrap();
        let front = FrontLayer::default();
        assert!(build_extended_set(&dag, &front, 20).is_empty());
    }
}
