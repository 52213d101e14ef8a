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

use rustworkx_core::petgraph::prelude::*;

/// The set of DAG nodes whose predecessors have all been routed.
///
/// Iteration follows insertion order.  This is important for reproducibility from a set seed:
/// both the left-to-right accumulation of the heuristic sums and the construction of the
/// fixed-size lookahead window depend on the traversal order through the layer.  The layer is
/// bounded by the device width in practice, so removal by linear scan is fine.
#[derive(Clone, Debug, Default)]
pub struct FrontLayer {
    nodes: Vec<NodeIndex>,
}

impl FrontLayer {
    pub fn new(nodes: impl IntoIterator<Item = NodeIndex>) -> Self {
        FrontLayer {
            nodes: nodes.into_iter().collect(),
        }
    }

    /// Append a node.  The caller is responsible for only pushing nodes that are not already
    /// present; the router's resolution check guarantees this.
    pub fn push_back(&mut self, node: NodeIndex) {
        debug_assert!(!self.nodes.contains(&node));
        self.nodes.push(node);
    }

    /// Remove a node from the layer.
    pub fn remove(&mut self, node: &NodeIndex) {
        if let Some(position) = self.nodes.iter().position(|other| other == node) {
            self.nodes.remove(position);
        } else {
            debug_assert!(false, "removed a node that is not in the front layer");
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NodeIndex> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_survives_removal() {
        let ids: Vec<NodeIndex> = (0..4).map(NodeIndex::new).collect();
        let mut layer = FrontLayer::new(ids.iter().copied());
        layer.remove(&ids[1]);
        layer.push_back(NodeIndex::new(9));
        let order: Vec<usize> = layer.iter().map(|n| n.index()).collect();
        assert_eq!(order, vec![0, 2, 3, 9]);
        assert_eq!(layer.len(), 4);
        assert!(!layer.is_empty());
    }
}
