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

use std::cmp::Ordering;

use hashbrown::HashSet;
use indexmap::IndexSet;
use rand::prelude::*;
use rand_pcg::Pcg64Mcg;
use rayon::prelude::*;
use rustworkx_core::petgraph::prelude::*;

use crate::coupling::CouplingView;
use crate::dag::{MappedDag, RoutingDag};
use crate::errors::RoutingError;
use crate::nlayout::{NLayout, VirtualQubit};

use super::extended_set::build_extended_set;
use super::front_layer::FrontLayer;
use super::heuristic::{compute_cost, score_heuristic, Heuristic};
use super::rng::{ChoiceRng, SabreRng};
use super::{DECAY_RATE, DECAY_RESET_INTERVAL, EXTENDED_SET_SIZE};

/// Mutable state of a single routing pass.  This is all the tracking that lives across
/// iterations of the main loop; everything ephemeral stays inside the loop body.
struct RouterState<'a, R: ChoiceRng> {
    dag: &'a RoutingDag,
    coupling: &'a CouplingView,
    layout: &'a mut NLayout,
    /// Tracking for the 'decay' heuristic, indexed by virtual qubit.
    qubits_decay: &'a mut [f64],
    heuristic: Heuristic,
    rng: &'a mut R,
    front_layer: FrontLayer,
    /// Nodes already rewritten onto the output; successors become eligible for the front layer
    /// once every one of their predecessors is in here.
    applied: HashSet<NodeIndex>,
    out: MappedDag,
    /// Trial layout reused across swap candidates, so scoring a candidate costs one copy into
    /// preallocated storage rather than a fresh allocation.
    scratch: NLayout,
    num_search_steps: u8,
    /// The smallest basic front-layer cost seen since the last time a gate was routed.  If this
    /// fails to decrease for too long, the two qubits of some front gate cannot be brought
    /// together and the coupling graph must be disconnected between them.
    best_cost_since_progress: f64,
    swaps_since_progress: usize,
    max_swaps_without_progress: usize,
}

impl<'a, R: ChoiceRng> RouterState<'a, R> {
    fn new(
        front_layer: &[NodeIndex],
        dag: &'a RoutingDag,
        coupling: &'a CouplingView,
        layout: &'a mut NLayout,
        qubits_decay: &'a mut [f64],
        heuristic: Heuristic,
        rng: &'a mut R,
    ) -> Result<Self, RoutingError> {
        let num_qubits = coupling.num_qubits();
        if !layout.is_consistent() {
            return Err(RoutingError::LayoutInvariantViolation);
        }
        if layout.num_qubits() != num_qubits {
            return Err(RoutingError::ShapeMismatch {
                what: "layout",
                actual: layout.num_qubits(),
                expected: num_qubits,
            });
        }
        if qubits_decay.len() != num_qubits {
            return Err(RoutingError::ShapeMismatch {
                what: "decay vector",
                actual: qubits_decay.len(),
                expected: num_qubits,
            });
        }
        if dag.num_qubits() > num_qubits {
            return Err(RoutingError::ShapeMismatch {
                what: "circuit qubits",
                actual: dag.num_qubits(),
                expected: num_qubits,
            });
        }
        let out = MappedDag::for_target(dag, num_qubits);
        let scratch = layout.clone();
        Ok(RouterState {
            dag,
            coupling,
            layout,
            qubits_decay,
            heuristic,
            rng,
            front_layer: FrontLayer::new(front_layer.iter().copied()),
            applied: HashSet::with_capacity(dag.num_nodes()),
            out,
            scratch,
            num_search_steps: 0,
            best_cost_since_progress: f64::INFINITY,
            swaps_since_progress: 0,
            max_swaps_without_progress: 10 * num_qubits,
        })
    }

    /// Scan the front layer for operations that can be applied under the current layout: every
    /// 0- or 1-qubit operation, and every 2-qubit operation whose arguments map onto a coupling
    /// edge.
    fn executable_nodes(&self) -> Result<Vec<NodeIndex>, RoutingError> {
        let mut executable = Vec::new();
        for &node in self.front_layer.iter() {
            let qargs = self.dag.qargs(node);
            match qargs {
                &[] | &[_] => executable.push(node),
                &[a, b] => {
                    if self
                        .coupling
                        .is_edge(a.to_phys(self.layout), b.to_phys(self.layout))
                    {
                        executable.push(node);
                    }
                }
                _ => {
                    return Err(RoutingError::InvalidArity {
                        node: self.dag.node(node).id,
                        arity: qargs.len(),
                    })
                }
            }
        }
        Ok(executable)
    }

    /// Rewrite the given nodes onto the output and advance the front layer with any successors
    /// whose predecessors are now all applied.
    fn apply_executable(&mut self, nodes: &[NodeIndex]) {
        let mut reset_decay = false;
        for &node in nodes {
            let payload = self.dag.node(node);
            self.out.push_gate(payload, self.layout);
            self.front_layer.remove(&node);
            self.applied.insert(node);
            if !payload.qubits.is_empty() {
                reset_decay = true;
            }
            for successor in self.dag.operation_successors(node) {
                let resolved = self
                    .dag
                    .operation_predecessors(successor)
                    .iter()
                    .all(|predecessor| self.applied.contains(predecessor));
                if resolved {
                    self.front_layer.push_back(successor);
                }
            }
        }
        if reset_decay {
            self.qubits_decay.fill(1.);
        }
        // Routing a gate is progress; restart the stall detector for the new front layer.
        self.best_cost_since_progress = f64::INFINITY;
        self.swaps_since_progress = 0;
    }

    /// The virtual-qubit pairs of the (entirely two-qubit) front layer, in iteration order.
    fn front_pairs(&self) -> Vec<[VirtualQubit; 2]> {
        self.front_layer
            .iter()
            .map(|&node| {
                let qargs = self.dag.qargs(node);
                [qargs[0], qargs[1]]
            })
            .collect()
    }

    /// Return a set of candidate swaps that affect qubits in the front layer.
    ///
    /// For each virtual qubit in the front layer, find its current location on hardware and the
    /// physical qubits in that neighborhood.  Every swap on virtual qubits that corresponds to
    /// one of those physical couplings is a candidate swap, normalized so that `(i, j)` and
    /// `(j, i)` are not duplicated.
    fn obtain_swaps(&self) -> IndexSet<[VirtualQubit; 2]> {
        let mut candidate_swaps: IndexSet<[VirtualQubit; 2]> =
            IndexSet::with_capacity(2 * self.front_layer.len());
        for &node in self.front_layer.iter() {
            for &virt in self.dag.qargs(node) {
                let physical = virt.to_phys(self.layout);
                for neighbor in self.coupling.neighbors(physical) {
                    let virtual_neighbor = neighbor.to_virt(self.layout);
                    let swap = if virtual_neighbor > virt {
                        [virt, virtual_neighbor]
                    } else {
                        [virtual_neighbor, virt]
                    };
                    candidate_swaps.insert(swap);
                }
            }
        }
        candidate_swaps
    }

    /// Score every candidate swap on a trial layout, pick one of the best-scoring candidates
    /// (ties sorted, then broken by the injected RNG), emit it, and update the decay tracking.
    fn swap_step(&mut self) -> Result<[VirtualQubit; 2], RoutingError> {
        let layer = self.front_pairs();
        let extended_set = build_extended_set(self.dag, &self.front_layer, EXTENDED_SET_SIZE);
        let candidate_swaps = self.obtain_swaps();
        if candidate_swaps.is_empty() {
            return Err(RoutingError::EmptySwapCandidates);
        }
        let dist = self.coupling.distance_matrix();
        let mut min_score = f64::MAX;
        let mut best_swaps: Vec<[VirtualQubit; 2]> = Vec::new();
        for &swap_qubits in candidate_swaps.iter() {
            self.scratch.clone_from(self.layout);
            self.scratch.swap_virtual(swap_qubits[0], swap_qubits[1]);
            let score = score_heuristic(
                self.heuristic,
                &layer,
                extended_set.pairs(),
                &self.scratch,
                &swap_qubits,
                &dist,
                self.qubits_decay,
            );
            if score < min_score {
                min_score = score;
                best_swaps.clear();
                best_swaps.push(swap_qubits);
            } else if score == min_score {
                best_swaps.push(swap_qubits);
            }
        }
        best_swaps.sort_unstable();
        let best_swap = best_swaps[self.rng.choice(best_swaps.len())];
        self.out.push_swap(best_swap, self.layout);
        self.layout.swap_virtual(best_swap[0], best_swap[1]);
        self.num_search_steps += 1;
        if self.num_search_steps >= DECAY_RESET_INTERVAL {
            self.qubits_decay.fill(1.);
            self.num_search_steps = 0;
        } else {
            self.qubits_decay[best_swap[0].index()] += DECAY_RATE;
            self.qubits_decay[best_swap[1].index()] += DECAY_RATE;
        }
        self.track_progress(&layer)?;
        Ok(best_swap)
    }

    /// Check that the minimum basic front-layer cost keeps strictly decreasing often enough.
    /// When it stalls past the bound, the most distant front pair is unreachable and routing
    /// fails.
    fn track_progress(&mut self, layer: &[[VirtualQubit; 2]]) -> Result<(), RoutingError> {
        let cost = compute_cost(layer, self.layout, &self.coupling.distance_matrix());
        if cost < self.best_cost_since_progress {
            self.best_cost_since_progress = cost;
            self.swaps_since_progress = 0;
            return Ok(());
        }
        self.swaps_since_progress += 1;
        if self.swaps_since_progress <= self.max_swaps_without_progress {
            return Ok(());
        }
        let Some(farthest) = layer.iter().max_by(|a, b| {
            let dist_a = self.coupling.distance(a[0].to_phys(self.layout), a[1].to_phys(self.layout));
            let dist_b = self.coupling.distance(b[0].to_phys(self.layout), b[1].to_phys(self.layout));
            dist_a.partial_cmp(&dist_b).unwrap_or(Ordering::Equal)
        }) else {
            return Ok(());
        };
        Err(RoutingError::DisconnectedCoupling {
            q0: farthest[0].0,
            q1: farthest[1].0,
            attempts: self.swaps_since_progress,
        })
    }
}

/// Route a circuit with the SABRE heuristic.
///
/// Walks the DAG from the given initial front layer, emitting every operation whose qubits are
/// adjacent under the evolving layout and inserting swaps chosen by the configured heuristic
/// where they are not.  `layout` is mutated in place and holds the final mapping on return;
/// `qubits_decay` must have one entry per physical qubit, initialized to 1.
///
/// Returns the routed circuit, or an error if the circuit contains an operation on more than two
/// qubits or the coupling graph cannot connect a gate's qubits.
pub fn route<R: ChoiceRng>(
    front_layer: &[NodeIndex],
    dag: &RoutingDag,
    coupling: &CouplingView,
    layout: &mut NLayout,
    qubits_decay: &mut [f64],
    heuristic: Heuristic,
    rng: &mut R,
) -> Result<MappedDag, RoutingError> {
    let mut state = RouterState::new(
        front_layer,
        dag,
        coupling,
        layout,
        qubits_decay,
        heuristic,
        rng,
    )?;
    while !state.front_layer.is_empty() {
        let executable = state.executable_nodes()?;
        if !executable.is_empty() {
            state.apply_executable(&executable);
            continue;
        }
        state.swap_step()?;
    }
    Ok(state.out)
}

/// Run several independent routing passes with per-trial seeds derived from `seed`, and keep the
/// result with the fewest inserted swaps (ties broken by the lowest trial index, so the parallel
/// and serial paths pick the same winner).
pub fn route_trials(
    dag: &RoutingDag,
    coupling: &CouplingView,
    initial_layout: &NLayout,
    heuristic: Heuristic,
    seed: u64,
    num_trials: usize,
    run_in_parallel: bool,
) -> Result<(MappedDag, NLayout), RoutingError> {
    let outer_rng = Pcg64Mcg::seed_from_u64(seed);
    let seed_vec: Vec<u64> = outer_rng
        .sample_iter(&rand::distributions::Standard)
        .take(num_trials.max(1))
        .collect();
    let run_trial = |trial_seed: u64| -> Result<(MappedDag, NLayout), RoutingError> {
        let mut layout = initial_layout.clone();
        let mut qubits_decay = vec![1.; coupling.num_qubits()];
        let mut rng = SabreRng::seed_from_u64(trial_seed);
        let mapped = route(
            dag.front_layer(),
            dag,
            coupling,
            &mut layout,
            &mut qubits_decay,
            heuristic,
            &mut rng,
        )?;
        Ok((mapped, layout))
    };
    let results: Vec<(MappedDag, NLayout)> = if run_in_parallel {
        seed_vec
            .into_par_iter()
            .map(run_trial)
            .collect::<Result<_, _>>()?
    } else {
        seed_vec
            .into_iter()
            .map(run_trial)
            .collect::<Result<_, _>>()?
    };
    Ok(results
        .into_iter()
        .enumerate()
        .min_by_key(|(index, (mapped, _))| (mapped.swap_count(), *index))
        .map(|(_, result)| result)
        .expect("at least one trial always runs"))
}

#[cfg(test)]
mod tests {
    use ndarray::prelude::*;

    use super::*;
    use crate::dag::{OpDescriptor, OpNode};
    use crate::nlayout::PhysicalQubit;

    /// Deterministic stand-in for the RNG: always the first element of the sorted tied set.
    struct FirstChoice;

    impl ChoiceRng for FirstChoice {
        fn choice(&mut self, _len: usize) -> usize {
            0
        }
    }

    fn line_coupling(n: usize) -> CouplingView {
        let mut adjacency = Array2::zeros((n, n));
        for i in 0..n - 1 {
            adjacency[[i, i + 1]] = 1.;
            adjacency[[i + 1, i]] = 1.;
        }
        CouplingView::with_computed_distance(adjacency).unwrap()
    }

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

    fn route_simple(
        dag: &RoutingDag,
        coupling: &CouplingView,
        heuristic: Heuristic,
    ) -> (MappedDag, NLayout) {
        let mut layout = NLayout::generate_trivial_layout(coupling.num_qubits() as u32);
        let mut qubits_decay = vec![1.; coupling.num_qubits()];
        let mapped = route(
            dag.front_layer(),
            dag,
            coupling,
            &mut layout,
            &mut qubits_decay,
            heuristic,
            &mut FirstChoice,
        )
        .unwrap();
        (mapped, layout)
    }

    fn physical(op_qubits: &[PhysicalQubit]) -> Vec<u32> {
        op_qubits.iter().map(|q| q.0).collect()
    }

    #[test]
    fn adjacent_gate_routes_without_swaps() {
        let coupling = line_coupling(3);
        let dag = RoutingDag::new(None, 3, 0, vec![cx(0, 0, 1)]).unwrap();
        let (mapped, layout) = route_simple(&dag, &coupling, Heuristic::Basic);
        assert_eq!(mapped.ops().len(), 1);
        assert_eq!(mapped.ops()[0].source, Some(0));
        assert_eq!(physical(&mapped.ops()[0].qubits), vec![0, 1]);
        assert_eq!(layout, NLayout::generate_trivial_layout(3));
    }

    #[test]
    fn distant_gate_inserts_one_swap() {
        let coupling = line_coupling(3);
        let dag = RoutingDag::new(None, 3, 0, vec![cx(0, 0, 2)]).unwrap();
        let (mapped, _) = route_simple(&dag, &coupling, Heuristic::Basic);
        assert_eq!(mapped.ops().len(), 2);
        // The two candidates tie; sorted order puts (0, 1) first and the test RNG takes it.
        assert_eq!(mapped.ops()[0].source, None);
        assert_eq!(physical(&mapped.ops()[0].qubits), vec![0, 1]);
        assert_eq!(mapped.ops()[1].source, Some(0));
        assert_eq!(physical(&mapped.ops()[1].qubits), vec![1, 2]);
    }

    #[test]
    fn single_qubit_circuit_drains_in_order() {
        let coupling = line_coupling(2);
        let dag =
            RoutingDag::new(None, 2, 0, vec![h(0, 0), h(1, 0), h(2, 0)]).unwrap();
        let mut layout = NLayout::generate_trivial_layout(2);
        let mut qubits_decay = vec![1.; 2];
        let mapped = route(
            dag.front_layer(),
            &dag,
            &coupling,
            &mut layout,
            &mut qubits_decay,
            Heuristic::Decay,
            &mut FirstChoice,
        )
        .unwrap();
        let sources: Vec<Option<usize>> = mapped.ops().iter().map(|op| op.source).collect();
        assert_eq!(sources, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(mapped.swap_count(), 0);
        assert_eq!(layout, NLayout::generate_trivial_layout(2));
        // Draining a gate with qubit arguments resets the decay vector.
        assert_eq!(qubits_decay, vec![1.; 2]);
    }

    #[test]
    fn descriptor_payload_rides_through_untouched() {
        let coupling = line_coupling(2);
        let rz = OpNode::new(
            3,
            OpDescriptor::with_params("rz", [0.25]),
            [VirtualQubit::new(0)],
        );
        let dag = RoutingDag::new(None, 2, 0, vec![rz]).unwrap();
        let (mapped, _) = route_simple(&dag, &coupling, Heuristic::Basic);
        assert_eq!(mapped.ops().len(), 1);
        assert_eq!(mapped.ops()[0].op.name, "rz");
        assert_eq!(mapped.ops()[0].op.params[..], [0.25]);
        assert_eq!(mapped.ops()[0].source, Some(3));
    }

    #[test]
    fn decay_resets_every_fifth_swap() {
        let coupling = line_coupling(7);
        let dag = RoutingDag::new(None, 7, 0, vec![cx(0, 0, 6)]).unwrap();
        let mut layout = NLayout::generate_trivial_layout(7);
        let mut qubits_decay = vec![1.; 7];
        let mut rng = SabreRng::seed_from_u64(11);
        let mut state = RouterState::new(
            dag.front_layer(),
            &dag,
            &coupling,
            &mut layout,
            &mut qubits_decay,
            Heuristic::Decay,
            &mut rng,
        )
        .unwrap();
        for step in 1..=5u32 {
            let swap = state.swap_step().unwrap();
            if step % 5 == 0 {
                assert_eq!(state.qubits_decay, &vec![1.; 7][..]);
            } else {
                // Only the two swapped qubits picked up the decay increment this step.
                assert!(state.qubits_decay[swap[0].index()] >= 1. + DECAY_RATE);
                assert!(state.qubits_decay[swap[1].index()] >= 1. + DECAY_RATE);
                assert!(state
                    .qubits_decay
                    .iter()
                    .any(|&decay| decay > 1.));
            }
        }
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let coupling = line_coupling(5);
        let dag = RoutingDag::new(
            Some("bell-ish".to_owned()),
            5,
            0,
            vec![cx(0, 0, 4), cx(1, 1, 3), cx(2, 0, 2)],
        )
        .unwrap();
        let mut outputs = Vec::new();
        for _ in 0..2 {
            let mut layout = NLayout::generate_trivial_layout(5);
            let mut qubits_decay = vec![1.; 5];
            let mut rng = SabreRng::seed_from_u64(1234);
            let mapped = route(
                dag.front_layer(),
                &dag,
                &coupling,
                &mut layout,
                &mut qubits_decay,
                Heuristic::Decay,
                &mut rng,
            )
            .unwrap();
            outputs.push((mapped, layout));
        }
        assert_eq!(outputs[0], outputs[1]);
        assert_eq!(outputs[0].0.name(), Some("bell-ish"));
    }

    #[test]
    fn lookahead_breaks_front_layer_ties_toward_future_gates() {
        let coupling = line_coupling(5);
        let dag = RoutingDag::new(
            None,
            5,
            0,
            vec![cx(0, 0, 1), cx(1, 2, 3), cx(2, 1, 3), cx(3, 0, 3)],
        )
        .unwrap();

        // Under the basic heuristic the two front-layer-improving swaps tie and the sorted
        // order decides.
        let (basic, _) = route_simple(&dag, &coupling, Heuristic::Basic);
        let first_basic_swap = basic.ops().iter().find(|op| op.source.is_none()).unwrap();
        assert_eq!(physical(&first_basic_swap.qubits), vec![1, 2]);

        // The lookahead term sees the pending cx(0, 3) and prefers the swap that also shortens
        // it, which is unique.
        let (lookahead, _) = route_simple(&dag, &coupling, Heuristic::Lookahead);
        let first_lookahead_swap = lookahead
            .ops()
            .iter()
            .find(|op| op.source.is_none())
            .unwrap();
        assert_eq!(physical(&first_lookahead_swap.qubits), vec![2, 3]);
    }

    #[test]
    fn output_respects_dag_order_and_coupling() {
        let coupling = line_coupling(4);
        let dag = RoutingDag::new(
            None,
            4,
            0,
            vec![
                cx(0, 0, 3),
                cx(1, 1, 2),
                cx(2, 0, 1),
                h(3, 3),
                cx(4, 2, 3),
                cx(5, 0, 2),
            ],
        )
        .unwrap();
        let mut layout = NLayout::generate_trivial_layout(4);
        let mut qubits_decay = vec![1.; 4];
        let mut rng = SabreRng::seed_from_u64(7);
        let mapped = route(
            dag.front_layer(),
            &dag,
            &coupling,
            &mut layout,
            &mut qubits_decay,
            Heuristic::Decay,
            &mut rng,
        )
        .unwrap();

        // Every circuit operation appears exactly once.
        let mut position = hashbrown::HashMap::new();
        for (index, op) in mapped.ops().iter().enumerate() {
            if let Some(source) = op.source {
                assert!(position.insert(source, index).is_none());
            }
        }
        assert_eq!(position.len(), dag.num_nodes());

        // Data dependences of the input DAG are preserved in the output order.
        for node in dag.node_indices() {
            for successor in dag.operation_successors(node) {
                assert!(position[&dag.node(node).id] < position[&dag.node(successor).id]);
            }
        }

        // Every emitted two-qubit operation (swaps included) sits on a coupling edge.
        for op in mapped.ops() {
            if let [a, b] = op.qubits[..] {
                assert!(coupling.is_edge(a, b));
            }
        }

        // The final layout is still a bijection.
        assert!(layout.is_consistent());

        // Generous termination bound: swap count well under gates times diameter.
        assert!(mapped.ops().len() < 48);
    }

    #[test]
    fn swaps_are_normalized_before_rewriting() {
        // Virtual pair (2, 0) must be considered as (0, 2) wherever it becomes a candidate.
        let coupling = line_coupling(4);
        let dag = RoutingDag::new(None, 4, 0, vec![cx(0, 3, 1), cx(1, 2, 0)]).unwrap();
        let mut layout = NLayout::generate_trivial_layout(4);
        let mut qubits_decay = vec![1.; 4];
        let mut rng = SabreRng::seed_from_u64(99);
        let state = RouterState::new(
            dag.front_layer(),
            &dag,
            &coupling,
            &mut layout,
            &mut qubits_decay,
            Heuristic::Basic,
            &mut rng,
        )
        .unwrap();
        for swap in state.obtain_swaps().iter() {
            assert!(swap[0] < swap[1]);
        }
    }

    #[test]
    fn three_qubit_gate_is_rejected() {
        let coupling = line_coupling(3);
        let toffoli = OpNode::new(
            7,
            OpDescriptor::new("ccx"),
            [
                VirtualQubit::new(0),
                VirtualQubit::new(1),
                VirtualQubit::new(2),
            ],
        );
        let dag = RoutingDag::new(None, 3, 0, vec![toffoli]).unwrap();
        let mut layout = NLayout::generate_trivial_layout(3);
        let mut qubits_decay = vec![1.; 3];
        let result = route(
            dag.front_layer(),
            &dag,
            &coupling,
            &mut layout,
            &mut qubits_decay,
            Heuristic::Basic,
            &mut FirstChoice,
        );
        assert_eq!(
            result,
            Err(RoutingError::InvalidArity { node: 7, arity: 3 })
        );
    }

    #[test]
    fn isolated_qubits_produce_no_candidates() {
        let adjacency = Array2::zeros((2, 2));
        let coupling = CouplingView::with_computed_distance(adjacency).unwrap();
        let dag = RoutingDag::new(None, 2, 0, vec![cx(0, 0, 1)]).unwrap();
        let mut layout = NLayout::generate_trivial_layout(2);
        let mut qubits_decay = vec![1.; 2];
        let result = route(
            dag.front_layer(),
            &dag,
            &coupling,
            &mut layout,
            &mut qubits_decay,
            Heuristic::Basic,
            &mut FirstChoice,
        );
        assert_eq!(result, Err(RoutingError::EmptySwapCandidates));
    }

    #[test]
    fn disconnected_components_are_detected() {
        let mut adjacency = Array2::zeros((4, 4));
        adjacency[[0, 1]] = 1.;
        adjacency[[1, 0]] = 1.;
        adjacency[[2, 3]] = 1.;
        adjacency[[3, 2]] = 1.;
        let coupling = CouplingView::with_computed_distance(adjacency).unwrap();
        let dag = RoutingDag::new(None, 4, 0, vec![cx(0, 0, 2)]).unwrap();
        let mut layout = NLayout::generate_trivial_layout(4);
        let mut qubits_decay = vec![1.; 4];
        let mut rng = SabreRng::seed_from_u64(5);
        let result = route(
            dag.front_layer(),
            &dag,
            &coupling,
            &mut layout,
            &mut qubits_decay,
            Heuristic::Basic,
            &mut rng,
        );
        assert!(matches!(
            result,
            Err(RoutingError::DisconnectedCoupling { q0: 0, q1: 2, .. })
        ));
    }

    #[test]
    fn mismatched_inputs_are_rejected() {
        let coupling = line_coupling(2);
        let dag = RoutingDag::new(None, 2, 0, vec![cx(0, 0, 1)]).unwrap();

        // Decay vector sized for the wrong device.
        let mut layout = NLayout::generate_trivial_layout(2);
        let mut qubits_decay = vec![1.; 3];
        let result = route(
            dag.front_layer(),
            &dag,
            &coupling,
            &mut layout,
            &mut qubits_decay,
            Heuristic::Basic,
            &mut FirstChoice,
        );
        assert_eq!(
            result,
            Err(RoutingError::ShapeMismatch {
                what: "decay vector",
                actual: 3,
                expected: 2
            })
        );

        // Layout sized for the wrong device.
        let mut wide_layout = NLayout::generate_trivial_layout(4);
        let mut qubits_decay = vec![1.; 2];
        let result = route(
            dag.front_layer(),
            &dag,
            &coupling,
            &mut wide_layout,
            &mut qubits_decay,
            Heuristic::Basic,
            &mut FirstChoice,
        );
        assert_eq!(
            result,
            Err(RoutingError::ShapeMismatch {
                what: "layout",
                actual: 4,
                expected: 2
            })
        );
    }

    #[test]
    fn trial_sweep_is_deterministic_across_parallelism() {
        let coupling = line_coupling(6);
        let dag = RoutingDag::new(
            None,
            6,
            0,
            vec![cx(0, 0, 5), cx(1, 1, 4), cx(2, 2, 5), cx(3, 0, 3)],
        )
        .unwrap();
        let layout = NLayout::generate_trivial_layout(6);
        let serial =
            route_trials(&dag, &coupling, &layout, Heuristic::Decay, 42, 4, false).unwrap();
        let parallel =
            route_trials(&dag, &coupling, &layout, Heuristic::Decay, 42, 4, true).unwrap();
        assert_eq!(serial, parallel);
        assert!(serial.0.swap_count() > 0);
        assert!(serial.1.is_consistent());
    }
}
