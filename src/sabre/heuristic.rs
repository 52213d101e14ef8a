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

use ndarray::prelude::*;

use crate::nlayout::{NLayout, VirtualQubit};

use super::EXTENDED_SET_WEIGHT;

/// Which of the heuristic cost functions the router minimizes when it picks a swap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// Sum of the physical distances of every gate in the front layer.
    Basic = 1,
    /// The basic cost averaged over the front layer, plus the weighted averaged cost of the
    /// lookahead window.
    Lookahead = 2,
    /// The lookahead cost scaled by the decay of the qubits the candidate swap touches.
    Decay = 3,
}

/// Sum of distances between the mapped qubit pairs of `layer`, accumulated left to right.
#[inline]
pub(crate) fn compute_cost(
    layer: &[[VirtualQubit; 2]],
    layout: &NLayout,
    dist: &ArrayView2<f64>,
) -> f64 {
    layer
        .iter()
        .map(|gate| {
            dist[[
                gate[0].to_phys(layout).index(),
                gate[1].to_phys(layout).index(),
            ]]
        })
        .sum()
}

fn score_lookahead(
    layer: &[[VirtualQubit; 2]],
    extended_set: &[[VirtualQubit; 2]],
    layout: &NLayout,
    dist: &ArrayView2<f64>,
) -> f64 {
    let mut first_cost = compute_cost(layer, layout, dist);
    first_cost /= layer.len() as f64;
    let second_cost = if extended_set.is_empty() {
        0.
    } else {
        compute_cost(extended_set, layout, dist) / extended_set.len() as f64
    };
    first_cost + EXTENDED_SET_WEIGHT * second_cost
}

fn score_decay(
    layer: &[[VirtualQubit; 2]],
    extended_set: &[[VirtualQubit; 2]],
    layout: &NLayout,
    swap_qubits: &[VirtualQubit; 2],
    dist: &ArrayView2<f64>,
    qubits_decay: &[f64],
) -> f64 {
    let total_cost = score_lookahead(layer, extended_set, layout, dist);
    qubits_decay[swap_qubits[0].index()].max(qubits_decay[swap_qubits[1].index()]) * total_cost
}

pub(crate) fn score_heuristic(
    heuristic: Heuristic,
    layer: &[[VirtualQubit; 2]],
    extended_set: &[[VirtualQubit; 2]],
    layout: &NLayout,
    swap_qubits: &[VirtualQubit; 2],
    dist: &ArrayView2<f64>,
    qubits_decay: &[f64],
) -> f64 {
    match heuristic {
        Heuristic::Basic => compute_cost(layer, layout, dist),
        Heuristic::Lookahead => score_lookahead(layer, extended_set, layout, dist),
        Heuristic::Decay => score_decay(
            layer,
            extended_set,
            layout,
            swap_qubits,
            dist,
            qubits_decay,
        ),
    }
}
