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

use hashbrown::HashMap;
use nalgebra::{Matrix2, Matrix3};
use num_complex::Complex64;
use num_traits::FloatConst;
use rstar::{Point, RTree};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::gates::DiscreteGate;
use super::math;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscreteBasisError {
    /// A query ran against an approximation set with no entries.
    #[error("the basic-approximation set is empty")]
    EmptyApproximationSet,
}

/// A sequence of single-qubit gates and their matrix.
///
/// Gates are stored in **circuit order**, not in matrix multiplication order: `[H, T]`
/// corresponds to the matrix `T * H`.  The matrix is kept in the SO(3) representation, which
/// discards the global phase; `phase` tracks the angle taking the U(2) product of the gates to
/// SU(2).
#[derive(Clone, Debug)]
pub struct GateSequence {
    pub gates: Vec<DiscreteGate>,
    pub matrix_so3: Matrix3<f64>,
    pub phase: f64,
}

impl Default for GateSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl GateSequence {
    /// The empty sequence, representing the identity.
    pub fn new() -> Self {
        Self {
            gates: vec![],
            matrix_so3: Matrix3::identity(),
            phase: 0.,
        }
    }

    /// The concatenated gate names, e.g. ``"hth"``.
    pub fn label(&self) -> String {
        self.gates.iter().map(|gate| gate.name()).collect()
    }

    /// Append a gate to the sequence, updating the matrix representation and phase.
    pub fn push(&mut self, gate: DiscreteGate) {
        let (matrix_so3, phase) = gate.so3();
        self.matrix_so3 = matrix_so3 * self.matrix_so3;
        self.phase += phase;
        self.gates.push(gate);
    }

    /// Merge two sequences.  `self.dot(other)` yields the sequence whose gates are
    /// ``other.gates + self.gates``, i.e. `other` runs first in circuit order.
    pub fn dot(&self, other: &GateSequence) -> GateSequence {
        let mut gates = Vec::with_capacity(other.gates.len() + self.gates.len());
        gates.extend_from_slice(&other.gates);
        gates.extend_from_slice(&self.gates);
        Self {
            gates,
            matrix_so3: self.matrix_so3 * other.matrix_so3,
            phase: self.phase + other.phase,
        }
    }

    /// The adjoint sequence: gates reversed and inverted, matrix transposed.
    pub fn adjoint(&self) -> GateSequence {
        let gates = self.gates.iter().rev().map(|gate| gate.inverse()).collect();
        Self {
            gates,
            // The transpose of an orthogonal matrix is its inverse.
            matrix_so3: self.matrix_so3.transpose(),
            phase: -self.phase,
        }
    }

    /// Remove adjacent gate-inverse pairs in place.  The matrix representation is untouched
    /// since every removed pair multiplies to the identity.
    pub fn inverse_cancellation(&mut self) {
        if self.gates.len() < 2 {
            return;
        }
        let mut reduced: Vec<DiscreteGate> = Vec::with_capacity(self.gates.len());
        for &gate in &self.gates {
            if reduced.last() == Some(&gate.inverse()) {
                reduced.pop();
            } else {
                reduced.push(gate);
            }
        }
        self.gates = reduced;
    }

    /// The U(2) matrix implemented by the gates.
    pub fn u2(&self) -> Matrix2<Complex64> {
        let mut out = Matrix2::identity();
        for gate in &self.gates {
            out = gate.u2() * out;
        }
        out
    }

    /// Compute the global phase this sequence needs to match the target unitary.
    ///
    /// This assumes the sequence is a good approximation of `target_u2`; the result is
    /// meaningless otherwise.  The SU(2)-to-SO(3) mapping loses a sign, so the candidate phase
    /// is checked against the target and shifted by pi when the signs disagree.
    pub fn compute_phase(&self, target_u2: &Matrix2<Complex64>, target_phase: f64) -> f64 {
        let self_u2 = self.u2();
        let (target_first, self_first) = target_u2
            .iter()
            .zip(self_u2.iter())
            .find(|&(el, _)| el.norm() >= 0.5)
            .expect("a unitary matrix always has an element of norm at least one half");

        let phase_candidate = self.phase - target_phase;
        let candidate = self_first * Complex64::new(0., phase_candidate).exp();
        if (target_first - candidate).norm() < (target_first + candidate).norm() {
            phase_candidate
        } else {
            phase_candidate + f64::PI()
        }
    }
}

/// A serializable form of [GateSequence] used to persist [BasicApproximations].
#[derive(Serialize, Deserialize)]
struct SerializableGateSequence {
    gates: Vec<DiscreteGate>,
    matrix_so3: Vec<f64>,
    phase: f64,
}

impl From<&GateSequence> for SerializableGateSequence {
    fn from(value: &GateSequence) -> Self {
        Self {
            gates: value.gates.clone(),
            matrix_so3: value.matrix_so3.iter().copied().collect(),
            phase: value.phase,
        }
    }
}

impl From<&SerializableGateSequence> for GateSequence {
    fn from(value: &SerializableGateSequence) -> Self {
        Self {
            gates: value.gates.clone(),
            matrix_so3: Matrix3::from_iterator(value.matrix_so3.iter().copied()),
            phase: value.phase,
        }
    }
}

/// A point in the R* tree: the flattened SO(3) representation of a gate sequence, plus an
/// optional index to retrieve the sequence itself.  Query points carry no index.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicPoint {
    point: [f64; 9],
    index: Option<usize>,
}

impl BasicPoint {
    fn from_sequence(sequence: &GateSequence, index: usize) -> Self {
        Self {
            point: ::core::array::from_fn(|i| sequence.matrix_so3[(i % 3, i / 3)]),
            index: Some(index),
        }
    }

    fn from_matrix(matrix: &Matrix3<f64>) -> Self {
        Self {
            point: ::core::array::from_fn(|i| matrix[(i % 3, i / 3)]),
            index: None,
        }
    }
}

impl Point for BasicPoint {
    type Scalar = f64;
    const DIMENSIONS: usize = 9;

    fn generate(generator: impl FnMut(usize) -> Self::Scalar) -> Self {
        BasicPoint {
            point: ::core::array::from_fn(generator),
            index: None,
        }
    }

    fn nth(&self, index: usize) -> Self::Scalar {
        self.point[index]
    }

    fn nth_mut(&mut self, index: usize) -> &mut Self::Scalar {
        &mut self.point[index]
    }
}

/// The epsilon-net of short gate words the Solovay-Kitaev recursion bottoms out on.
///
/// Construction enumerates every word over the basis up to a maximum depth, keeping a word only
/// if no kept word lies within `sqrt(tol)` of it in the flattened SO(3) embedding.  Queries are
/// nearest-neighbor lookups in an R* tree over that embedding.
#[derive(Debug)]
pub struct BasicApproximations {
    points: RTree<BasicPoint>,
    approximations: HashMap<usize, GateSequence>,
}

impl BasicApproximations {
    /// Generate the net for words over `basis_gates` of length up to `depth`.  `tol` controls
    /// the granularity; it defaults to `1e-12`.
    pub fn generate_from(basis_gates: &[DiscreteGate], depth: usize, tol: Option<f64>) -> Self {
        let mut points: RTree<BasicPoint> = RTree::new();
        let mut approximations: HashMap<usize, GateSequence> = HashMap::new();

        // The identity approximation.
        let root = GateSequence::new();
        points.insert(BasicPoint::from_sequence(&root, 0));
        approximations.insert(0, root);
        let mut index = 1;

        let mut this_level: Vec<GateSequence> = vec![GateSequence::new()];
        let mut next_level: Vec<GateSequence> = Vec::new();
        let radius_sq = tol.unwrap_or(1e-12);

        for _ in 0..depth {
            for node in this_level.iter() {
                for &gate in basis_gates {
                    let mut candidate = node.clone();
                    candidate.push(gate);
                    let point = BasicPoint::from_sequence(&candidate, index);
                    if points
                        .locate_within_distance(point.clone(), radius_sq)
                        .next()
                        .is_none()
                    {
                        points.insert(point);
                        approximations.insert(index, candidate.clone());
                        index += 1;
                        next_level.push(candidate);
                    }
                }
            }
            this_level.clone_from(&next_level);
            next_level.clear();
        }

        Self {
            points,
            approximations,
        }
    }

    /// The closest stored sequence to the given SO(3) matrix, or `None` if the net is empty.
    pub fn query(&self, matrix: &Matrix3<f64>) -> Option<&GateSequence> {
        let query_point = BasicPoint::from_matrix(matrix);
        self.points.nearest_neighbor(&query_point).map(|point| {
            let index = point
                .index
                .expect("every stored point was inserted with an index");
            self.approximations
                .get(&index)
                .expect("every stored index has a sequence")
        })
    }

    /// Number of stored approximations.
    pub fn len(&self) -> usize {
        self.approximations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.approximations.is_empty()
    }

    /// Persist the net so the generation cost is paid once.  See [Self::load].
    pub fn save(&self, filename: &str) -> ::std::io::Result<()> {
        let serializable: HashMap<usize, SerializableGateSequence> = self
            .approximations
            .iter()
            .map(|(key, value)| (*key, SerializableGateSequence::from(value)))
            .collect();
        let file = ::std::fs::File::create(filename)?;
        bincode::serialize_into(file, &serializable).map_err(::std::io::Error::other)?;
        Ok(())
    }

    /// Load a net previously written by [Self::save].
    pub fn load(filename: &str) -> ::std::io::Result<Self> {
        let file = ::std::fs::File::open(filename)?;
        let serializable: HashMap<usize, SerializableGateSequence> =
            bincode::deserialize_from(file).map_err(::std::io::Error::other)?;
        let approximations: HashMap<usize, GateSequence> = serializable
            .iter()
            .map(|(key, value)| (*key, GateSequence::from(value)))
            .collect();
        let mut points: RTree<BasicPoint> = RTree::new();
        for (index, sequence) in approximations.iter() {
            points.insert(BasicPoint::from_sequence(sequence, *index));
        }
        Ok(Self {
            points,
            approximations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::abs_diff_eq;

    const BASIS: [DiscreteGate; 3] = [DiscreteGate::H, DiscreteGate::T, DiscreteGate::Tdg];

    #[test]
    fn sequence_matrix_tracks_its_gates() {
        let mut sequence = GateSequence::new();
        sequence.push(DiscreteGate::H);
        sequence.push(DiscreteGate::T);
        let (h_so3, _) = DiscreteGate::H.so3();
        let (t_so3, _) = DiscreteGate::T.so3();
        assert!(abs_diff_eq!(
            sequence.matrix_so3,
            t_so3 * h_so3,
            epsilon = 1e-12
        ));
        assert_eq!(sequence.label(), "ht");
    }

    #[test]
    fn adjoint_inverts_the_sequence() {
        let mut sequence = GateSequence::new();
        sequence.push(DiscreteGate::H);
        sequence.push(DiscreteGate::T);
        sequence.push(DiscreteGate::S);
        let product = sequence.dot(&sequence.adjoint());
        assert!(abs_diff_eq!(
            product.matrix_so3,
            Matrix3::identity(),
            epsilon = 1e-12
        ));
    }

    #[test]
    fn inverse_cancellation_removes_adjacent_pairs() {
        let mut sequence = GateSequence::new();
        for gate in [
            DiscreteGate::H,
            DiscreteGate::T,
            DiscreteGate::Tdg,
            DiscreteGate::H,
            DiscreteGate::S,
        ] {
            sequence.push(gate);
        }
        sequence.inverse_cancellation();
        // t/tdg cancels first, which exposes the h/h pair.
        assert_eq!(sequence.label(), "s");
    }

    #[test]
    fn query_finds_exact_words() {
        let net = BasicApproximations::generate_from(&BASIS, 3, None);
        let (t_so3, _) = DiscreteGate::T.so3();
        let found = net.query(&t_so3).unwrap();
        assert!(abs_diff_eq!(found.matrix_so3, t_so3, epsilon = 1e-9));
        assert_eq!(found.label(), "t");
    }

    #[test]
    fn identity_is_always_present() {
        let net = BasicApproximations::generate_from(&BASIS, 1, None);
        let found = net.query(&Matrix3::identity()).unwrap();
        assert!(found.gates.is_empty());
    }

    #[test]
    fn duplicate_words_are_deduplicated() {
        // With only self-inverse H in the basis, depth 4 yields just identity and "h".
        let net = BasicApproximations::generate_from(&[DiscreteGate::H], 4, None);
        assert_eq!(net.len(), 2);
    }

    #[test]
    fn save_and_load_round_trip() {
        let net = BasicApproximations::generate_from(&BASIS, 2, None);
        let path = std::env::temp_dir().join(format!(
            "sabre-router-basic-approximations-{}.bin",
            std::process::id()
        ));
        let path = path.to_str().unwrap().to_owned();
        net.save(&path).unwrap();
        let loaded = BasicApproximations::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.len(), net.len());
        let (t_so3, _) = DiscreteGate::T.so3();
        assert_eq!(loaded.query(&t_so3).unwrap().label(), "t");
    }
}
