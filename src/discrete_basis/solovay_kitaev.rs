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

use nalgebra::{Matrix2, Matrix3};
use num_complex::Complex64;

use super::basic_approximations::{BasicApproximations, DiscreteBasisError, GateSequence};
use super::gates::DiscreteGate;
use super::math::{self, group_commutator_decomposition};

/// The result of a synthesis query: the gate word, and the global phase under which the word's
/// U(2) matrix matches the synthesis target.
#[derive(Clone, Debug)]
pub struct Approximation {
    pub sequence: GateSequence,
    pub global_phase: f64,
}

/// A stateful implementation of the Solovay-Kitaev algorithm, following
/// <https://arxiv.org/abs/quant-ph/0505030>.
///
/// The set of basic approximations is generated once at construction and reused for every
/// queried decomposition.
pub struct SolovayKitaev {
    basic_approximations: BasicApproximations,
    /// Whether to perform runtime SO(3) checks on the handled matrices.
    do_checks: bool,
}

impl SolovayKitaev {
    /// Initialize by generating the basic-approximation net for words over `basis_gates` up to
    /// `depth`.  `tol` is the net granularity (defaults to `1e-12`).
    pub fn new(basis_gates: &[DiscreteGate], depth: usize, tol: Option<f64>, do_checks: bool) -> Self {
        Self {
            basic_approximations: BasicApproximations::generate_from(basis_gates, depth, tol),
            do_checks,
        }
    }

    /// Load the basic approximations from a file written by
    /// [Self::save_basic_approximations].
    pub fn from_basic_approximations(filename: &str, do_checks: bool) -> ::std::io::Result<Self> {
        Ok(Self {
            basic_approximations: BasicApproximations::load(filename)?,
            do_checks,
        })
    }

    /// Persist the basic approximations, so a later instance can skip the generation cost.
    pub fn save_basic_approximations(&self, filename: &str) -> ::std::io::Result<()> {
        self.basic_approximations.save(filename)
    }

    /// Run the algorithm on a U(2) matrix, recursing `recursion_degree` times.
    pub fn synthesize_matrix(
        &self,
        matrix_u2: &Matrix2<Complex64>,
        recursion_degree: usize,
    ) -> Result<Approximation, DiscreteBasisError> {
        let (matrix_so3, phase) = math::u2_to_so3(matrix_u2);
        let mut sequence = self.recurse(&matrix_so3, recursion_degree)?;
        sequence.inverse_cancellation();
        let global_phase = sequence.compute_phase(matrix_u2, phase);
        Ok(Approximation {
            sequence,
            global_phase,
        })
    }

    /// Run the algorithm on a gate of the discrete alphabet.  Mostly useful to re-express a gate
    /// over a different basis.
    pub fn synthesize_gate(
        &self,
        gate: DiscreteGate,
        recursion_degree: usize,
    ) -> Result<Approximation, DiscreteBasisError> {
        self.synthesize_matrix(&gate.u2(), recursion_degree)
    }

    /// One recursion step.
    ///
    /// At the recursion root, return the closest element of the basic-approximation net.
    /// Otherwise approximate one level lower, express the residual as a balanced group
    /// commutator, recurse on its two factors, and stitch the pieces back together.
    fn recurse(
        &self,
        matrix_so3: &Matrix3<f64>,
        degree: usize,
    ) -> Result<GateSequence, DiscreteBasisError> {
        if degree == 0 {
            if self.do_checks {
                math::assert_so3("recursion root", matrix_so3);
            }
            return self
                .basic_approximations
                .query(matrix_so3)
                .cloned()
                .ok_or(DiscreteBasisError::EmptyApproximationSet);
        }

        let u_n1 = self.recurse(matrix_so3, degree - 1)?;

        // Improve the residual between the approximation and the target.
        let delta = matrix_so3 * u_n1.matrix_so3.transpose();
        let (matrix_vn, matrix_wn) = group_commutator_decomposition(&delta, self.do_checks);

        let v_n1 = self.recurse(&matrix_vn, degree - 1)?;
        let w_n1 = self.recurse(&matrix_wn, degree - 1)?;

        Ok(v_n1
            .dot(&w_n1)
            .dot(&v_n1.adjoint())
            .dot(&w_n1.adjoint())
            .dot(&u_n1))
    }
}
