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

//! SO(3)/SU(2) helpers for the Solovay-Kitaev recursion.  Everything here follows the
//! construction in section 4.1 of <https://arxiv.org/abs/quant-ph/0505030>.

use nalgebra::{Matrix2, Matrix3, Vector3};
use num_complex::Complex64;
use std::ops::Div;

/// The skew-symmetric matrix representing the cross product with `v`.
#[inline]
fn skew(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(0., -v[2], v[1], v[2], 0., -v[0], -v[1], v[0], 0.)
}

/// The SO(3) matrix rotating by `angle` about `axis` (Rodrigues formula).  `axis` must be
/// normalized.
pub fn so3_from_angle_axis(angle: f64, axis: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::identity() * angle.cos()
        + skew(axis) * angle.sin()
        + (axis * axis.transpose()) * (1. - angle.cos())
}

/// Solve equation (10) of the reference for the rotation angle of the commutator factors, using
/// the substitution `sin(u/2) = sin^2(phi/4)`.
pub(crate) fn solve_decomposition_angle(matrix: &Matrix3<f64>) -> f64 {
    let trace = matrix.trace().min(3.0); // avoid roundoff errors
    let angle = ((trace - 1.) / 2.).acos();
    2. * (angle / 4.).sin().sqrt().abs().asin()
}

/// The group commutator `L R L^{-1} R^{-1}`, using that SO(3) inverses are transposes.
fn group_commutator(left: &Matrix3<f64>, right: &Matrix3<f64>) -> Matrix3<f64> {
    left * right * left.transpose() * right.transpose()
}

/// Extract the rotation axis of an SO(3) matrix.
fn rotation_axis(matrix: &Matrix3<f64>, tol: f64) -> Vector3<f64> {
    let trace = matrix.trace();

    if trace >= 3. - tol {
        // The matrix is the identity; any axis will do.
        return Vector3::identity();
    }

    if trace >= tol - 1. {
        // A usable skew-symmetric part exists, so read the axis off it.
        let theta = ((trace - 1.) / 2.).acos();
        if theta.sin() > tol {
            let coeff = 1. / 2. / theta.sin();
            let axis = Vector3::new(
                coeff * (matrix[(2, 1)] - matrix[(1, 2)]),
                coeff * (matrix[(0, 2)] - matrix[(2, 0)]),
                coeff * (matrix[(1, 0)] - matrix[(0, 1)]),
            );
            // This can produce NaN if the matrix was diagonal up to numerical error; fall
            // through to the diagonal case then.
            if !axis.iter().any(|el| el.is_nan()) {
                return axis.normalize();
            }
        }
    }

    // A 180 degree rotation: recover the axis magnitudes from the diagonal, then fix the signs
    // by pinning the first nonzero component positive.
    let mut axis = Vector3::new(
        ((1. + matrix[(0, 0)]) / 2.).sqrt(),
        ((1. + matrix[(1, 1)]) / 2.).sqrt(),
        ((1. + matrix[(2, 2)]) / 2.).sqrt(),
    );
    let pivot = axis
        .iter()
        .enumerate()
        .find(|(_, el)| el.abs() > tol)
        .expect("a rotation axis always has a nonzero component")
        .0;
    match pivot {
        0 => {
            if matrix[(0, 1)] < 0. {
                axis[1] *= -1.;
            }
            if matrix[(0, 2)] < 0. {
                axis[2] *= -1.;
            }
        }
        1 => {
            if matrix[(1, 2)] < 0. {
                axis[2] *= -1.;
            }
        }
        _ => (),
    }
    axis
}

/// The SO(3) matrix rotating direction `from` onto direction `to`.
fn alignment_rotation(from: &Vector3<f64>, to: &Vector3<f64>, do_checks: bool) -> Matrix3<f64> {
    let from = from.normalize();
    let to = to.normalize();
    let cross = skew(&from.cross(&to));
    let out = Matrix3::identity() + cross + cross * cross / (1. + from.dot(&to));
    if do_checks {
        assert_so3("alignment rotation", &out);
    }
    out
}

/// Decompose the SO(3) input into a balanced group commutator `M = V W V^T W^T`.
///
/// Both factors rotate by the same angle: first the canonical commutator about the x- and y-axes
/// is built, then both factors are conjugated so the commutator's axis lands on the input's.
pub fn group_commutator_decomposition(
    matrix_so3: &Matrix3<f64>,
    do_checks: bool,
) -> (Matrix3<f64>, Matrix3<f64>) {
    if do_checks {
        assert_so3("commutator input", matrix_so3);
    }

    let angle = solve_decomposition_angle(matrix_so3);
    let vx = so3_from_angle_axis(angle, &Vector3::new(1., 0., 0.));
    let wy = so3_from_angle_axis(angle, &Vector3::new(0., 1., 0.));

    let tol = 1e-15;
    let commutator = group_commutator(&vx, &wy);
    let commutator_axis = rotation_axis(&commutator, tol);
    let matrix_axis = rotation_axis(matrix_so3, tol);

    let sim = alignment_rotation(&commutator_axis, &matrix_axis, do_checks);
    let sim_t = sim.transpose();
    let v = sim * vx * sim_t;
    let w = sim * wy * sim_t;

    if do_checks {
        assert_so3("commutator factor v", &v);
        assert_so3("commutator factor w", &w);
    }
    (v, w)
}

/// Panic if `matrix` is not close to a special orthogonal matrix.  Only called on paths guarded
/// by a caller's `do_checks` flag.
pub(crate) fn assert_so3(name: &str, matrix: &Matrix3<f64>) {
    if matrix.iter().any(|el| el.is_nan()) {
        panic!("{} has NaN value.", name);
    }
    if (1. - matrix.determinant()).abs() > 1e-5 {
        panic!(
            "{} is not SO(3): determinant is {}, not 1.",
            name,
            matrix.determinant()
        );
    }
    let defect = matrix * matrix.transpose() - Matrix3::<f64>::identity();
    if defect.iter().any(|el| el.abs() > 1e-5) {
        panic!("{} is not SO(3): matrix is not orthogonal.", name);
    }
}

/// Map an SU(2) matrix onto its SO(3) rotation.
pub fn su2_to_so3(matrix_su2: &Matrix2<Complex64>) -> Matrix3<f64> {
    let a = matrix_su2[(0, 0)].re;
    let b = matrix_su2[(0, 0)].im;
    let c = -matrix_su2[(0, 1)].re;
    let d = -matrix_su2[(0, 1)].im;

    Matrix3::new(
        a.powi(2) - b.powi(2) - c.powi(2) + d.powi(2),
        2.0 * (a * b + c * d),
        2.0 * (b * d - a * c),
        2.0 * (c * d - a * b),
        a.powi(2) - b.powi(2) + c.powi(2) - d.powi(2),
        2.0 * (a * d + b * c),
        2.0 * (a * c + b * d),
        2.0 * (b * c - a * d),
        a.powi(2) + b.powi(2) - c.powi(2) - d.powi(2),
    )
}

/// Map a U(2) matrix onto its SO(3) rotation, also returning the global phase that takes the
/// U(2) matrix to SU(2).
pub fn u2_to_so3(matrix_u2: &Matrix2<Complex64>) -> (Matrix3<f64>, f64) {
    let determinant =
        matrix_u2[(0, 0)] * matrix_u2[(1, 1)] - matrix_u2[(1, 0)] * matrix_u2[(0, 1)];
    let matrix_su2 = matrix_u2.div(determinant.sqrt());
    let matrix_so3 = su2_to_so3(&matrix_su2);
    let z = 1. / determinant.sqrt();
    let phase = z.im.atan2(z.re);
    (matrix_so3, phase)
}
