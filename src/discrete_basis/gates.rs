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
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use super::math;

/// The discrete single-qubit gate alphabet available for basic-approximation sets.  Every member
/// is parameter-free and has an exact inverse within the alphabet, which keeps gate words closed
/// under adjoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscreteGate {
    H,
    T,
    Tdg,
    S,
    Sdg,
    X,
    Y,
    Z,
}

impl DiscreteGate {
    pub fn name(self) -> &'static str {
        match self {
            DiscreteGate::H => "h",
            DiscreteGate::T => "t",
            DiscreteGate::Tdg => "tdg",
            DiscreteGate::S => "s",
            DiscreteGate::Sdg => "sdg",
            DiscreteGate::X => "x",
            DiscreteGate::Y => "y",
            DiscreteGate::Z => "z",
        }
    }

    /// The gate whose matrix is the adjoint of this gate's matrix.
    pub fn inverse(self) -> DiscreteGate {
        match self {
            DiscreteGate::H => DiscreteGate::H,
            DiscreteGate::T => DiscreteGate::Tdg,
            DiscreteGate::Tdg => DiscreteGate::T,
            DiscreteGate::S => DiscreteGate::Sdg,
            DiscreteGate::Sdg => DiscreteGate::S,
            DiscreteGate::X => DiscreteGate::X,
            DiscreteGate::Y => DiscreteGate::Y,
            DiscreteGate::Z => DiscreteGate::Z,
        }
    }

    /// The U(2) matrix of the gate.
    pub fn u2(self) -> Matrix2<Complex64> {
        let zero = Complex64::new(0., 0.);
        let one = Complex64::new(1., 0.);
        let i = Complex64::new(0., 1.);
        match self {
            DiscreteGate::H => {
                let s = Complex64::new(FRAC_1_SQRT_2, 0.);
                Matrix2::new(s, s, s, -s)
            }
            DiscreteGate::T => Matrix2::new(one, zero, zero, Complex64::new(0., FRAC_PI_4).exp()),
            DiscreteGate::Tdg => {
                Matrix2::new(one, zero, zero, Complex64::new(0., -FRAC_PI_4).exp())
            }
            DiscreteGate::S => Matrix2::new(one, zero, zero, i),
            DiscreteGate::Sdg => Matrix2::new(one, zero, zero, -i),
            DiscreteGate::X => Matrix2::new(zero, one, one, zero),
            DiscreteGate::Y => Matrix2::new(zero, -i, i, zero),
            DiscreteGate::Z => Matrix2::new(one, zero, zero, -one),
        }
    }

    /// The SO(3) representation of the gate and the global phase taking its U(2) matrix to
    /// SU(2).
    pub fn so3(self) -> (Matrix3<f64>, f64) {
        math::u2_to_so3(&self.u2())
    }
}
