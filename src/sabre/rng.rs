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

use rand::prelude::*;
use rand_pcg::Pcg64Mcg;

/// The single source of randomness injected into the router.
///
/// The router draws from exactly one primitive -- a uniform choice among the (sorted) tied best
/// swaps -- so any implementation of this trait fully determines the routing output for a given
/// input.  Keeping the primitive this narrow makes tie-breaking bit-reproducible across
/// implementations that share a generator.
pub trait ChoiceRng {
    /// Choose an index in `[0, len)` uniformly at random.  `len` is never zero.
    fn choice(&mut self, len: usize) -> usize;
}

/// The default [ChoiceRng], backed by the PCG64-MCG generator.  It should be initialized once and
/// passed to the router to avoid recreating a generator on the inner loop.
#[derive(Clone, Debug)]
pub struct SabreRng {
    rng: Pcg64Mcg,
}

impl SabreRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        SabreRng {
            rng: Pcg64Mcg::seed_from_u64(seed),
        }
    }
}

impl ChoiceRng for SabreRng {
    fn choice(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}
