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

use std::fmt;

use crate::errors::RoutingError;

/// A newtype for the different categories of qubits used within layouts.  This is to enforce
/// significantly more type safety when dealing with mixtures of physical and virtual qubits, as we
/// typically are when dealing with layouts.  `NLayout` only works in terms of the correct newtype,
/// meaning that it's not possible to accidentally pass the wrong type of qubit to a lookup.
macro_rules! qubit_newtype {
    ($id: ident) => {
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $id(pub u32);

        impl $id {
            #[inline]
            pub fn new(val: u32) -> Self {
                Self(val)
            }

            #[inline]
            pub fn index(&self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $id {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

qubit_newtype!(PhysicalQubit);
impl PhysicalQubit {
    /// Get the virtual qubit that currently corresponds to this index of physical qubit in the
    /// given layout.
    #[inline]
    pub fn to_virt(self, layout: &NLayout) -> VirtualQubit {
        layout.phys_to_virt[self.index()]
    }
}

qubit_newtype!(VirtualQubit);
impl VirtualQubit {
    /// Get the physical qubit that currently corresponds to this index of virtual qubit in the
    /// given layout.
    #[inline]
    pub fn to_phys(self, layout: &NLayout) -> PhysicalQubit {
        layout.virt_to_phys[self.index()]
    }
}

/// A bidirectional map between virtual qubits of the circuit being routed and physical qubits of
/// the device.
///
/// The map is always total over the device: every physical qubit is assigned a distinct virtual
/// index, with circuit qubits first and synthetic padding indices covering any spare hardware
/// qubits.  Keeping the map total means a swap with an unoccupied physical qubit is expressible
/// exactly like any other swap.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NLayout {
    virt_to_phys: Vec<PhysicalQubit>,
    phys_to_virt: Vec<VirtualQubit>,
}

impl NLayout {
    /// The identity layout on `num_qubits` qubits.
    pub fn generate_trivial_layout(num_qubits: u32) -> Self {
        NLayout {
            virt_to_phys: (0..num_qubits).map(PhysicalQubit).collect(),
            phys_to_virt: (0..num_qubits).map(VirtualQubit).collect(),
        }
    }

    /// Build a layout from an explicit virtual-to-physical assignment of the circuit's qubits.
    ///
    /// `virt_to_phys` may cover fewer qubits than the device has; the remaining physical qubits
    /// are padded with fresh virtual indices so the resulting map is a bijection over
    /// `[0, num_physical)`.
    pub fn from_virtual_to_physical(
        virt_to_phys: Vec<PhysicalQubit>,
        num_physical: usize,
    ) -> Result<Self, RoutingError> {
        if virt_to_phys.len() > num_physical {
            return Err(RoutingError::ShapeMismatch {
                what: "virtual-to-physical map",
                actual: virt_to_phys.len(),
                expected: num_physical,
            });
        }
        let mut phys_to_virt = vec![VirtualQubit(u32::MAX); num_physical];
        for (virt, phys) in virt_to_phys.iter().enumerate() {
            if phys.index() >= num_physical {
                return Err(RoutingError::QubitOutOfRange {
                    index: phys.0,
                    num_qubits: num_physical,
                });
            }
            if phys_to_virt[phys.index()] != VirtualQubit(u32::MAX) {
                return Err(RoutingError::LayoutInvariantViolation);
            }
            phys_to_virt[phys.index()] = VirtualQubit(virt as u32);
        }
        // Pad spare hardware qubits with synthetic virtual indices so swaps onto them stay
        // expressible.
        let mut virt_to_phys = virt_to_phys;
        let mut next_virt = virt_to_phys.len() as u32;
        for (phys, virt) in phys_to_virt.iter_mut().enumerate() {
            if *virt == VirtualQubit(u32::MAX) {
                *virt = VirtualQubit(next_virt);
                virt_to_phys.push(PhysicalQubit(phys as u32));
                next_virt += 1;
            }
        }
        Ok(NLayout {
            virt_to_phys,
            phys_to_virt,
        })
    }

    /// Swap the specified virtual qubits.
    #[inline]
    pub fn swap_virtual(&mut self, bit_a: VirtualQubit, bit_b: VirtualQubit) {
        self.virt_to_phys.swap(bit_a.index(), bit_b.index());
        self.phys_to_virt[self.virt_to_phys[bit_a.index()].index()] = bit_a;
        self.phys_to_virt[self.virt_to_phys[bit_b.index()].index()] = bit_b;
    }

    /// Swap the specified physical qubits.
    #[inline]
    pub fn swap_physical(&mut self, bit_a: PhysicalQubit, bit_b: PhysicalQubit) {
        self.phys_to_virt.swap(bit_a.index(), bit_b.index());
        self.virt_to_phys[self.phys_to_virt[bit_a.index()].index()] = bit_a;
        self.virt_to_phys[self.phys_to_virt[bit_b.index()].index()] = bit_b;
    }

    /// Number of qubits tracked by the layout.  The map is total, so the virtual and physical
    /// sides always have the same length.
    pub fn num_qubits(&self) -> usize {
        self.virt_to_phys.len()
    }

    /// Iterator of `(VirtualQubit, PhysicalQubit)` pairs, in order of the `VirtualQubit` indices.
    pub fn iter_virtual(
        &'_ self,
    ) -> impl ExactSizeIterator<Item = (VirtualQubit, PhysicalQubit)> + '_ {
        self.virt_to_phys
            .iter()
            .enumerate()
            .map(|(v, p)| (VirtualQubit::new(v as u32), *p))
    }

    /// Iterator of `(PhysicalQubit, VirtualQubit)` pairs, in order of the `PhysicalQubit` indices.
    pub fn iter_physical(
        &'_ self,
    ) -> impl ExactSizeIterator<Item = (PhysicalQubit, VirtualQubit)> + '_ {
        self.phys_to_virt
            .iter()
            .enumerate()
            .map(|(p, v)| (PhysicalQubit::new(p as u32), *v))
    }

    /// Verify the two directions of the map agree.  Used to reject malformed input layouts and to
    /// diagnose internal corruption.
    pub fn is_consistent(&self) -> bool {
        if self.virt_to_phys.len() != self.phys_to_virt.len() {
            return false;
        }
        self.iter_virtual().all(|(virt, phys)| {
            self.phys_to_virt
                .get(phys.index())
                .is_some_and(|mapped| *mapped == virt)
        }) && self.iter_physical().all(|(phys, virt)| {
            self.virt_to_phys
                .get(virt.index())
                .is_some_and(|mapped| *mapped == phys)
        })
    }
}
