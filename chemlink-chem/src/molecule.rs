//! Molecular graph representation.

/// Tetrahedral chirality at a stereocenter, as written in the notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Chirality {
    /// No chirality specified.
    #[default]
    None,
    /// Counterclockwise (`@` in SMILES).
    CounterClockwise,
    /// Clockwise (`@@` in SMILES).
    Clockwise,
}

/// Cis-trans direction marker carried by a single bond.
///
/// The direction is relative to the bond as written, from `atom1` to `atom2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondStereo {
    /// No stereo marker.
    #[default]
    None,
    /// Up bond (`/` in SMILES).
    Up,
    /// Down bond (`\` in SMILES).
    Down,
}

impl BondStereo {
    /// `+1` for up, `-1` for down, `0` when unmarked.
    pub fn sign(self) -> i8 {
        match self {
            BondStereo::None => 0,
            BondStereo::Up => 1,
            BondStereo::Down => -1,
        }
    }
}

/// Bond order classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Numeric bond order for valence calculations.
    pub fn as_f64(self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }
}

/// An atom in a molecular graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MolAtom {
    pub atomic_number: u8,
    pub formal_charge: i8,
    pub isotope: Option<u16>,
    pub is_aromatic: bool,
    pub implicit_hydrogens: u8,
    pub chirality: Chirality,
}

impl MolAtom {
    /// A neutral, non-aromatic atom with no hydrogens attached.
    pub fn new(atomic_number: u8) -> Self {
        MolAtom {
            atomic_number,
            formal_charge: 0,
            isotope: None,
            is_aromatic: false,
            implicit_hydrogens: 0,
            chirality: Chirality::None,
        }
    }
}

/// A bond between two atoms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
    pub is_aromatic: bool,
    pub stereo: BondStereo,
}

impl Bond {
    /// A plain bond with no stereo marker.
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Bond {
            atom1,
            atom2,
            order,
            is_aromatic: order == BondOrder::Aromatic,
            stereo: BondStereo::None,
        }
    }

    /// The atom at the other end of this bond.
    pub fn other(&self, atom_idx: usize) -> usize {
        if self.atom1 == atom_idx {
            self.atom2
        } else {
            self.atom1
        }
    }
}

/// One entry of an atom's neighbor list in the order the notation wrote it.
///
/// Tetrahedral chirality is defined relative to this order, so it is kept
/// separately from the adjacency list, which follows bond creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeighborSlot {
    Atom(usize),
    /// The hydrogen written inside a bracket atom, e.g. the `H` in `[C@H]`.
    ImplicitH,
}

/// A molecular graph with atoms, bonds, and adjacency information.
#[derive(Debug, Clone)]
pub struct Molecule {
    pub name: String,
    pub atoms: Vec<MolAtom>,
    pub bonds: Vec<Bond>,
    /// adjacency[atom_idx] = Vec<(neighbor_atom_idx, bond_idx)>
    pub adjacency: Vec<Vec<(usize, usize)>>,
    /// Written neighbor order per atom, used for tetrahedral parity.
    pub neighbor_order: Vec<Vec<NeighborSlot>>,
}

impl Molecule {
    /// Create a new molecule, building the adjacency list from atoms and bonds.
    ///
    /// The written neighbor order defaults to adjacency order.
    pub fn new(name: String, atoms: Vec<MolAtom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bi, bond) in bonds.iter().enumerate() {
            adjacency[bond.atom1].push((bond.atom2, bi));
            adjacency[bond.atom2].push((bond.atom1, bi));
        }
        let neighbor_order = adjacency
            .iter()
            .map(|adj: &Vec<(usize, usize)>| adj.iter().map(|&(n, _)| NeighborSlot::Atom(n)).collect())
            .collect();
        Molecule { name, atoms, bonds, adjacency, neighbor_order }
    }

    /// Replace the written neighbor order (as recorded by a parser).
    pub fn with_neighbor_order(mut self, order: Vec<Vec<NeighborSlot>>) -> Self {
        debug_assert_eq!(order.len(), self.atoms.len());
        self.neighbor_order = order;
        self
    }

    /// Number of atoms (graph nodes; implicit hydrogens are not nodes).
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Number of bonds.
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Number of non-hydrogen atoms.
    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| a.atomic_number != 1).count()
    }

    /// Neighbor atom indices for a given atom.
    pub fn neighbors(&self, atom_idx: usize) -> Vec<usize> {
        self.adjacency[atom_idx].iter().map(|&(n, _)| n).collect()
    }

    /// Graph degree of an atom (number of explicit bonds).
    pub fn degree(&self, atom_idx: usize) -> usize {
        self.adjacency[atom_idx].len()
    }

    /// Total hydrogen count (implicit + explicit H atoms).
    pub fn total_hydrogen_count(&self) -> usize {
        let explicit: usize = self.atoms.iter().filter(|a| a.atomic_number == 1).count();
        let implicit: usize = self.atoms.iter().map(|a| a.implicit_hydrogens as usize).sum();
        explicit + implicit
    }

    /// Copy of the molecule with plain explicit hydrogen atoms folded into
    /// the hydrogen count of the heavy atom they are attached to.
    ///
    /// Isotopic or charged hydrogens, hydrogens bonded to another hydrogen and
    /// unattached hydrogens stay as graph atoms. A folded hydrogen that
    /// appeared in a stereocenter's written neighbor list becomes
    /// [`NeighborSlot::ImplicitH`] at the same position.
    pub fn without_explicit_hydrogens(&self) -> Molecule {
        let foldable: Vec<bool> = (0..self.atom_count())
            .map(|i| {
                let atom = &self.atoms[i];
                atom.atomic_number == 1
                    && atom.isotope.is_none()
                    && atom.formal_charge == 0
                    && self.degree(i) == 1
                    && self.atoms[self.adjacency[i][0].0].atomic_number != 1
            })
            .collect();
        if !foldable.iter().any(|&f| f) {
            return self.clone();
        }

        let mut remap = vec![usize::MAX; self.atom_count()];
        let mut atoms = Vec::with_capacity(self.atom_count());
        for (i, atom) in self.atoms.iter().enumerate() {
            if !foldable[i] {
                remap[i] = atoms.len();
                atoms.push(atom.clone());
            }
        }
        for i in (0..self.atom_count()).filter(|&i| foldable[i]) {
            let heavy = remap[self.adjacency[i][0].0];
            atoms[heavy].implicit_hydrogens = atoms[heavy].implicit_hydrogens.saturating_add(1);
        }

        let bonds: Vec<Bond> = self
            .bonds
            .iter()
            .filter(|b| !foldable[b.atom1] && !foldable[b.atom2])
            .map(|b| Bond { atom1: remap[b.atom1], atom2: remap[b.atom2], ..b.clone() })
            .collect();

        let neighbor_order = (0..self.atom_count())
            .filter(|&i| !foldable[i])
            .map(|i| {
                self.neighbor_order[i]
                    .iter()
                    .map(|slot| match *slot {
                        NeighborSlot::Atom(n) if foldable[n] => NeighborSlot::ImplicitH,
                        NeighborSlot::Atom(n) => NeighborSlot::Atom(remap[n]),
                        NeighborSlot::ImplicitH => NeighborSlot::ImplicitH,
                    })
                    .collect()
            })
            .collect();

        Molecule::new(self.name.clone(), atoms, bonds).with_neighbor_order(neighbor_order)
    }

    /// Extract the sub-molecule induced by `atom_indices` (kept in the given order).
    pub fn induced_subgraph(&self, atom_indices: &[usize]) -> Molecule {
        let mut remap = vec![usize::MAX; self.atom_count()];
        for (new_idx, &old_idx) in atom_indices.iter().enumerate() {
            remap[old_idx] = new_idx;
        }
        let atoms = atom_indices.iter().map(|&i| self.atoms[i].clone()).collect();
        let bonds = self
            .bonds
            .iter()
            .filter(|b| remap[b.atom1] != usize::MAX && remap[b.atom2] != usize::MAX)
            .map(|b| Bond { atom1: remap[b.atom1], atom2: remap[b.atom2], ..b.clone() })
            .collect();
        let neighbor_order = atom_indices
            .iter()
            .map(|&i| {
                self.neighbor_order[i]
                    .iter()
                    .filter_map(|slot| match *slot {
                        NeighborSlot::Atom(n) if remap[n] != usize::MAX => {
                            Some(NeighborSlot::Atom(remap[n]))
                        }
                        NeighborSlot::Atom(_) => None,
                        NeighborSlot::ImplicitH => Some(NeighborSlot::ImplicitH),
                    })
                    .collect()
            })
            .collect();
        Molecule::new(self.name.clone(), atoms, bonds).with_neighbor_order(neighbor_order)
    }
}
