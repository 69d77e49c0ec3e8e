//! Graph traversal helpers: connected components and ring membership.

use std::collections::VecDeque;

use crate::molecule::Molecule;

/// Connected components, each listed in ascending atom index order.
///
/// Components are returned in order of their lowest atom index.
pub fn connected_components(mol: &Molecule) -> Vec<Vec<usize>> {
    let n = mol.atom_count();
    let mut visited = vec![false; n];
    let mut components = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        let mut component = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);
        visited[start] = true;
        while let Some(curr) = queue.pop_front() {
            component.push(curr);
            for &(neighbor, _) in &mol.adjacency[curr] {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }

    components
}

/// Flag atoms that belong to at least one ring.
///
/// An atom is a ring atom when at least one of its bonds is not a bridge.
pub fn ring_atom_mask(mol: &Molecule) -> Vec<bool> {
    let mut mask = vec![false; mol.atom_count()];
    for (bond, in_ring) in mol.bonds.iter().zip(ring_bond_mask(mol)) {
        if in_ring {
            mask[bond.atom1] = true;
            mask[bond.atom2] = true;
        }
    }
    mask
}

/// Flag bonds that lie on a cycle.
pub fn ring_bond_mask(mol: &Molecule) -> Vec<bool> {
    let n = mol.atom_count();
    let mut state = BridgeSearch {
        discovery: vec![usize::MAX; n],
        low: vec![0; n],
        timer: 0,
        ring_bond: vec![false; mol.bond_count()],
    };
    for start in 0..n {
        if state.discovery[start] == usize::MAX {
            state.visit(mol, start, None);
        }
    }
    state.ring_bond
}

/// Every simple cycle of at most `max_len` atoms that only passes through
/// atoms with `allowed[i]` set.
///
/// Each cycle is listed once, in walking order, starting at its lowest atom
/// index. The set does not depend on atom order, only the listing does.
pub fn simple_rings(mol: &Molecule, max_len: usize, allowed: &[bool]) -> Vec<Vec<usize>> {
    let mut rings = Vec::new();
    for start in (0..mol.atom_count()).filter(|&i| allowed[i]) {
        let mut path = vec![start];
        extend_ring(mol, max_len, allowed, &mut path, &mut rings);
    }
    rings
}

fn extend_ring(mol: &Molecule, max_len: usize, allowed: &[bool], path: &mut Vec<usize>, rings: &mut Vec<Vec<usize>>) {
    let (start, last) = (path[0], path[path.len() - 1]);
    for &(next, _) in &mol.adjacency[last] {
        if next == start && path.len() >= 3 {
            // met once per direction
            if path[1] < last {
                rings.push(path.clone());
            }
        } else if next > start && allowed[next] && path.len() < max_len && !path.contains(&next) {
            path.push(next);
            extend_ring(mol, max_len, allowed, path, rings);
            path.pop();
        }
    }
}

/// Depth-first low-link search marking every bond that lies on a cycle.
struct BridgeSearch {
    discovery: Vec<usize>,
    low: Vec<usize>,
    timer: usize,
    ring_bond: Vec<bool>,
}

impl BridgeSearch {
    fn visit(&mut self, mol: &Molecule, atom: usize, via_bond: Option<usize>) {
        self.discovery[atom] = self.timer;
        self.low[atom] = self.timer;
        self.timer += 1;

        for &(neighbor, bi) in &mol.adjacency[atom] {
            if Some(bi) == via_bond {
                continue;
            }
            if self.discovery[neighbor] == usize::MAX {
                self.visit(mol, neighbor, Some(bi));
                self.low[atom] = self.low[atom].min(self.low[neighbor]);
                if self.low[neighbor] <= self.discovery[atom] {
                    self.ring_bond[bi] = true;
                }
            } else {
                self.low[atom] = self.low[atom].min(self.discovery[neighbor]);
                self.ring_bond[bi] = true;
            }
        }
    }
}

/// Number of independent rings (cyclomatic number).
pub fn ring_count(mol: &Molecule) -> usize {
    let components = connected_components(mol).len();
    (mol.bond_count() + components).saturating_sub(mol.atom_count())
}
