//! Aromaticity perception.
//!
//! Rings are judged by Hückel's rule on their pi electron count, whatever
//! the SMILES wrote, so `c1ccccc1` and `C1=CC=CC=C1` come out with the same
//! aromatic atoms and bonds. Hydrogen counts are left as parsed.

use crate::graph::{ring_atom_mask, simple_rings};
use crate::molecule::{BondOrder, Molecule};

/// Longest cycle considered, enough for the envelope of two fused
/// six-membered rings.
pub const MAX_AROMATIC_RING: usize = 10;

/// Flag atoms that sit on at least one aromatic cycle.
pub fn find_aromatic_atoms(mol: &Molecule) -> Vec<bool> {
    let mut atoms = vec![false; mol.atom_count()];
    for ring in aromatic_rings(mol) {
        for i in ring {
            atoms[i] = true;
        }
    }
    atoms
}

/// Replace written aromaticity with perceived aromaticity.
///
/// Bonds along an aromatic cycle become [`BondOrder::Aromatic`]. Bonds
/// written aromatic that lie on no aromatic cycle fall back to single.
pub fn set_aromaticity(mol: &mut Molecule) {
    let mut atoms = vec![false; mol.atom_count()];
    let mut bonds = vec![false; mol.bond_count()];
    for ring in aromatic_rings(mol) {
        for (k, &a) in ring.iter().enumerate() {
            let b = ring[(k + 1) % ring.len()];
            atoms[a] = true;
            if let Some(&(_, bi)) = mol.adjacency[a].iter().find(|&&(nb, _)| nb == b) {
                bonds[bi] = true;
            }
        }
    }

    for (atom, flag) in mol.atoms.iter_mut().zip(atoms) {
        atom.is_aromatic = flag;
    }
    for (bond, flag) in mol.bonds.iter_mut().zip(bonds) {
        bond.is_aromatic = flag;
        if flag {
            bond.order = BondOrder::Aromatic;
        } else if bond.order == BondOrder::Aromatic {
            bond.order = BondOrder::Single;
        }
    }
}

fn aromatic_rings(mol: &Molecule) -> Vec<Vec<usize>> {
    let in_ring = ring_atom_mask(mol);
    let electrons: Vec<Option<u32>> = (0..mol.atom_count())
        .map(|i| if in_ring[i] { pi_electrons(mol, i, &in_ring) } else { None })
        .collect();
    let allowed: Vec<bool> = electrons.iter().map(Option::is_some).collect();

    simple_rings(mol, MAX_AROMATIC_RING, &allowed)
        .into_iter()
        .filter(|ring| ring.iter().filter_map(|&i| electrons[i]).sum::<u32>() % 4 == 2)
        .collect()
}

/// Pi electrons an atom gives to a ring through it, or `None` when no
/// aromatic ring can pass through it.
fn pi_electrons(mol: &Molecule, i: usize, in_ring: &[bool]) -> Option<u32> {
    let atom = &mol.atoms[i];
    let mut ring_double = false;
    let mut exocyclic_double = None;
    for &(n, bi) in &mol.adjacency[i] {
        match mol.bonds[bi].order {
            BondOrder::Double if in_ring[n] => ring_double = true,
            BondOrder::Double => exocyclic_double = Some(mol.atoms[n].atomic_number),
            BondOrder::Triple => return None,
            BondOrder::Single | BondOrder::Aromatic => {}
        }
    }
    if ring_double {
        return Some(1);
    }

    let connections = mol.degree(i) + atom.implicit_hydrogens as usize;
    let charge = atom.formal_charge;
    match atom.atomic_number {
        // carbonyl, imine or thione carbon
        6 if exocyclic_double.is_some() => exocyclic_double.filter(|&z| matches!(z, 7 | 8 | 16)).map(|_| 0),
        6 => match charge {
            -1 => Some(2),
            1 => Some(0),
            0 if atom.is_aromatic => Some(1),
            _ => None,
        },
        _ if exocyclic_double.is_some() => None,
        7 | 15 => match charge {
            0 if atom.is_aromatic && connections == 2 => Some(1),
            0 if connections == 3 => Some(2),
            1 if atom.is_aromatic => Some(1),
            _ => None,
        },
        8 | 16 | 34 => match charge {
            0 if mol.degree(i) == 2 => Some(2),
            1 if atom.is_aromatic => Some(1),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::{morgan_fingerprint, tanimoto_similarity};
    use crate::smiles::parse_smiles;

    fn aromatic_count(smiles: &str) -> usize {
        parse_smiles(smiles).unwrap().atoms.iter().filter(|a| a.is_aromatic).count()
    }

    #[test]
    fn kekule_benzene_is_aromatic() {
        let mol = parse_smiles("C1=CC=CC=C1").unwrap();
        assert!(mol.atoms.iter().all(|a| a.is_aromatic));
        assert!(mol.bonds.iter().all(|b| b.order == BondOrder::Aromatic && b.is_aromatic));
        assert!(mol.atoms.iter().all(|a| a.implicit_hydrogens == 1));
    }

    #[test]
    fn heteroaromatic_rings() {
        assert_eq!(aromatic_count("C1=CC=NC=C1"), 6);
        assert_eq!(aromatic_count("c1ccncc1"), 6);
        assert_eq!(aromatic_count("C1=CNC=C1"), 5);
        assert_eq!(aromatic_count("c1cc[nH]c1"), 5);
        assert_eq!(aromatic_count("c1ccoc1"), 5);
        assert_eq!(aromatic_count("C1=CSC=C1"), 5);
        assert_eq!(aromatic_count("O=C1C=CC=CN1"), 6);
    }

    #[test]
    fn caffeine_written_either_way() {
        let kekule = parse_smiles("CN1C=NC2=C1C(=O)N(C)C(=O)N2C").unwrap();
        let aromatic = parse_smiles("Cn1cnc2c1c(=O)n(C)c(=O)n2C").unwrap();
        assert_eq!(find_aromatic_atoms(&kekule), find_aromatic_atoms(&aromatic));
        assert_eq!(find_aromatic_atoms(&kekule).iter().filter(|&&f| f).count(), 9);
    }

    #[test]
    fn non_aromatic_rings() {
        assert_eq!(aromatic_count("C1=CCC=CC1"), 0);
        assert_eq!(aromatic_count("O=C1C=CC(=O)C=C1"), 0);
        assert_eq!(aromatic_count("C1=CC=CC=CC=C1"), 0);
        assert_eq!(aromatic_count("C1CCOC1"), 0);
        assert_eq!(aromatic_count("C=C1C=CC=C1"), 0);
    }

    #[test]
    fn link_between_rings_stays_single() {
        let mol = parse_smiles("c1ccccc1c1ccccc1").unwrap();
        let link = mol.bonds.iter().find(|b| b.atom1.min(b.atom2) == 5 && b.atom1.max(b.atom2) == 6).unwrap();
        assert_eq!(link.order, BondOrder::Single);
        assert!(!link.is_aromatic);
        assert_eq!(mol.bonds.iter().filter(|b| b.is_aromatic).count(), 12);
    }

    #[test]
    fn naphthalene_fusion_bond_is_aromatic() {
        let mol = parse_smiles("C1=CC=C2C=CC=CC2=C1").unwrap();
        assert!(mol.atoms.iter().all(|a| a.is_aromatic));
        assert!(mol.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
    }

    #[test]
    fn written_forms_share_fingerprints() {
        let pairs = [
            ("c1ccccc1", "C1=CC=CC=C1"),
            ("c1ccncc1", "C1=CC=NC=C1"),
            ("CC(=O)Oc1ccccc1C(=O)O", "CC(=O)OC1=CC=CC=C1C(=O)O"),
        ];
        for (aromatic, kekule) in pairs {
            let a = morgan_fingerprint(&parse_smiles(aromatic).unwrap(), 2, 2048).unwrap();
            let k = morgan_fingerprint(&parse_smiles(kekule).unwrap(), 2, 2048).unwrap();
            assert_eq!(tanimoto_similarity(&a, &k).unwrap(), 1.0, "{aromatic} vs {kekule}");
        }
    }
}
