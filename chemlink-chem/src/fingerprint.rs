//! Morgan fingerprints and Tanimoto similarity.

use chemlink_core::{ChemlinkError, Result};

use crate::graph::ring_atom_mask;
use crate::molecule::Molecule;

/// A fixed-size bit vector fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    bits: Vec<u64>,
    nbits: usize,
}

impl Fingerprint {
    /// Create an empty fingerprint of `nbits` bits (storage rounded up to 64).
    pub fn new(nbits: usize) -> Self {
        Fingerprint {
            bits: vec![0u64; nbits.div_ceil(64)],
            nbits,
        }
    }

    /// Set a bit; positions wrap around `nbits`.
    pub fn set_bit(&mut self, pos: usize) {
        let pos = pos % self.nbits;
        self.bits[pos / 64] |= 1u64 << (pos % 64);
    }

    pub fn get_bit(&self, pos: usize) -> bool {
        let pos = pos % self.nbits;
        (self.bits[pos / 64] >> (pos % 64)) & 1 == 1
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    pub fn nbits(&self) -> usize {
        self.nbits
    }

    /// Positions of all set bits, ascending.
    pub fn on_bits(&self) -> Vec<usize> {
        (0..self.nbits).filter(|&i| self.get_bit(i)).collect()
    }
}

/// Compute a Morgan (circular) fingerprint.
///
/// `radius` controls the neighborhood size (2 covers bonds up to two steps
/// away). Atom identifiers start from element, degree, hydrogen count,
/// charge, ring membership and aromaticity, and each iteration folds in the
/// sorted identifiers of the neighbors together with the connecting bond
/// order. Every identifier seen at every radius sets one bit.
///
/// Returns an error when `nbits` is zero.
pub fn morgan_fingerprint(mol: &Molecule, radius: usize, nbits: usize) -> Result<Fingerprint> {
    if nbits == 0 {
        return Err(ChemlinkError::InvalidInput("fingerprint length must be positive".into()));
    }
    let n = mol.atom_count();
    let mut fp = Fingerprint::new(nbits);
    if n == 0 {
        return Ok(fp);
    }

    let in_ring = ring_atom_mask(mol);
    let mut identifiers: Vec<u64> = mol
        .atoms
        .iter()
        .enumerate()
        .map(|(i, atom)| {
            [
                atom.atomic_number as u64,
                mol.degree(i) as u64,
                atom.implicit_hydrogens as u64,
                atom.formal_charge as u64,
                in_ring[i] as u64,
                atom.is_aromatic as u64,
            ]
            .into_iter()
            .fold(FNV_OFFSET, fnv1a_update)
        })
        .collect();

    for &id in &identifiers {
        fp.set_bit(fold_hash(id, nbits));
    }

    for _ in 0..radius {
        let next: Vec<u64> = (0..n)
            .map(|i| {
                let mut neighbor_ids: Vec<(u64, u8)> = mol.adjacency[i]
                    .iter()
                    .map(|&(neighbor, bi)| (identifiers[neighbor], mol.bonds[bi].order as u8))
                    .collect();
                neighbor_ids.sort_unstable();
                neighbor_ids.into_iter().fold(
                    fnv1a_update(FNV_OFFSET, identifiers[i]),
                    |h, (nid, order)| fnv1a_update(fnv1a_update(h, nid), order as u64),
                )
            })
            .collect();
        for &id in &next {
            fp.set_bit(fold_hash(id, nbits));
        }
        identifiers = next;
    }

    Ok(fp)
}

/// Tanimoto coefficient: shared bits over bits set in either.
///
/// Two empty fingerprints count as identical. Fingerprints of different
/// lengths are not comparable and produce an error.
pub fn tanimoto_similarity(fp1: &Fingerprint, fp2: &Fingerprint) -> Result<f64> {
    if fp1.nbits != fp2.nbits {
        return Err(ChemlinkError::InvalidInput(format!(
            "fingerprint lengths differ: {} vs {}",
            fp1.nbits, fp2.nbits
        )));
    }

    let (and_count, or_count) = fp1
        .bits
        .iter()
        .zip(&fp2.bits)
        .fold((0u32, 0u32), |(and, or), (w1, w2)| {
            (and + (w1 & w2).count_ones(), or + (w1 | w2).count_ones())
        });

    if or_count == 0 {
        return Ok(1.0);
    }
    Ok(and_count as f64 / or_count as f64)
}

/// Tanimoto similarity of one query against many targets.
pub fn tanimoto_bulk(query: &Fingerprint, targets: &[Fingerprint]) -> Result<Vec<f64>> {
    targets.iter().map(|t| tanimoto_similarity(query, t)).collect()
}

// FNV-1a over little-endian words keeps identifiers stable across platforms.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a_update(hash: u64, value: u64) -> u64 {
    value
        .to_le_bytes()
        .iter()
        .fold(hash, |h, &b| (h ^ b as u64).wrapping_mul(FNV_PRIME))
}

fn fold_hash(hash: u64, nbits: usize) -> usize {
    (hash % nbits as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn fp(smiles: &str) -> Fingerprint {
        morgan_fingerprint(&parse_smiles(smiles).unwrap(), 2, 1024).unwrap()
    }

    #[test]
    fn bit_operations() {
        let mut fp = Fingerprint::new(128);
        assert!(!fp.get_bit(42));
        fp.set_bit(42);
        assert!(fp.get_bit(42));
        assert_eq!(fp.count_ones(), 1);
        fp.set_bit(100);
        assert_eq!(fp.on_bits(), vec![42, 100]);
    }

    #[test]
    fn deterministic_fingerprint() {
        let a = fp("CCO");
        let b = fp("CCO");
        assert_eq!(a, b);
        assert_eq!(a.nbits(), 1024);
    }

    #[test]
    fn atom_order_does_not_matter() {
        assert_eq!(fp("CCO"), fp("OCC"));
        assert_eq!(fp("CC(=O)Oc1ccccc1C(=O)O"), fp("OC(=O)c1ccccc1OC(C)=O"));
    }

    #[test]
    fn tanimoto_identical_is_one() {
        let a = fp("c1ccccc1");
        assert!((tanimoto_similarity(&a, &a).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tanimoto_related_molecules_in_range() {
        let sim = tanimoto_similarity(&fp("CCO"), &fp("CCCO")).unwrap();
        assert!(sim > 0.0 && sim < 1.0, "tanimoto = {sim}");
    }

    #[test]
    fn tanimoto_is_symmetric() {
        let a = fp("CC(=O)Oc1ccccc1C(=O)O");
        let b = fp("OC(=O)c1ccccc1O");
        assert_eq!(tanimoto_similarity(&a, &b).unwrap(), tanimoto_similarity(&b, &a).unwrap());
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let mol = parse_smiles("CCO").unwrap();
        let a = morgan_fingerprint(&mol, 2, 1024).unwrap();
        let b = morgan_fingerprint(&mol, 2, 2048).unwrap();
        assert!(tanimoto_similarity(&a, &b).is_err());
        assert!(morgan_fingerprint(&mol, 2, 0).is_err());
    }

    #[test]
    fn bulk_matches_pairwise() {
        let q = fp("CCO");
        let targets = vec![fp("CCO"), fp("CCN"), fp("c1ccccc1")];
        let sims = tanimoto_bulk(&q, &targets).unwrap();
        assert_eq!(sims.len(), 3);
        assert!((sims[0] - 1.0).abs() < 1e-12);
        assert!(sims[1] > sims[2]);
    }
}
