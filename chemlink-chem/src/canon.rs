//! Canonical atom ranking.
//!
//! Ranks atoms so that any two input orderings of the same graph receive the
//! same rank for corresponding atoms. The algorithm:
//!
//! 1. Rank atoms by caller-supplied invariants.
//! 2. Refine iteratively: an atom's new key is its current rank followed by
//!    the sorted ranks of its neighbors. Refinement never reorders existing
//!    classes, it only splits them, and stops when no class splits.
//! 3. The refined classes are the symmetry classes. While ties remain, the
//!    lowest tied class is split by individualizing each of its members in
//!    turn and refining again, which builds a search tree whose leaves are
//!    complete rankings. The leaf with the smallest score wins.
//!
//! Terminal atoms that hang off the same neighbor with the same invariants
//! are interchangeable, so only one of them is individualized per node.
//!
//! # Example
//!
//! ```
//! use chemlink_chem::{canonical_ranking, parse_smiles};
//!
//! let mol1 = parse_smiles("OCC").unwrap();
//! let mol2 = parse_smiles("CCO").unwrap();
//! let inv = |m: &chemlink_chem::Molecule| -> Vec<u64> {
//!     m.atoms.iter().map(|a| a.atomic_number as u64).collect()
//! };
//! let r1 = canonical_ranking(&mol1, &inv(&mol1));
//! let r2 = canonical_ranking(&mol2, &inv(&mol2));
//! // the oxygen gets the same rank either way
//! assert_eq!(r1.ranks[0], r2.ranks[2]);
//! ```

use crate::molecule::Molecule;

/// Result of canonical ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRanking {
    /// Distinct rank per atom, `0..atom_count`.
    pub ranks: Vec<usize>,
    /// Symmetry class per atom before tie breaking. Atoms sharing a class are
    /// indistinguishable by graph refinement.
    pub classes: Vec<usize>,
}

impl CanonicalRanking {
    /// Atom indices ordered by canonical rank.
    pub fn order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.ranks.len()).collect();
        order.sort_by_key(|&i| self.ranks[i]);
        order
    }
}

/// Compute canonical ranks from per-atom invariants.
///
/// `invariants[i]` must only depend on atom `i`'s own properties (element,
/// degree, charge, ...) and never on its index. Among all rankings the
/// search reaches, the one with the smallest sorted edge list wins, so the
/// result does not depend on input atom order.
pub fn canonical_ranking(mol: &Molecule, invariants: &[u64]) -> CanonicalRanking {
    canonical_ranking_by(mol, invariants, |ranks| edge_signature(mol, ranks))
}

/// Like [`canonical_ranking`], but leaves of the search are compared by a
/// caller-supplied `score` and the smallest wins.
///
/// The score must be a complete description of the numbered structure
/// (two rankings with equal scores must be interchangeable), otherwise the
/// result can depend on input order. Use this when data outside the graph,
/// such as stereo parities, depends on which symmetric atom ranks lower.
pub fn canonical_ranking_by<K, F>(mol: &Molecule, invariants: &[u64], mut score: F) -> CanonicalRanking
where
    K: Ord,
    F: FnMut(&[usize]) -> K,
{
    debug_assert_eq!(invariants.len(), mol.atom_count());
    let classes = symmetry_classes(mol, invariants);

    let mut best: Option<(K, Vec<usize>)> = None;
    search(mol, classes.clone(), &mut score, &mut best);
    let ranks = best.map_or_else(|| classes.clone(), |(_, ranks)| ranks);

    CanonicalRanking { ranks, classes }
}

/// Symmetry classes from invariants and refinement alone, without tie breaking.
pub fn symmetry_classes(mol: &Molecule, invariants: &[u64]) -> Vec<usize> {
    refine(mol, dense_ranks(invariants))
}

/// Depth-first walk over individualization choices, keeping the best leaf.
fn search<K, F>(mol: &Molecule, ranks: Vec<usize>, score: &mut F, best: &mut Option<(K, Vec<usize>)>)
where
    K: Ord,
    F: FnMut(&[usize]) -> K,
{
    let Some(tied) = lowest_tied_rank(&ranks) else {
        let key = score(&ranks);
        if best.as_ref().map_or(true, |(best_key, _)| key < *best_key) {
            *best = Some((key, ranks));
        }
        return;
    };
    for candidate in branch_candidates(mol, &ranks, tied) {
        search(mol, individualize(mol, &ranks, tied, candidate), score, best);
    }
}

/// Members of the tied class worth individualizing.
///
/// Terminal atoms on the same neighbor are swapped by an automorphism, so
/// only the first of each such group is kept.
fn branch_candidates(mol: &Molecule, ranks: &[usize], tied: usize) -> Vec<usize> {
    let mut seen_parents: Vec<usize> = Vec::new();
    let mut candidates = Vec::new();
    for i in (0..ranks.len()).filter(|&i| ranks[i] == tied) {
        if let &[(parent, _)] = mol.adjacency[i].as_slice() {
            if seen_parents.contains(&parent) {
                continue;
            }
            seen_parents.push(parent);
        }
        candidates.push(i);
    }
    candidates
}

/// Bonds as `(lower rank, higher rank)` pairs, sorted.
fn edge_signature(mol: &Molecule, ranks: &[usize]) -> Vec<(usize, usize)> {
    let mut edges: Vec<(usize, usize)> = mol
        .bonds
        .iter()
        .map(|b| {
            let (x, y) = (ranks[b.atom1], ranks[b.atom2]);
            (x.min(y), x.max(y))
        })
        .collect();
    edges.sort_unstable();
    edges
}

/// Give `chosen` a rank of its own just below the rest of its class, then refine.
fn individualize(mol: &Molecule, ranks: &[usize], tied: usize, chosen: usize) -> Vec<usize> {
    let split: Vec<usize> = ranks
        .iter()
        .enumerate()
        .map(|(i, &r)| 2 * r + usize::from(r == tied && i != chosen))
        .collect();
    refine(mol, dense_ranks(&split))
}

/// Split classes by neighbor ranks until stable.
fn refine(mol: &Molecule, mut ranks: Vec<usize>) -> Vec<usize> {
    let n = mol.atom_count();
    let mut distinct = class_count(&ranks);
    loop {
        let keys: Vec<(usize, Vec<usize>)> = (0..n)
            .map(|i| {
                let mut neighbor_ranks: Vec<usize> =
                    mol.adjacency[i].iter().map(|&(nb, _)| ranks[nb]).collect();
                neighbor_ranks.sort_unstable();
                (ranks[i], neighbor_ranks)
            })
            .collect();
        ranks = dense_ranks(&keys);
        let new_distinct = class_count(&ranks);
        if new_distinct == distinct {
            return ranks;
        }
        distinct = new_distinct;
    }
}

/// Dense 0-based ranks: equal keys share a rank, ranks follow key order.
fn dense_ranks<K: Ord>(keys: &[K]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));

    let mut ranks = vec![0usize; keys.len()];
    let mut rank = 0usize;
    for w in 0..order.len() {
        if w > 0 && keys[order[w]] != keys[order[w - 1]] {
            rank += 1;
        }
        ranks[order[w]] = rank;
    }
    ranks
}

/// Number of classes in a dense ranking.
fn class_count(ranks: &[usize]) -> usize {
    ranks.iter().max().map_or(0, |&m| m + 1)
}

fn lowest_tied_rank(ranks: &[usize]) -> Option<usize> {
    let mut counts = vec![0usize; class_count(ranks)];
    for &r in ranks {
        counts[r] += 1;
    }
    counts.iter().position(|&c| c > 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn element_invariants(mol: &Molecule) -> Vec<u64> {
        (0..mol.atom_count())
            .map(|i| (mol.atoms[i].atomic_number as u64) << 8 | mol.degree(i) as u64)
            .collect()
    }

    fn ranking(smiles: &str) -> CanonicalRanking {
        let mol = parse_smiles(smiles).unwrap();
        canonical_ranking(&mol, &element_invariants(&mol))
    }

    #[test]
    fn empty_molecule() {
        let mol = Molecule::new("empty".into(), vec![], vec![]);
        let r = canonical_ranking(&mol, &[]);
        assert!(r.ranks.is_empty());
    }

    #[test]
    fn ranks_are_a_permutation() {
        let r = ranking("CC(=O)Oc1ccccc1C(=O)O");
        let mut sorted = r.ranks.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..r.ranks.len()).collect::<Vec<_>>());
    }

    #[test]
    fn ethanol_independent_of_order() {
        let a = ranking("CCO");
        let b = ranking("OCC");
        // methyl, methylene, oxygen
        assert_eq!(a.ranks, vec![b.ranks[2], b.ranks[1], b.ranks[0]]);
    }

    #[test]
    fn symmetric_atoms_share_a_class() {
        // isobutane: three methyls are equivalent
        let r = ranking("CC(C)C");
        assert_eq!(r.classes[0], r.classes[2]);
        assert_eq!(r.classes[0], r.classes[3]);
        assert_ne!(r.classes[0], r.classes[1]);
    }

    #[test]
    fn benzene_ring_is_one_class() {
        let r = ranking("c1ccccc1");
        assert!(r.classes.iter().all(|&c| c == r.classes[0]));
        let mut sorted = r.ranks.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn refinement_separates_chain_positions() {
        // butan-1-ol: every heavy atom is distinct
        let r = ranking("CCCCO");
        let mut classes = r.classes.clone();
        classes.dedup();
        assert_eq!(classes.len(), 5);
    }

    #[test]
    fn scored_tie_breaking_picks_minimum() {
        let mol = parse_smiles("OCCO").unwrap();
        let inv = element_invariants(&mol);
        // either oxygen can take the lower rank; the score decides
        let r = canonical_ranking_by(&mol, &inv, |ranks| ranks[3]);
        assert!(r.ranks[3] < r.ranks[0]);
        let r = canonical_ranking_by(&mol, &inv, |ranks| ranks[0]);
        assert!(r.ranks[0] < r.ranks[3]);
        assert_eq!(r.classes[0], r.classes[3]);
    }

    #[test]
    fn cage_written_two_ways_gets_one_numbering() {
        let a = parse_smiles("C12C3C4C3C2C5C4C15").unwrap();
        let b = parse_smiles("C12C3C2C4C5C3C5C14").unwrap();
        let ra = canonical_ranking(&a, &element_invariants(&a));
        let rb = canonical_ranking(&b, &element_invariants(&b));
        assert_eq!(edge_signature(&a, &ra.ranks), edge_signature(&b, &rb.ranks));
    }

    #[test]
    fn ring_numbering_ignores_start_atom() {
        let a = parse_smiles("C1CCC(O)CC1").unwrap();
        let b = parse_smiles("OC1CCCCC1").unwrap();
        let ra = canonical_ranking(&a, &element_invariants(&a));
        let rb = canonical_ranking(&b, &element_invariants(&b));
        assert_eq!(edge_signature(&a, &ra.ranks), edge_signature(&b, &rb.ranks));
    }

    #[test]
    fn terminal_twins_are_searched_once() {
        // three fluorines on one carbon form a single branch
        let mol = parse_smiles("FC(F)(F)C").unwrap();
        let ranks = refine(&mol, dense_ranks(&element_invariants(&mol)));
        let tied = lowest_tied_rank(&ranks).unwrap();
        assert_eq!(branch_candidates(&mol, &ranks, tied), vec![0]);
    }

    #[test]
    fn order_lists_atoms_by_rank() {
        let r = ranking("OCC");
        let order = r.order();
        for w in order.windows(2) {
            assert!(r.ranks[w[0]] < r.ranks[w[1]]);
        }
    }
}
