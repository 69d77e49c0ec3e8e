//! Canonical identity strings and identity hashes.
//!
//! A [`CanonicalIdentity`] derived here uses the layer layout of an InChI
//! under its own prefix:
//!
//! ```text
//! ChemLink=1/<formula>/c<connections>/h<hydrogens>/q<charge>/b<double bonds>/t<centers>/s1/i<isotopes>
//! ```
//!
//! Atoms are numbered by canonical rank within Hill element order, so any
//! notation of the same molecule produces the same string. Bond orders are
//! not part of the ranking, which makes Kekulé and aromatic notations of a
//! ring coincide. There is no mobile-hydrogen layer, so the string is not a
//! standard InChI and never carries the `InChI=1S/` prefix.
//!
//! [`identity_to_hash`] implements the InChIKey encoding. Applied to a
//! standard InChI it yields the standard key; applied to an identity from
//! this module it yields a key of the same shape flagged non-standard.
//!
//! # Example
//!
//! ```
//! use chemlink_chem::{identity_to_hash, molecule_to_identity, parse_smiles, InchiOptions};
//!
//! let opts = InchiOptions::default();
//! let a = molecule_to_identity(&parse_smiles("OCC").unwrap(), &opts).unwrap();
//! let b = molecule_to_identity(&parse_smiles("CCO").unwrap(), &opts).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.as_str(), "ChemLink=1/C2H6O/c1-2-3/h3H,2H2,1H3");
//!
//! let key = identity_to_hash("InChI=1S/C2H6O/c1-2-3/h3H,2H2,1H3").unwrap();
//! assert_eq!(key.as_str(), "LFQSCWFLJHTTHZ-UHFFFAOYSA-N");
//! ```

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;

use chemlink_core::hash::sha256_digest;
use chemlink_core::{ChemlinkError, Result};

use crate::canon::{canonical_ranking_by, symmetry_classes};
use crate::element::{element_by_number, hill_key};
use crate::graph::{connected_components, ring_atom_mask};
use crate::molecule::{BondOrder, BondStereo, Chirality, Molecule, NeighborSlot};

/// Prefix of identity strings derived by [`molecule_to_identity`].
pub const IDENTITY_PREFIX: &str = "ChemLink=1/";

/// Prefix of standard InChI strings.
pub const STANDARD_INCHI_PREFIX: &str = "InChI=1S/";

/// Display prefix for hashes of identities from this crate.
pub const HASH_DISPLAY_PREFIX: &str = "ChemLinkKey=";

/// Display prefix for hashes of standard InChI strings.
pub const INCHIKEY_DISPLAY_PREFIX: &str = "InChIKey=";

/// Layers hashed into the first key block. `/p` is carried by the last letter.
const MAIN_LAYERS: &[char] = &['c', 'h', 'q'];

/// Offset of the standard/non-standard flag inside a hash.
const FLAG_OFFSET: usize = 23;

/// Canonical identity string of a molecule.
///
/// Treated as an opaque key by everything downstream of canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CanonicalIdentity(String);

impl CanonicalIdentity {
    /// Wrap an identity string produced elsewhere, e.g. read back from a
    /// table. The string is not validated.
    pub fn from_raw(identity: impl Into<String>) -> Self {
        CanonicalIdentity(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether this is a standard InChI rather than an identity from this crate.
    pub fn is_standard(&self) -> bool {
        self.0.starts_with(STANDARD_INCHI_PREFIX)
    }
}

impl fmt::Display for CanonicalIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Fixed-length hash of a [`CanonicalIdentity`], for display and lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct IdentityHash(String);

impl IdentityHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the hash was derived from a standard InChI.
    pub fn is_standard(&self) -> bool {
        self.0.as_bytes().get(FLAG_OFFSET) == Some(&b'S')
    }

    /// The hash with its display prefix, `InChIKey=` only for standard InChI.
    pub fn prefixed(&self) -> String {
        let prefix = if self.is_standard() { INCHIKEY_DISPLAY_PREFIX } else { HASH_DISPLAY_PREFIX };
        format!("{prefix}{}", self.0)
    }
}

impl fmt::Display for IdentityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which optional layers to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InchiOptions {
    /// Emit `/b`, `/t` and `/s` layers.
    pub include_stereo: bool,
    /// Emit the `/i` isotope layer.
    pub include_isotopes: bool,
}

impl Default for InchiOptions {
    fn default() -> Self {
        InchiOptions { include_stereo: true, include_isotopes: true }
    }
}

/// Layers of one connected component, already in canonical numbering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ComponentLayers {
    formula: String,
    connections: String,
    hydrogens: String,
    charge: i32,
    double_bonds: String,
    centers: String,
    isotopes: String,
}

impl ComponentLayers {
    /// Everything that depends on numbering choice; compared when breaking
    /// ties between symmetric atoms.
    fn numbered_layers(&self) -> (String, String, String, String, String) {
        (
            self.connections.clone(),
            self.hydrogens.clone(),
            self.double_bonds.clone(),
            self.centers.clone(),
            self.isotopes.clone(),
        )
    }
}

/// Derive the canonical identity string for a molecule.
///
/// Explicit hydrogen atoms are folded into their neighbors first, so `[H]OC`
/// and `CO` give the same identity.
pub fn molecule_to_identity(mol: &Molecule, options: &InchiOptions) -> Result<CanonicalIdentity> {
    if mol.atom_count() == 0 {
        return Err(ChemlinkError::InvalidInput("molecule has no atoms".into()));
    }
    let mol = mol.without_explicit_hydrogens();

    let mut components: Vec<(usize, ComponentLayers)> = connected_components(&mol)
        .iter()
        .map(|atoms| {
            let sub = mol.induced_subgraph(atoms);
            (sub.heavy_atom_count(), component_layers(&sub, options))
        })
        .collect();
    components.sort_by(|a, b| (Reverse(a.0), &a.1).cmp(&(Reverse(b.0), &b.1)));

    // Identical components collapse into one entry with a multiplier.
    let mut groups: Vec<(usize, ComponentLayers)> = Vec::new();
    for (_, layers) in components {
        match groups.last_mut() {
            Some((count, last)) if *last == layers => *count += 1,
            _ => groups.push((1, layers)),
        }
    }

    let mut out = String::from(IDENTITY_PREFIX);
    let formulas: Vec<String> = groups
        .iter()
        .map(|(count, l)| if *count > 1 { format!("{count}{}", l.formula) } else { l.formula.clone() })
        .collect();
    out.push_str(&formulas.join("."));

    push_layer(&mut out, 'c', &groups, |l| l.connections.clone());
    push_layer(&mut out, 'h', &groups, |l| l.hydrogens.clone());
    push_layer(&mut out, 'q', &groups, |l| match l.charge {
        0 => String::new(),
        q => format!("{q:+}"),
    });
    if options.include_stereo {
        let before = out.len();
        push_layer(&mut out, 'b', &groups, |l| l.double_bonds.clone());
        push_layer(&mut out, 't', &groups, |l| l.centers.clone());
        if out.len() > before {
            out.push_str("/s1");
        }
    }
    if options.include_isotopes {
        push_layer(&mut out, 'i', &groups, |l| l.isotopes.clone());
    }

    Ok(CanonicalIdentity(out))
}

/// Append `/<tag>` followed by the per-group parts joined by `;`, unless
/// every part is empty.
fn push_layer<F>(out: &mut String, tag: char, groups: &[(usize, ComponentLayers)], part: F)
where
    F: Fn(&ComponentLayers) -> String,
{
    let parts: Vec<String> = groups
        .iter()
        .map(|(count, layers)| {
            let p = part(layers);
            if p.is_empty() || *count == 1 {
                p
            } else {
                format!("{count}*{p}")
            }
        })
        .collect();
    if parts.iter().all(|p| p.is_empty()) {
        return;
    }
    out.push('/');
    out.push(tag);
    out.push_str(&parts.join(";"));
}

fn component_layers(mol: &Molecule, options: &InchiOptions) -> ComponentLayers {
    let invariants = atom_invariants(mol);
    let classes = symmetry_classes(mol, &invariants);
    let in_ring = ring_atom_mask(mol);
    let numbered = |ranks: &[usize]| -> Vec<usize> { ranks.iter().map(|r| r + 1).collect() };

    let ranking = canonical_ranking_by(mol, &invariants, |ranks| {
        layers_for_numbering(mol, &numbered(ranks), &classes, &in_ring, options).numbered_layers()
    });
    layers_for_numbering(mol, &numbered(&ranking.ranks), &classes, &in_ring, options)
}

fn layers_for_numbering(
    mol: &Molecule,
    numbers: &[usize],
    classes: &[usize],
    in_ring: &[bool],
    options: &InchiOptions,
) -> ComponentLayers {
    let (double_bonds, centers) = if options.include_stereo {
        (double_bond_layer(mol, numbers, classes), center_layer(mol, numbers, classes, in_ring))
    } else {
        (String::new(), String::new())
    };
    ComponentLayers {
        formula: hill_formula(mol),
        connections: connection_layer(mol, numbers),
        hydrogens: hydrogen_layer(mol, numbers),
        charge: mol.atoms.iter().map(|a| a.formal_charge as i32).sum(),
        double_bonds,
        centers,
        isotopes: if options.include_isotopes { isotope_layer(mol, numbers) } else { String::new() },
    }
}

/// Per-atom invariants: Hill element position, degree, hydrogens, charge, isotope.
fn atom_invariants(mol: &Molecule) -> Vec<u64> {
    let mut elements: Vec<u8> = mol.atoms.iter().map(|a| a.atomic_number).collect();
    elements.sort_by_key(|&z| hill_key(z));
    elements.dedup();

    (0..mol.atom_count())
        .map(|i| {
            let atom = &mol.atoms[i];
            let element = elements.iter().position(|&z| z == atom.atomic_number).unwrap_or(0) as u64;
            let charge = (atom.formal_charge as i64 + 128) as u64;
            element << 48
                | (mol.degree(i) as u64) << 40
                | (atom.implicit_hydrogens as u64) << 32
                | charge << 16
                | atom.isotope.unwrap_or(0) as u64
        })
        .collect()
}

/// Hill-order formula, hydrogens included.
fn hill_formula(mol: &Molecule) -> String {
    let mut counts: BTreeMap<(u8, &'static str), usize> = BTreeMap::new();
    let mut has_carbon = false;
    for atom in &mol.atoms {
        let symbol = element_by_number(atom.atomic_number).map_or("?", |e| e.symbol);
        has_carbon |= atom.atomic_number == 6;
        *counts.entry((atom.atomic_number, symbol)).or_insert(0) += 1;
        if atom.implicit_hydrogens > 0 {
            *counts.entry((1, "H")).or_insert(0) += atom.implicit_hydrogens as usize;
        }
    }

    let mut entries: Vec<(&'static str, u8, usize)> =
        counts.into_iter().map(|((z, sym), n)| (sym, z, n)).collect();
    if has_carbon {
        entries.sort_by_key(|&(_, z, _)| hill_key(z));
    } else {
        entries.sort_by_key(|&(sym, _, _)| sym);
    }

    let mut formula = String::new();
    for (symbol, _, count) in entries {
        formula.push_str(symbol);
        if count > 1 {
            formula.push_str(&count.to_string());
        }
    }
    formula
}

/// Connection table as a depth-first walk from atom 1, neighbors in
/// ascending order, branches in parentheses. A ring closure is written as
/// the number of the atom it returns to.
fn connection_layer(mol: &Molecule, numbers: &[usize]) -> String {
    if mol.atom_count() < 2 {
        return String::new();
    }
    let Some(start) = numbers.iter().position(|&n| n == 1) else {
        return String::new();
    };
    let mut visited = vec![false; mol.atom_count()];
    let mut used_bonds = vec![false; mol.bond_count()];
    let mut out = String::new();
    walk_connections(mol, start, numbers, &mut visited, &mut used_bonds, &mut out);
    out
}

fn walk_connections(
    mol: &Molecule,
    atom_idx: usize,
    numbers: &[usize],
    visited: &mut Vec<bool>,
    used_bonds: &mut Vec<bool>,
    out: &mut String,
) {
    visited[atom_idx] = true;
    out.push_str(&numbers[atom_idx].to_string());

    let mut neighbors = mol.adjacency[atom_idx].clone();
    neighbors.sort_by_key(|&(n, _)| numbers[n]);

    for i in 0..neighbors.len() {
        let (n, bi) = neighbors[i];
        if used_bonds[bi] {
            continue;
        }
        used_bonds[bi] = true;

        let mut branch = String::new();
        if visited[n] {
            branch.push_str(&numbers[n].to_string());
        } else {
            walk_connections(mol, n, numbers, visited, used_bonds, &mut branch);
        }
        // A branch is parenthesized only if this atom still has bonds to write.
        if neighbors[i + 1..].iter().any(|&(_, bj)| !used_bonds[bj]) {
            out.push('(');
            out.push_str(&branch);
            out.push(')');
        } else {
            if !out.ends_with(')') {
                out.push('-');
            }
            out.push_str(&branch);
        }
    }
}

/// Hydrogen layer: atoms grouped by hydrogen count, e.g. `3H,2H2,1H3`.
fn hydrogen_layer(mol: &Molecule, numbers: &[usize]) -> String {
    let mut by_count: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
    for (i, atom) in mol.atoms.iter().enumerate() {
        if atom.implicit_hydrogens > 0 {
            by_count.entry(atom.implicit_hydrogens).or_default().push(numbers[i]);
        }
    }

    let groups: Vec<String> = by_count
        .into_iter()
        .map(|(count, mut atoms)| {
            atoms.sort_unstable();
            let mut group = compress_ranges(&atoms);
            group.push('H');
            if count > 1 {
                group.push_str(&count.to_string());
            }
            group
        })
        .collect();
    groups.join(",")
}

/// `[1, 2, 3, 5]` -> `"1-3,5"`.
fn compress_ranges(sorted: &[usize]) -> String {
    let mut parts = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j + 1 < sorted.len() && sorted[j + 1] == sorted[j] + 1 {
            j += 1;
        }
        parts.push(if j > i {
            format!("{}-{}", sorted[i], sorted[j])
        } else {
            sorted[i].to_string()
        });
        i = j + 1;
    }
    parts.join(",")
}

/// Cis/trans layer for double bonds with direction markers on both ends.
///
/// Each end is referenced by its highest-numbered substituent; `+` means the
/// two references are trans, `-` cis.
fn double_bond_layer(mol: &Molecule, numbers: &[usize], classes: &[usize]) -> String {
    let mut parts: Vec<(usize, usize, char)> = Vec::new();
    for bond in mol.bonds.iter().filter(|b| b.order == BondOrder::Double) {
        let first = end_direction(mol, bond.atom1, bond.atom2, true, numbers, classes);
        let second = end_direction(mol, bond.atom2, bond.atom1, false, numbers, classes);
        if let (Some(a), Some(b)) = (first, second) {
            let hi = numbers[bond.atom1].max(numbers[bond.atom2]);
            let lo = numbers[bond.atom1].min(numbers[bond.atom2]);
            parts.push((hi, lo, if a == b { '+' } else { '-' }));
        }
    }
    parts.sort_unstable();
    parts
        .iter()
        .map(|(hi, lo, sign)| format!("{hi}-{lo}{sign}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Direction (`+1`/`-1`) of the highest-numbered substituent on one end of
/// a double bond, or `None` when that end carries no usable stereo.
///
/// A marker written towards the double bond (`F/C=`) keeps its sense on the
/// first end; on the second end the marker is read away from the double
/// bond (`=C/F`), so the comparison is mirrored.
fn end_direction(
    mol: &Molecule,
    end: usize,
    other: usize,
    is_first: bool,
    numbers: &[usize],
    classes: &[usize],
) -> Option<i8> {
    let subs: Vec<(usize, usize)> =
        mol.adjacency[end].iter().copied().filter(|&(n, _)| n != other).collect();
    if subs.is_empty() || subs.len() > 2 {
        return None;
    }
    if subs.len() == 2 && classes[subs[0].0] == classes[subs[1].0] {
        return None;
    }

    let &(marked, bi) = subs.iter().find(|&&(_, bi)| mol.bonds[bi].stereo != BondStereo::None)?;
    let bond = &mol.bonds[bi];
    let sign = bond.stereo.sign();
    let written_towards_end = bond.atom2 == end;
    let mut direction = if is_first == written_towards_end { sign } else { -sign };

    let reference = subs.iter().map(|&(n, _)| n).max_by_key(|&n| numbers[n])?;
    if reference != marked {
        direction = -direction;
    }
    Some(direction)
}

/// Tetrahedral layer: parity of the written neighbor order relative to
/// canonical numbering, combined with `@`/`@@`.
///
/// A center with two symmetry-equivalent neighbors is dropped, unless both
/// are ring atoms and another center is marked. Such a center only has a
/// configuration relative to the others (cis/trans on a ring), which the
/// numbering search keeps consistent.
fn center_layer(mol: &Molecule, numbers: &[usize], classes: &[usize], in_ring: &[bool]) -> String {
    let marked = mol.atoms.iter().filter(|a| a.chirality != Chirality::None).count();
    let mut parts: Vec<(usize, char)> = Vec::new();
    for (i, atom) in mol.atoms.iter().enumerate() {
        let base = match atom.chirality {
            Chirality::None => continue,
            Chirality::CounterClockwise => 0,
            Chirality::Clockwise => 1,
        };
        let slots = &mol.neighbor_order[i];
        if slots.len() != 4 {
            continue;
        }

        let mut symmetry: Vec<(Option<usize>, bool)> = slots
            .iter()
            .map(|s| match *s {
                NeighborSlot::Atom(j) => (Some(classes[j]), in_ring[j]),
                NeighborSlot::ImplicitH => (None, false),
            })
            .collect();
        symmetry.sort_unstable();
        let mut twins = symmetry.windows(2).filter(|w| w[0].0 == w[1].0).peekable();
        if twins.peek().is_some() {
            let relative = marked > 1 && in_ring[i] && twins.all(|w| w[0].1 && w[1].1);
            if !relative {
                continue;
            }
        }

        let keys: Vec<usize> = slots
            .iter()
            .map(|s| match *s {
                NeighborSlot::Atom(j) => numbers[j],
                NeighborSlot::ImplicitH => 0,
            })
            .collect();
        let inversions = (0..4)
            .flat_map(|a| (a + 1..4).map(move |b| (a, b)))
            .filter(|&(a, b)| keys[a] > keys[b])
            .count();
        let parity = (base + inversions) % 2;
        parts.push((numbers[i], if parity == 0 { '-' } else { '+' }));
    }
    parts.sort_unstable();
    parts
        .iter()
        .map(|(n, sign)| format!("{n}{sign}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Isotope layer: atom number and mass difference from the nominal mass.
fn isotope_layer(mol: &Molecule, numbers: &[usize]) -> String {
    let mut parts: Vec<(usize, i32)> = mol
        .atoms
        .iter()
        .enumerate()
        .filter_map(|(i, atom)| {
            let mass = atom.isotope?;
            let nominal = element_by_number(atom.atomic_number)?.nominal_mass();
            Some((numbers[i], mass as i32 - nominal as i32))
        })
        .collect();
    parts.sort_unstable();
    parts
        .iter()
        .map(|(n, delta)| format!("{n}{delta:+}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// An identity string split into the parts hashed into each key block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityLayers<'a> {
    pub formula: &'a str,
    /// Formula plus connection, hydrogen and charge layers.
    pub main: String,
    /// Stereo, isotope and any other remaining layers, each with its `/`.
    pub remainder: String,
    /// Net protons added or removed (`/p` layer).
    pub protonation: i32,
    /// Whether the string is a standard InChI.
    pub standard: bool,
}

/// Validate an identity string and split it into its hashed parts.
///
/// Accepts identities from [`molecule_to_identity`] and standard InChI.
pub fn parse_identity(identity: &str) -> Result<IdentityLayers<'_>> {
    let (body, standard) = if let Some(body) = identity.strip_prefix(STANDARD_INCHI_PREFIX) {
        (body, true)
    } else if let Some(body) = identity.strip_prefix(IDENTITY_PREFIX) {
        (body, false)
    } else {
        return Err(ChemlinkError::Parse(format!(
            "identity must start with '{IDENTITY_PREFIX}' or '{STANDARD_INCHI_PREFIX}'"
        )));
    };
    let mut layers = body.split('/');
    let formula = layers.next().unwrap_or_default();

    let valid_formula = formula
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        && formula.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '*');
    if !valid_formula {
        return Err(ChemlinkError::Parse(format!("invalid formula layer '{formula}'")));
    }

    let mut main = String::from(formula);
    let mut remainder = String::new();
    let mut protonation = 0;
    for layer in layers {
        let tag = layer
            .chars()
            .next()
            .filter(|c| c.is_ascii_lowercase())
            .ok_or_else(|| ChemlinkError::Parse(format!("invalid layer '/{layer}'")))?;
        if tag == 'p' {
            protonation = layer[1..]
                .parse()
                .map_err(|_| ChemlinkError::Parse(format!("invalid protonation layer '/{layer}'")))?;
            continue;
        }
        let target = if MAIN_LAYERS.contains(&tag) { &mut main } else { &mut remainder };
        target.push('/');
        target.push_str(layer);
    }

    Ok(IdentityLayers { formula, main, remainder, protonation, standard })
}

/// Derive the identity hash in InChIKey layout: 14 letters from the main
/// layers, 8 from the remaining layers, the standard flag (`S`, or `N` for
/// identities from this crate), the version letter `A` and a protonation
/// letter (`N` for none, `O` for one added proton, `M` for one removed).
pub fn identity_to_hash(identity: &str) -> Result<IdentityHash> {
    let layers = parse_identity(identity)?;

    let mut remainder = layers.remainder;
    if !remainder.is_empty() && remainder.len() < 255 {
        remainder = remainder.repeat(2);
    }
    let flag = if layers.standard { 'S' } else { 'N' };
    let protonation = match layers.protonation {
        p @ -12..=12 => (b'N' as i32 + p) as u8 as char,
        _ => 'A',
    };

    Ok(IdentityHash(format!(
        "{}-{}{flag}A-{protonation}",
        hash_block(&layers.main, 4),
        hash_block(&remainder, 2)
    )))
}

/// Letters for the leading bits of a SHA-256 digest: `triplets` groups of
/// three letters from 14 bits each, then two letters from the next 9 bits.
fn hash_block(data: &str, triplets: usize) -> String {
    let digest = sha256_digest(data.as_bytes());
    let mut out = String::with_capacity(3 * triplets + 2);
    for k in 0..triplets {
        out.extend(triplet(digest_bits(&digest, 14 * k, 14)).map(char::from));
    }
    out.extend(doublet(digest_bits(&digest, 14 * triplets, 9)).map(char::from));
    out
}

/// `width` bits starting at bit `offset`, least significant bit first.
fn digest_bits(digest: &[u8; 32], offset: usize, width: usize) -> u16 {
    (0..width).fold(0u16, |acc, k| {
        let bit = offset + k;
        acc | u16::from((digest[bit / 8] >> (bit % 8)) & 1) << k
    })
}

/// The `value`-th three-letter group in alphabetical order, leaving out
/// groups starting with `E` and the run from `TAA` to `TTV`.
fn triplet(value: u16) -> [u8; 3] {
    let mut index = usize::from(value & 0x3fff);
    if index >= 4 * 676 {
        index += 676;
    }
    if index >= 19 * 676 {
        index += 516;
    }
    [b'A' + (index / 676) as u8, b'A' + (index / 26 % 26) as u8, b'A' + (index % 26) as u8]
}

fn doublet(value: u16) -> [u8; 2] {
    let index = usize::from(value & 0x1ff);
    [b'A' + (index / 26) as u8, b'A' + (index % 26) as u8]
}
