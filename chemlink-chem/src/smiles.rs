//! SMILES string parser.
//!
//! Supports the organic subset, bracket atoms (isotope, chirality, hydrogen
//! count, charge), branches, ring closures including `%nn`, disconnected
//! fragments, and `/` `\` double-bond direction markers. Neighbor order is
//! recorded as written so tetrahedral chirality can be interpreted later.

use std::collections::BTreeMap;

use chemlink_core::{ChemlinkError, Result};

use crate::aromatic::set_aromaticity;
use crate::element::element_by_symbol;
use crate::molecule::{Bond, BondOrder, BondStereo, Chirality, MolAtom, Molecule, NeighborSlot};

/// Parse a SMILES string into a `Molecule`.
pub fn parse_smiles(smiles: &str) -> Result<Molecule> {
    parse_smiles_named(smiles, "")
}

/// Parse a SMILES string into a `Molecule` with a given name.
pub fn parse_smiles_named(smiles: &str, name: &str) -> Result<Molecule> {
    let smiles = smiles.trim();
    if smiles.is_empty() {
        return Err(ChemlinkError::Parse("empty SMILES".into()));
    }
    let mut parser = SmilesParser::new(smiles);
    parser.parse()?;
    parser.check_complete()?;
    parser.compute_implicit_hydrogens();
    parser.check_valences()?;
    let order = parser.neighbor_order.into_iter().map(resolve_slots).collect::<Result<_>>()?;
    let mut mol = Molecule::new(name.to_string(), parser.atoms, parser.bonds).with_neighbor_order(order);
    set_aromaticity(&mut mol);
    Ok(mol)
}

/// A written neighbor position whose partner may not be known yet.
#[derive(Debug, Clone, Copy)]
enum PendingSlot {
    Resolved(NeighborSlot),
    /// Ring-closure digit opened at this atom, resolved when the ring closes.
    RingOpen(u16),
}

fn resolve_slots(slots: Vec<PendingSlot>) -> Result<Vec<NeighborSlot>> {
    slots
        .into_iter()
        .map(|slot| match slot {
            PendingSlot::Resolved(s) => Ok(s),
            PendingSlot::RingOpen(n) => {
                Err(ChemlinkError::Parse(format!("unresolved ring closure {n}")))
            }
        })
        .collect()
}

struct SmilesParser<'a> {
    input: &'a [u8],
    pos: usize,
    atoms: Vec<MolAtom>,
    bonds: Vec<Bond>,
    /// Whether each atom was written in brackets (hydrogen count is then explicit).
    bracketed: Vec<bool>,
    neighbor_order: Vec<Vec<PendingSlot>>,
    /// ring_closures[digit] = (atom_idx, Option<BondOrder>, BondStereo)
    ring_closures: BTreeMap<u16, (usize, Option<BondOrder>, BondStereo)>,
    /// Stack of atom indices for branch handling
    stack: Vec<usize>,
    /// Index of the previous atom (for bonding)
    prev_atom: Option<usize>,
    /// Pending bond order for the next bond
    pending_bond: Option<BondOrder>,
    pending_stereo: BondStereo,
}

impl<'a> SmilesParser<'a> {
    fn new(input: &'a str) -> Self {
        SmilesParser {
            input: input.as_bytes(),
            pos: 0,
            atoms: Vec::new(),
            bonds: Vec::new(),
            bracketed: Vec::new(),
            neighbor_order: Vec::new(),
            ring_closures: BTreeMap::new(),
            stack: Vec::new(),
            prev_atom: None,
            pending_bond: None,
            pending_stereo: BondStereo::None,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn error(&self, msg: impl Into<String>) -> ChemlinkError {
        ChemlinkError::Parse(format!("{} at position {}", msg.into(), self.pos))
    }

    fn set_pending_bond(&mut self, order: BondOrder) -> Result<()> {
        if self.pending_bond.is_some() {
            return Err(self.error("two consecutive bond symbols"));
        }
        self.pending_bond = Some(order);
        Ok(())
    }

    fn parse(&mut self) -> Result<()> {
        while let Some(ch) = self.peek() {
            match ch {
                b'(' => {
                    self.advance();
                    let prev = self.prev_atom.ok_or_else(|| self.error("branch without preceding atom"))?;
                    self.stack.push(prev);
                }
                b')' => {
                    self.advance();
                    if self.pending_bond.is_some() {
                        return Err(self.error("bond symbol before ')'"));
                    }
                    self.prev_atom =
                        Some(self.stack.pop().ok_or_else(|| self.error("unmatched ')'"))?);
                }
                b'-' => {
                    self.advance();
                    self.set_pending_bond(BondOrder::Single)?;
                }
                b'=' => {
                    self.advance();
                    self.set_pending_bond(BondOrder::Double)?;
                }
                b'#' => {
                    self.advance();
                    self.set_pending_bond(BondOrder::Triple)?;
                }
                b':' => {
                    self.advance();
                    self.set_pending_bond(BondOrder::Aromatic)?;
                }
                b'/' | b'\\' => {
                    self.advance();
                    self.set_pending_bond(BondOrder::Single)?;
                    self.pending_stereo = if ch == b'/' { BondStereo::Up } else { BondStereo::Down };
                }
                b'%' => {
                    self.advance();
                    let ring_num = self.parse_two_digit_ring()?;
                    self.handle_ring_closure(ring_num)?;
                }
                b'[' => self.parse_bracket_atom()?,
                b'0'..=b'9' => {
                    self.advance();
                    self.handle_ring_closure((ch - b'0') as u16)?;
                }
                b'.' => {
                    self.advance();
                    if self.pending_bond.is_some() {
                        return Err(self.error("bond symbol before '.'"));
                    }
                    self.prev_atom = None;
                }
                _ if is_organic_atom_start(ch) => self.parse_organic_atom()?,
                _ => {
                    return Err(self.error(format!("unexpected character '{}'", ch as char)));
                }
            }
        }
        Ok(())
    }

    fn parse_organic_atom(&mut self) -> Result<()> {
        let ch = self.advance().ok_or_else(|| self.error("expected atom"))?;
        let is_aromatic = ch.is_ascii_lowercase();
        let upper = ch.to_ascii_uppercase();

        let symbol = match upper {
            b'B' if !is_aromatic && self.peek() == Some(b'r') => {
                self.advance();
                "Br"
            }
            b'C' if !is_aromatic && self.peek() == Some(b'l') => {
                self.advance();
                "Cl"
            }
            b'B' => "B",
            b'C' => "C",
            b'N' => "N",
            b'O' => "O",
            b'P' => "P",
            b'S' => "S",
            b'F' => "F",
            b'I' => "I",
            _ => return Err(self.error(format!("unknown organic atom '{}'", upper as char))),
        };

        let elem = element_by_symbol(symbol)
            .ok_or_else(|| self.error(format!("unknown element '{symbol}'")))?;
        let mut atom = MolAtom::new(elem.atomic_number);
        atom.is_aromatic = is_aromatic;
        self.push_atom(atom, false, false)
    }

    fn parse_bracket_atom(&mut self) -> Result<()> {
        self.advance(); // consume '['

        let isotope = self.parse_optional_number();
        let ch = self
            .advance()
            .ok_or_else(|| self.error("unexpected end of SMILES in bracket atom"))?;
        if !ch.is_ascii_alphabetic() {
            return Err(self.error(format!("expected element symbol, found '{}'", ch as char)));
        }

        let is_aromatic = ch.is_ascii_lowercase();
        let upper = ch.to_ascii_uppercase();

        // Two-letter symbols first ("Cl", "se" -> "Se"), then one-letter.
        let symbol = match self.peek() {
            Some(next) if next.is_ascii_lowercase() => {
                let two_letter = format!("{}{}", upper as char, next as char);
                if element_by_symbol(&two_letter).is_some() {
                    self.advance();
                    two_letter
                } else {
                    String::from(upper as char)
                }
            }
            _ => String::from(upper as char),
        };

        let elem = element_by_symbol(&symbol)
            .ok_or_else(|| self.error(format!("unknown element '{symbol}'")))?;

        let chirality = match (self.peek(), self.input.get(self.pos + 1).copied()) {
            (Some(b'@'), Some(b'@')) => {
                self.pos += 2;
                Chirality::Clockwise
            }
            (Some(b'@'), _) => {
                self.advance();
                Chirality::CounterClockwise
            }
            _ => Chirality::None,
        };
        if self.peek().is_some_and(|c| c == b'@' || (c.is_ascii_uppercase() && c != b'H')) {
            return Err(self.error("unsupported chirality class"));
        }

        let mut hydrogens = 0u8;
        if self.peek() == Some(b'H') {
            self.advance();
            hydrogens = match self.peek() {
                Some(d) if d.is_ascii_digit() => {
                    self.advance();
                    d - b'0'
                }
                _ => 1,
            };
        }

        let charge = self.parse_charge()?;

        // Atom class (":n") carries no chemistry.
        if self.peek() == Some(b':') {
            self.advance();
            if self.parse_optional_number().is_none() {
                return Err(self.error("expected atom class number"));
            }
        }

        if self.advance() != Some(b']') {
            return Err(self.error("expected ']' in bracket atom"));
        }

        let atom = MolAtom {
            atomic_number: elem.atomic_number,
            formal_charge: charge,
            isotope: isotope.map(|n| n as u16),
            is_aromatic,
            implicit_hydrogens: hydrogens,
            chirality,
        };
        let h_slot = chirality != Chirality::None && hydrogens > 0;
        self.push_atom(atom, true, h_slot)
    }

    fn parse_charge(&mut self) -> Result<i8> {
        let sign: i8 = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Ok(0),
        };
        let symbol = self.advance().unwrap_or(b'+');
        let magnitude = match self.peek() {
            Some(d) if d.is_ascii_digit() => {
                self.advance();
                (d - b'0') as i8
            }
            _ => {
                let mut count = 1i8;
                while self.peek() == Some(symbol) {
                    self.advance();
                    count += 1;
                }
                count
            }
        };
        Ok(sign * magnitude)
    }

    /// Append an atom, bond it to the previous atom and record its written
    /// neighbor slots.
    fn push_atom(&mut self, atom: MolAtom, bracketed: bool, h_slot: bool) -> Result<()> {
        let atom_idx = self.atoms.len();
        self.atoms.push(atom);
        self.bracketed.push(bracketed);
        self.neighbor_order.push(Vec::new());
        self.add_bond_to_prev(atom_idx)?;
        if h_slot {
            self.neighbor_order[atom_idx].push(PendingSlot::Resolved(NeighborSlot::ImplicitH));
        }
        self.prev_atom = Some(atom_idx);
        Ok(())
    }

    fn parse_optional_number(&mut self) -> Option<u32> {
        let mut n: u32 = 0;
        let mut found = false;
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            self.advance();
            n = n.saturating_mul(10).saturating_add((ch - b'0') as u32);
            found = true;
        }
        found.then_some(n)
    }

    fn parse_two_digit_ring(&mut self) -> Result<u16> {
        let d1 = self.advance().ok_or_else(|| self.error("expected digit after '%'"))?;
        let d2 = self.advance().ok_or_else(|| self.error("expected second digit after '%'"))?;
        if !d1.is_ascii_digit() || !d2.is_ascii_digit() {
            return Err(self.error("invalid ring closure number after '%'"));
        }
        Ok((d1 - b'0') as u16 * 10 + (d2 - b'0') as u16)
    }

    fn handle_ring_closure(&mut self, ring_num: u16) -> Result<()> {
        let current = self
            .prev_atom
            .ok_or_else(|| self.error("ring closure without preceding atom"))?;
        let pending = self.pending_bond.take();
        let stereo = std::mem::take(&mut self.pending_stereo);

        let Some((open_atom, open_bond, open_stereo)) = self.ring_closures.remove(&ring_num) else {
            self.ring_closures.insert(ring_num, (current, pending, stereo));
            self.neighbor_order[current].push(PendingSlot::RingOpen(ring_num));
            return Ok(());
        };

        if open_atom == current || self.bond_exists(open_atom, current) {
            return Err(self.error(format!("ring closure {ring_num} duplicates an existing bond")));
        }
        let order = match (pending, open_bond) {
            (Some(a), Some(b)) if a != b => {
                return Err(self.error(format!("conflicting bond orders on ring closure {ring_num}")));
            }
            (Some(o), _) | (None, Some(o)) => o,
            (None, None) => self.default_order(open_atom, current),
        };
        let is_aromatic = order == BondOrder::Aromatic;
        let stereo = if open_stereo != BondStereo::None { open_stereo } else { stereo };
        self.bonds.push(Bond { atom1: open_atom, atom2: current, order, is_aromatic, stereo });

        let slot = self.neighbor_order[open_atom]
            .iter_mut()
            .find(|s| matches!(s, PendingSlot::RingOpen(n) if *n == ring_num));
        if let Some(slot) = slot {
            *slot = PendingSlot::Resolved(NeighborSlot::Atom(current));
        }
        self.neighbor_order[current].push(PendingSlot::Resolved(NeighborSlot::Atom(open_atom)));
        Ok(())
    }

    fn default_order(&self, a: usize, b: usize) -> BondOrder {
        if self.atoms[a].is_aromatic && self.atoms[b].is_aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn bond_exists(&self, a: usize, b: usize) -> bool {
        self.bonds
            .iter()
            .any(|bond| (bond.atom1 == a && bond.atom2 == b) || (bond.atom1 == b && bond.atom2 == a))
    }

    fn add_bond_to_prev(&mut self, atom_idx: usize) -> Result<()> {
        let stereo = std::mem::take(&mut self.pending_stereo);
        let pending = self.pending_bond.take();
        let Some(prev) = self.prev_atom else {
            if pending.is_some() {
                return Err(self.error("bond symbol without preceding atom"));
            }
            return Ok(());
        };
        let order = pending.unwrap_or_else(|| self.default_order(prev, atom_idx));
        self.bonds.push(Bond {
            atom1: prev,
            atom2: atom_idx,
            order,
            is_aromatic: order == BondOrder::Aromatic,
            stereo,
        });
        self.neighbor_order[prev].push(PendingSlot::Resolved(NeighborSlot::Atom(atom_idx)));
        self.neighbor_order[atom_idx].push(PendingSlot::Resolved(NeighborSlot::Atom(prev)));
        Ok(())
    }

    fn check_complete(&self) -> Result<()> {
        if !self.ring_closures.is_empty() {
            let open: Vec<_> = self.ring_closures.keys().collect();
            return Err(ChemlinkError::Parse(format!("unmatched ring closure(s): {:?}", open)));
        }
        if !self.stack.is_empty() {
            return Err(ChemlinkError::Parse(format!(
                "{} unmatched '(' in SMILES",
                self.stack.len()
            )));
        }
        if self.pending_bond.is_some() {
            return Err(ChemlinkError::Parse("SMILES ends with a bond symbol".into()));
        }
        Ok(())
    }

    /// Fill in hydrogens for organic-subset atoms; bracket atoms keep the
    /// count they were written with.
    fn compute_implicit_hydrogens(&mut self) {
        for i in 0..self.atoms.len() {
            if self.bracketed[i] {
                continue;
            }
            let atom = &self.atoms[i];
            let used = self.valence_used(i);
            let hydrogens = if atom.is_aromatic {
                // One electron of the lowest valence goes to the pi system.
                let lowest = allowed_valences(atom.atomic_number).first().copied().unwrap_or(0);
                (lowest as usize).saturating_sub(1).saturating_sub(used)
            } else {
                allowed_valences(atom.atomic_number)
                    .iter()
                    .map(|&v| v as usize)
                    .find(|&v| v >= used)
                    .map_or(0, |v| v - used)
            };
            self.atoms[i].implicit_hydrogens = hydrogens as u8;
        }
    }

    /// Bonding electrons used by explicit bonds; aromatic bonds count once.
    fn valence_used(&self, atom_idx: usize) -> usize {
        self.bonds
            .iter()
            .filter(|b| b.atom1 == atom_idx || b.atom2 == atom_idx)
            .map(|b| match b.order {
                BondOrder::Aromatic => 1,
                other => other.as_f64() as usize,
            })
            .sum()
    }

    /// Reject atoms whose bonds exceed what the element can carry. Only the
    /// second-row elements with a single fixed valence are checked.
    fn check_valences(&self) -> Result<()> {
        for (i, atom) in self.atoms.iter().enumerate() {
            if atom.is_aromatic {
                continue;
            }
            let charge = atom.formal_charge as i32;
            let max = match atom.atomic_number {
                5 => 3 - charge,
                6 => 4 - charge.abs(),
                7 => 3 + charge,
                8 => 2 + charge,
                9 => 1 + charge,
                _ => continue,
            };
            let total = self.valence_used(i) as i32 + atom.implicit_hydrogens as i32;
            if total > max {
                return Err(ChemlinkError::Parse(format!(
                    "explicit valence {total} exceeds {max} for atom {i}"
                )));
            }
        }
        Ok(())
    }
}

/// Allowed valences for organic-subset elements, lowest first.
fn allowed_valences(atomic_number: u8) -> &'static [u8] {
    match atomic_number {
        5 => &[3],
        6 => &[4],
        7 => &[3, 5],
        8 => &[2],
        15 => &[3, 5],
        16 => &[2, 4, 6],
        9 | 17 | 35 | 53 => &[1],
        _ => &[],
    }
}

fn is_organic_atom_start(ch: u8) -> bool {
    matches!(
        ch,
        b'B' | b'C' | b'N' | b'O' | b'P' | b'S' | b'F' | b'I'
            | b'b' | b'c' | b'n' | b'o' | b'p' | b's'
    )
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for valid simple SMILES: chains of organic subset atoms
    fn simple_smiles() -> impl Strategy<Value = String> {
        let atoms = prop_oneof![Just("C"), Just("N"), Just("O"), Just("S"), Just("Cl")];
        proptest::collection::vec(atoms, 1..=20).prop_map(|parts| parts.join(""))
    }

    proptest! {
        #[test]
        fn parse_smiles_does_not_panic(s in "\\PC{0,100}") {
            let _ = parse_smiles(&s);
        }

        #[test]
        fn neighbor_order_matches_degree(smi in simple_smiles()) {
            if let Ok(mol) = parse_smiles(&smi) {
                for i in 0..mol.atom_count() {
                    prop_assert_eq!(mol.neighbor_order[i].len(), mol.degree(i));
                }
            }
        }
    }
}
