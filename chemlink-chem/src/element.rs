//! Periodic table data and element lookup.

/// A chemical element from the periodic table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub atomic_number: u8,
    pub symbol: &'static str,
    pub name: &'static str,
    pub atomic_weight: f64,
}

impl Element {
    /// Mass number of the most common isotope, used as the reference for
    /// isotope deltas in identity strings.
    pub fn nominal_mass(&self) -> u16 {
        self.atomic_weight.round() as u16
    }
}

macro_rules! elements {
    ($(($z:expr, $sym:expr, $name:expr, $w:expr)),* $(,)?) => {
        &[$(Element { atomic_number: $z, symbol: $sym, name: $name, atomic_weight: $w }),*]
    };
}

/// Elements H through Xe plus the heavier elements that show up in drug and
/// probe collections (platinum complexes, contrast agents, bismuth salts).
static ELEMENTS: &[Element] = elements![
    (1, "H", "Hydrogen", 1.008),
    (2, "He", "Helium", 4.003),
    (3, "Li", "Lithium", 6.941),
    (4, "Be", "Beryllium", 9.012),
    (5, "B", "Boron", 10.81),
    (6, "C", "Carbon", 12.011),
    (7, "N", "Nitrogen", 14.007),
    (8, "O", "Oxygen", 15.999),
    (9, "F", "Fluorine", 18.998),
    (10, "Ne", "Neon", 20.180),
    (11, "Na", "Sodium", 22.990),
    (12, "Mg", "Magnesium", 24.305),
    (13, "Al", "Aluminum", 26.982),
    (14, "Si", "Silicon", 28.086),
    (15, "P", "Phosphorus", 30.974),
    (16, "S", "Sulfur", 32.06),
    (17, "Cl", "Chlorine", 35.45),
    (18, "Ar", "Argon", 39.948),
    (19, "K", "Potassium", 39.098),
    (20, "Ca", "Calcium", 40.078),
    (21, "Sc", "Scandium", 44.956),
    (22, "Ti", "Titanium", 47.867),
    (23, "V", "Vanadium", 50.942),
    (24, "Cr", "Chromium", 51.996),
    (25, "Mn", "Manganese", 54.938),
    (26, "Fe", "Iron", 55.845),
    (27, "Co", "Cobalt", 58.933),
    (28, "Ni", "Nickel", 58.693),
    (29, "Cu", "Copper", 63.546),
    (30, "Zn", "Zinc", 65.38),
    (31, "Ga", "Gallium", 69.723),
    (32, "Ge", "Germanium", 72.63),
    (33, "As", "Arsenic", 74.922),
    (34, "Se", "Selenium", 78.96),
    (35, "Br", "Bromine", 79.904),
    (36, "Kr", "Krypton", 83.798),
    (37, "Rb", "Rubidium", 85.468),
    (38, "Sr", "Strontium", 87.62),
    (39, "Y", "Yttrium", 88.906),
    (40, "Zr", "Zirconium", 91.224),
    (41, "Nb", "Niobium", 92.906),
    (42, "Mo", "Molybdenum", 95.95),
    (43, "Tc", "Technetium", 98.0),
    (44, "Ru", "Ruthenium", 101.07),
    (45, "Rh", "Rhodium", 102.906),
    (46, "Pd", "Palladium", 106.42),
    (47, "Ag", "Silver", 107.868),
    (48, "Cd", "Cadmium", 112.414),
    (49, "In", "Indium", 114.818),
    (50, "Sn", "Tin", 118.710),
    (51, "Sb", "Antimony", 121.760),
    (52, "Te", "Tellurium", 127.60),
    (53, "I", "Iodine", 126.904),
    (54, "Xe", "Xenon", 131.293),
    (55, "Cs", "Cesium", 132.905),
    (56, "Ba", "Barium", 137.327),
    (57, "La", "Lanthanum", 138.905),
    (64, "Gd", "Gadolinium", 157.25),
    (71, "Lu", "Lutetium", 174.967),
    (74, "W", "Tungsten", 183.84),
    (75, "Re", "Rhenium", 186.207),
    (76, "Os", "Osmium", 190.23),
    (77, "Ir", "Iridium", 192.217),
    (78, "Pt", "Platinum", 195.084),
    (79, "Au", "Gold", 196.967),
    (80, "Hg", "Mercury", 200.592),
    (81, "Tl", "Thallium", 204.38),
    (82, "Pb", "Lead", 207.2),
    (83, "Bi", "Bismuth", 208.980),
    (88, "Ra", "Radium", 226.0),
];

/// Look up an element by its symbol (e.g. "C", "Fe").
pub fn element_by_symbol(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.symbol == symbol)
}

/// Look up an element by its atomic number.
pub fn element_by_number(n: u8) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.atomic_number == n)
}

/// Sort key placing elements in Hill order: carbon, hydrogen, then the rest
/// alphabetically by symbol.
///
/// Only meaningful for formulas that contain carbon; callers formatting a
/// carbon-free formula sort purely alphabetically instead.
pub fn hill_key(atomic_number: u8) -> (u8, &'static str) {
    match atomic_number {
        6 => (0, "C"),
        1 => (1, "H"),
        n => (2, element_by_number(n).map_or("?", |e| e.symbol)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_carbon_by_symbol() {
        let c = element_by_symbol("C").unwrap();
        assert_eq!(c.atomic_number, 6);
        assert_eq!(c.name, "Carbon");
        assert!((c.atomic_weight - 12.011).abs() < 0.001);
        assert_eq!(c.nominal_mass(), 12);
    }

    #[test]
    fn lookup_platinum_by_number() {
        let pt = element_by_number(78).unwrap();
        assert_eq!(pt.symbol, "Pt");
        assert_eq!(pt.nominal_mass(), 195);
    }

    #[test]
    fn unknown_returns_none() {
        assert!(element_by_symbol("Zz").is_none());
        assert!(element_by_number(0).is_none());
        assert!(element_by_number(60).is_none());
    }

    #[test]
    fn hill_order_puts_carbon_then_hydrogen() {
        let mut nums = vec![8u8, 1, 17, 6, 7];
        nums.sort_by_key(|&n| hill_key(n));
        assert_eq!(nums, vec![6, 1, 17, 7, 8]);
    }
}
