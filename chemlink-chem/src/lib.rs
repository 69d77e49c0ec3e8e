//! Small-molecule chemistry for compound cross-referencing.
//!
//! Parses SMILES into a molecular graph with perceived aromaticity, derives a
//! canonical identity string (InChI layer layout) and its InChIKey-encoded
//! hash, and computes Morgan fingerprints for Tanimoto similarity.
//!
//! # Example
//!
//! ```
//! use chemlink_chem::{morgan_fingerprint, parse_smiles, tanimoto_similarity, ChemToolkit, ToolkitConfig};
//!
//! let ethanol = parse_smiles("CCO").unwrap();
//! assert_eq!(ethanol.atom_count(), 3);
//!
//! let toolkit = ChemToolkit::new(ToolkitConfig::default()).unwrap();
//! let id = toolkit.to_canonical_identity(Some("CCO")).unwrap();
//! assert_eq!(id.as_str(), "ChemLink=1/C2H6O/c1-2-3/h3H,2H2,1H3");
//!
//! let fp1 = morgan_fingerprint(&ethanol, 2, 1024).unwrap();
//! let fp2 = toolkit.fingerprint_notation("OCC").unwrap();
//! assert!((tanimoto_similarity(&fp1, &fp2).unwrap() - 1.0).abs() < 1e-10);
//! ```

pub mod aromatic;
pub mod canon;
pub mod element;
pub mod fingerprint;
pub mod graph;
pub mod inchi;
pub mod molecule;
#[cfg(feature = "rdkit")]
pub mod rdkit;
pub mod smiles;
pub mod toolkit;

pub use aromatic::{find_aromatic_atoms, set_aromaticity};
pub use canon::{canonical_ranking, canonical_ranking_by, symmetry_classes, CanonicalRanking};
pub use element::{element_by_number, element_by_symbol, Element};
pub use fingerprint::{morgan_fingerprint, tanimoto_bulk, tanimoto_similarity, Fingerprint};
pub use inchi::{
    identity_to_hash, molecule_to_identity, parse_identity, CanonicalIdentity, IdentityHash,
    IdentityLayers, InchiOptions, HASH_DISPLAY_PREFIX, IDENTITY_PREFIX, INCHIKEY_DISPLAY_PREFIX,
    STANDARD_INCHI_PREFIX,
};
pub use molecule::{Bond, BondOrder, BondStereo, Chirality, MolAtom, Molecule, NeighborSlot};
pub use smiles::{parse_smiles, parse_smiles_named};
pub use toolkit::{ChemToolkit, IdentityBackend, ToolkitConfig};
