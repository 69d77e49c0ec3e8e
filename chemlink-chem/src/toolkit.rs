//! Configured entry point for the chemistry operations the pipeline needs.
//!
//! [`ChemToolkit`] bundles parsing, identity derivation and fingerprinting
//! behind one value that callers construct once and pass around.

use chemlink_core::{ChemlinkError, Result};
use tracing::debug;

use crate::fingerprint::{morgan_fingerprint, tanimoto_similarity, Fingerprint};
use crate::inchi::{identity_to_hash, molecule_to_identity, CanonicalIdentity, IdentityHash, InchiOptions};
use crate::molecule::Molecule;
use crate::smiles::parse_smiles;

/// Default Morgan radius.
pub const DEFAULT_FINGERPRINT_RADIUS: usize = 2;
/// Default fingerprint length in bits.
pub const DEFAULT_FINGERPRINT_BITS: usize = 1024;

/// Where canonical identities come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IdentityBackend {
    /// Layers computed by this crate, prefixed `ChemLink=1/`.
    #[default]
    Native,
    /// Standard InChI from RDKit. Needs the `rdkit` feature.
    Rdkit,
}

/// Tunables for [`ChemToolkit`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ToolkitConfig {
    pub fingerprint_radius: usize,
    pub fingerprint_bits: usize,
    pub inchi: InchiOptions,
    pub identity_backend: IdentityBackend,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        ToolkitConfig {
            fingerprint_radius: DEFAULT_FINGERPRINT_RADIUS,
            fingerprint_bits: DEFAULT_FINGERPRINT_BITS,
            inchi: InchiOptions::default(),
            identity_backend: IdentityBackend::default(),
        }
    }
}

/// Chemistry service: structure notation in, identities and fingerprints out.
///
/// # Example
///
/// ```
/// use chemlink_chem::{ChemToolkit, ToolkitConfig};
///
/// let toolkit = ChemToolkit::new(ToolkitConfig::default()).unwrap();
/// let id = toolkit.to_canonical_identity(Some("CCO")).unwrap();
/// assert_eq!(Some(id), toolkit.to_canonical_identity(Some("OCC")));
/// assert_eq!(toolkit.to_canonical_identity(Some("not a molecule")), None);
/// ```
#[derive(Debug, Clone)]
pub struct ChemToolkit {
    config: ToolkitConfig,
}

impl ChemToolkit {
    pub fn new(config: ToolkitConfig) -> Result<Self> {
        if config.fingerprint_bits == 0 {
            return Err(ChemlinkError::Config("fingerprint_bits must be positive".into()));
        }
        if config.identity_backend == IdentityBackend::Rdkit && !cfg!(feature = "rdkit") {
            return Err(ChemlinkError::Config("the rdkit identity backend needs the `rdkit` feature".into()));
        }
        Ok(ChemToolkit { config })
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    /// Parse structure notation with explicit hydrogens folded away.
    pub fn parse(&self, notation: &str) -> Result<Molecule> {
        parse_smiles(notation)
            .map(|mol| mol.without_explicit_hydrogens())
            .map_err(|e| ChemlinkError::StructureParse {
                notation: notation.to_string(),
                reason: e.to_string(),
            })
    }

    /// Canonical identity for a structure notation.
    ///
    /// Absent input, blank input and anything that fails to parse all map to
    /// `None`; the failure is logged at debug level and never propagated.
    pub fn to_canonical_identity(&self, notation: Option<&str>) -> Option<CanonicalIdentity> {
        let notation = notation.map(str::trim).filter(|s| !s.is_empty())?;
        let result = match self.config.identity_backend {
            IdentityBackend::Native => {
                self.parse(notation).and_then(|mol| molecule_to_identity(&mol, &self.config.inchi))
            }
            IdentityBackend::Rdkit => external_identity(notation),
        };
        match result {
            Ok(identity) => Some(identity),
            Err(e) => {
                debug!(notation, error = %e, "structure not canonicalized");
                None
            }
        }
    }

    /// Identity hash for a canonical identity, `None` if the identity is malformed.
    pub fn to_identity_hash(&self, identity: &CanonicalIdentity) -> Option<IdentityHash> {
        match identity_to_hash(identity.as_str()) {
            Ok(hash) => Some(hash),
            Err(e) => {
                debug!(identity = identity.as_str(), error = %e, "identity not hashed");
                None
            }
        }
    }

    /// Morgan fingerprint with the configured radius and length.
    pub fn fingerprint(&self, mol: &Molecule) -> Result<Fingerprint> {
        morgan_fingerprint(mol, self.config.fingerprint_radius, self.config.fingerprint_bits)
    }

    /// Parse and fingerprint in one step.
    pub fn fingerprint_notation(&self, notation: &str) -> Result<Fingerprint> {
        self.fingerprint(&self.parse(notation)?)
    }

    pub fn similarity(&self, a: &Fingerprint, b: &Fingerprint) -> Result<f64> {
        tanimoto_similarity(a, b)
    }
}

#[cfg(feature = "rdkit")]
fn external_identity(notation: &str) -> Result<CanonicalIdentity> {
    crate::rdkit::standard_inchi(notation)
}

#[cfg(not(feature = "rdkit"))]
fn external_identity(_notation: &str) -> Result<CanonicalIdentity> {
    Err(ChemlinkError::Config("built without the `rdkit` feature".into()))
}
