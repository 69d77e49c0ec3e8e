//! Standard InChI from RDKit, called through an embedded Python interpreter.
//!
//! Needs a Python environment where `rdkit` imports. The resulting
//! identities start with `InChI=1S/` and hash to regular InChIKeys.

use chemlink_core::{ChemlinkError, Result};
use pyo3::prelude::*;

use crate::inchi::CanonicalIdentity;

/// Standard InChI for a SMILES string.
pub fn standard_inchi(notation: &str) -> Result<CanonicalIdentity> {
    let inchi = Python::attach(|py| -> PyResult<Option<String>> {
        let chem = py.import("rdkit.Chem")?;
        let mol = chem.call_method1("MolFromSmiles", (notation,))?;
        if mol.is_none() {
            return Ok(None);
        }
        let inchi: String = chem.call_method1("MolToInchi", (mol,))?.extract()?;
        Ok(Some(inchi).filter(|s| !s.is_empty()))
    })
    .map_err(|e| ChemlinkError::StructureParse { notation: notation.to_string(), reason: e.to_string() })?;

    inchi.map(CanonicalIdentity::from_raw).ok_or_else(|| ChemlinkError::StructureParse {
        notation: notation.to_string(),
        reason: "RDKit could not read the structure".into(),
    })
}
