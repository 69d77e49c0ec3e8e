//! Pipeline configuration, loaded from JSON.
//!
//! Every field has a default matching the layout of the public Drug Central,
//! SGC donated probes, Chemical Probes Portal and EUbOPEN catalog exports, so
//! a configuration file only needs to name what differs.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chemlink_chem::ToolkitConfig;
use chemlink_core::{ChemlinkError, Result};
use serde::{Deserialize, Serialize};

use crate::overlap::OverlapMode;
use crate::rank::DEFAULT_TOP_N;
use crate::record::LABEL_DELIMITER;

/// How to read one source table and which columns the normalizer uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSpec {
    pub label: String,
    pub path: PathBuf,
    pub smiles_column: String,
    pub name_column: String,
    pub id_column: Option<String>,
    /// Raw lines to skip before the header.
    pub skip_rows: usize,
    /// Drop rows without a structure before canonicalization.
    pub require_structure: bool,
    /// Drop rows with neither a structure nor a name.
    pub skip_blank_rows: bool,
}

impl Default for SourceSpec {
    fn default() -> Self {
        SourceSpec {
            label: String::new(),
            path: PathBuf::new(),
            smiles_column: "SMILES".into(),
            name_column: "Name".into(),
            id_column: None,
            skip_rows: 0,
            require_structure: false,
            skip_blank_rows: true,
        }
    }
}

impl SourceSpec {
    pub fn new(label: &str, smiles_column: &str, name_column: &str) -> Self {
        SourceSpec {
            label: label.into(),
            smiles_column: smiles_column.into(),
            name_column: name_column.into(),
            ..SourceSpec::default()
        }
    }
}

/// Drug compounds, their approval list and drug-target records.
///
/// The compound table is flagged against the approval list, the target
/// table is left-joined onto it, and the joined table is normalized with
/// `source`. The file name of its `path` names the file the joined table
/// is written to inside the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrugSourceConfig {
    pub compounds_path: PathBuf,
    /// Headerless two-column list of approved IDs and names.
    pub approved_path: PathBuf,
    pub targets_path: PathBuf,
    pub id_column: String,
    pub approved_columns: Vec<String>,
    pub target_id_column: String,
    pub dropped_columns: Vec<String>,
    pub source: SourceSpec,
}

impl Default for DrugSourceConfig {
    fn default() -> Self {
        DrugSourceConfig {
            compounds_path: "DC_Compounds.csv".into(),
            approved_path: "FDA_Approved.csv".into(),
            targets_path: "Drug_Target.csv".into(),
            id_column: "ID".into(),
            approved_columns: vec!["ID".into(), "Drug Name".into()],
            target_id_column: "STRUCT_ID".into(),
            dropped_columns: vec!["Drug Name".into(), "INN".into()],
            source: SourceSpec {
                path: "drug_central.csv".into(),
                ..SourceSpec::new("Drug Central", "SMILES", "DRUG_NAME")
            },
        }
    }
}

/// Virtual compound catalog used as the ranking candidate pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSpec {
    pub path: PathBuf,
    pub inchi_column: String,
    pub smiles_column: String,
    pub name_column: String,
    /// Also match rows whose SMILES canonicalizes to an aggregated identity.
    pub match_structures: bool,
}

impl Default for CatalogSpec {
    fn default() -> Self {
        CatalogSpec {
            path: "compounds_cv.csv".into(),
            inchi_column: "Compound InChi".into(),
            smiles_column: "Compound SMILES".into(),
            name_column: "Virtual Compound Preferred Name".into(),
            match_structures: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlapConfig {
    /// Joined label strings, e.g. `"SGC, Chemical Probes"`.
    pub wanted: Vec<String>,
    pub mode: OverlapMode,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        OverlapConfig {
            wanted: vec!["Drug Central, Chemical Probes".into(), "SGC, Chemical Probes".into()],
            mode: OverlapMode::Literal,
        }
    }
}

impl OverlapConfig {
    pub fn wanted_set(&self) -> BTreeSet<String> {
        self.wanted.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub query: Option<String>,
    pub top_n: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        RankingConfig { query: Some("CCO".into()), top_n: DEFAULT_TOP_N }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub drug_source: Option<DrugSourceConfig>,
    /// Additional sources, aggregated after the drug source in this order.
    pub sources: Vec<SourceSpec>,
    pub catalog: Option<CatalogSpec>,
    pub overlap: OverlapConfig,
    pub ranking: RankingConfig,
    pub toolkit: ToolkitConfig,
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            drug_source: Some(DrugSourceConfig::default()),
            sources: vec![
                SourceSpec {
                    path: "SGC_Compounds.csv".into(),
                    skip_rows: 1,
                    require_structure: true,
                    ..SourceSpec::new("SGC", "SMILES (unique cis trans)", "Compound name")
                },
                SourceSpec {
                    path: "ChemicalProbesPortal.csv".into(),
                    ..SourceSpec::new("Chemical Probes", "SMILES", "Probe name")
                },
            ],
            catalog: Some(CatalogSpec::default()),
            overlap: OverlapConfig::default(),
            ranking: RankingConfig::default(),
            toolkit: ToolkitConfig::default(),
            output_dir: "output".into(),
        }
    }
}

impl PipelineConfig {
    /// Load from a JSON file. Relative paths are resolved against the
    /// directory holding the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ChemlinkError::Io(std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))
        })?;
        let mut config = Self::from_json(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Parse and validate a JSON document without touching paths.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Sources in aggregation order: the drug source first, then the rest.
    pub fn source_specs(&self) -> Vec<&SourceSpec> {
        self.drug_source
            .iter()
            .map(|d| &d.source)
            .chain(self.sources.iter())
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let specs = self.source_specs();
        if specs.is_empty() {
            return Err(ChemlinkError::Config("no sources configured".into()));
        }
        let mut seen = BTreeSet::new();
        for spec in &specs {
            if spec.label.is_empty() {
                return Err(ChemlinkError::Config("source label must not be empty".into()));
            }
            if spec.label.contains(LABEL_DELIMITER) {
                return Err(ChemlinkError::Config(format!(
                    "source label '{}' contains the label delimiter '{LABEL_DELIMITER}'",
                    spec.label
                )));
            }
            if !seen.insert(spec.label.as_str()) {
                return Err(ChemlinkError::Config(format!("duplicate source label '{}'", spec.label)));
            }
        }
        for combo in &self.overlap.wanted {
            let parts: Vec<&str> = combo.split(LABEL_DELIMITER).collect();
            if parts.len() < 2 {
                return Err(ChemlinkError::Config(format!(
                    "overlap combination '{combo}' names fewer than two sources"
                )));
            }
            if let Some(unknown) = parts.iter().find(|p| !seen.contains(*p)) {
                return Err(ChemlinkError::Config(format!(
                    "overlap combination '{combo}' names unknown source '{unknown}'"
                )));
            }
        }
        if self.toolkit.fingerprint_bits == 0 {
            return Err(ChemlinkError::Config("fingerprint_bits must be positive".into()));
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        if let Some(drug) = &mut self.drug_source {
            resolve(&mut drug.compounds_path);
            resolve(&mut drug.approved_path);
            resolve(&mut drug.targets_path);
        }
        for spec in &mut self.sources {
            resolve(&mut spec.path);
        }
        if let Some(catalog) = &mut self.catalog {
            resolve(&mut catalog.path);
        }
        resolve(&mut self.output_dir);
    }
}
