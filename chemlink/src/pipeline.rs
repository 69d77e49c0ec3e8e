//! End-to-end orchestration: read sources, normalize, aggregate, select the
//! overlap, rank against the catalog and write every table.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use chemlink_chem::ChemToolkit;
use chemlink_core::{ChemlinkError, Result, Summarizable};
use chemlink_io::{read_csv, write_csv, ReadOptions, Table};
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::approval::{flag_approved, join_targets};
use crate::catalog::merge_with_aggregates;
use crate::config::{DrugSourceConfig, PipelineConfig, SourceSpec};
use crate::normalize::{normalize_source, LabeledSource};
use crate::output::{aggregated_table, hash_table, identity_table, ranking_table};
use crate::overlap::select_overlap_with;
use crate::rank::rank_similar;
use crate::record::{AggregatedCompound, CandidateRecord, SimilarityMatch};

/// Raw tables behind the drug source.
#[derive(Debug, Clone)]
pub struct DrugTables {
    pub compounds: Table,
    pub approved: Table,
    pub targets: Table,
}

/// Every table the pipeline consumes, already loaded.
#[derive(Debug, Clone, Default)]
pub struct PipelineInputs {
    pub drug: Option<DrugTables>,
    /// One table per `PipelineConfig::sources` entry, in the same order.
    pub sources: Vec<Table>,
    pub catalog: Option<Table>,
}

/// Per-source counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub label: String,
    pub rows: usize,
    pub distinct: usize,
    pub unresolved: usize,
}

/// Counts for one run, written next to the outputs as `report.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub sources: Vec<SourceReport>,
    pub approved: Option<usize>,
    pub aggregated: usize,
    pub selected: usize,
    pub candidates: usize,
    pub ranked: usize,
    pub top_similarity: Option<f64>,
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The flagged, target-joined drug table, when a drug source is configured.
    pub drug_table: Option<Table>,
    pub normalized: Vec<LabeledSource>,
    pub aggregated: Vec<AggregatedCompound>,
    pub selected: Vec<AggregatedCompound>,
    pub candidates: Vec<CandidateRecord>,
    pub ranking: Vec<SimilarityMatch>,
    pub report: PipelineReport,
}

pub struct Pipeline {
    config: PipelineConfig,
    toolkit: ChemToolkit,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let toolkit = ChemToolkit::new(config.toolkit.clone())?;
        Ok(Pipeline { config, toolkit })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn toolkit(&self) -> &ChemToolkit {
        &self.toolkit
    }

    /// Run every stage over loaded tables. Touches no files.
    pub fn process(&self, inputs: &PipelineInputs) -> Result<PipelineOutput> {
        if inputs.sources.len() != self.config.sources.len() {
            return Err(ChemlinkError::InvalidInput(format!(
                "expected {} source tables, got {}",
                self.config.sources.len(),
                inputs.sources.len()
            )));
        }

        let mut tables: Vec<(&SourceSpec, &Table)> = Vec::with_capacity(inputs.sources.len() + 1);
        let mut approved = None;
        let drug_table = match (&self.config.drug_source, &inputs.drug) {
            (Some(drug), Some(raw)) => {
                let flagged = flag_approved(&raw.compounds, &raw.approved, &drug.id_column)?;
                approved = Some(flagged.approved);
                let dropped: Vec<&str> = drug.dropped_columns.iter().map(String::as_str).collect();
                Some((drug, join_targets(&raw.targets, &flagged.table, &drug.target_id_column, &drug.id_column, &dropped)?))
            }
            (Some(_), None) => {
                return Err(ChemlinkError::InvalidInput("drug source configured but its tables are missing".into()));
            }
            (None, _) => None,
        };
        if let Some((drug, table)) = &drug_table {
            tables.push((&drug.source, table));
        }
        tables.extend(self.config.sources.iter().zip(&inputs.sources));

        let mut normalized = Vec::with_capacity(tables.len());
        let mut source_reports = Vec::with_capacity(tables.len());
        for (spec, table) in tables {
            debug!(label = %spec.label, table = %table.summary(), "normalizing source");
            let source = normalize_source(table, spec, &self.toolkit)?;
            source_reports.push(SourceReport {
                label: source.label.clone(),
                rows: table.len(),
                distinct: source.rows.len(),
                unresolved: source.unresolved_count(),
            });
            normalized.push(source);
        }

        let aggregated = aggregate(&normalized)?;
        let selected = select_overlap_with(&aggregated, &self.config.overlap.wanted_set(), self.config.overlap.mode);
        info!(aggregated = aggregated.len(), selected = selected.len(), "aggregated sources");
        for compound in &selected {
            debug!(compound = %compound.summary(), "selected");
        }

        let candidates = match (&self.config.catalog, &inputs.catalog) {
            (Some(spec), Some(catalog)) => merge_with_aggregates(catalog, &aggregated, spec, &self.toolkit)?,
            _ => Vec::new(),
        };
        let ranking = match &self.config.ranking.query {
            Some(query) if !candidates.is_empty() => {
                rank_similar(&self.toolkit, query, &candidates, self.config.ranking.top_n)?
            }
            _ => Vec::new(),
        };

        let report = PipelineReport {
            sources: source_reports,
            approved,
            aggregated: aggregated.len(),
            selected: selected.len(),
            candidates: candidates.len(),
            ranked: ranking.len(),
            top_similarity: ranking.first().map(|m| m.similarity),
        };
        Ok(PipelineOutput {
            drug_table: drug_table.map(|(_, table)| table),
            normalized,
            aggregated,
            selected,
            candidates,
            ranking,
            report,
        })
    }

    /// Read the configured files, process them and write the outputs.
    pub fn run(&self) -> Result<PipelineReport> {
        let inputs = self.load_inputs()?;
        let output = self.process(&inputs)?;
        self.write_outputs(&output)?;
        Ok(output.report)
    }

    pub fn load_inputs(&self) -> Result<PipelineInputs> {
        let drug = self.config.drug_source.as_ref().map(load_drug_tables).transpose()?;
        let sources = self
            .config
            .sources
            .iter()
            .map(|spec| read_csv(&spec.path, &ReadOptions::default().skip_rows(spec.skip_rows)))
            .collect::<Result<Vec<_>>>()?;
        let catalog = self
            .config
            .catalog
            .as_ref()
            .map(|spec| read_csv(&spec.path, &ReadOptions::default()))
            .transpose()?;
        Ok(PipelineInputs { drug, sources, catalog })
    }

    pub fn write_outputs(&self, output: &PipelineOutput) -> Result<()> {
        let dir = &self.config.output_dir;
        fs::create_dir_all(dir)?;

        if let (Some(drug), Some(table)) = (&self.config.drug_source, &output.drug_table) {
            write_csv(table, drug_output_path(dir, drug))?;
        }
        write_csv(&aggregated_table(&output.aggregated)?, dir.join("aggregated.csv"))?;
        write_csv(&identity_table("selected_inchi", &output.selected, None)?, dir.join("selected_inchi.csv"))?;
        write_csv(&hash_table("all_inchikey", &output.aggregated, &self.toolkit, false)?, dir.join("all_inchikey.csv"))?;
        write_csv(
            &identity_table("selected_inchikey", &output.selected, Some(&self.toolkit))?,
            dir.join("selected_inchikey.csv"),
        )?;
        write_csv(
            &hash_table("adjusted_inchikey", &output.selected, &self.toolkit, true)?,
            dir.join("adjusted_inchikey.csv"),
        )?;
        if !output.ranking.is_empty() {
            write_csv(&ranking_table(&output.ranking)?, dir.join("ranking.csv"))?;
        }
        write_report(&output.report, &dir.join("report.json"))?;

        info!(dir = %dir.display(), "wrote outputs");
        Ok(())
    }
}

fn load_drug_tables(drug: &DrugSourceConfig) -> Result<DrugTables> {
    Ok(DrugTables {
        compounds: read_csv(&drug.compounds_path, &ReadOptions::default())?,
        approved: read_csv(&drug.approved_path, &ReadOptions::headerless(&drug.approved_columns))?,
        targets: read_csv(&drug.targets_path, &ReadOptions::default())?,
    })
}

/// Where the joined drug table is written: the file name of the drug
/// source path, always inside the output directory.
fn drug_output_path(dir: &Path, drug: &DrugSourceConfig) -> PathBuf {
    let name = drug.source.path.file_name().unwrap_or(OsStr::new(DEFAULT_DRUG_OUTPUT));
    dir.join(name)
}

const DEFAULT_DRUG_OUTPUT: &str = "drug_central.csv";

fn write_report(report: &PipelineReport, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(report)?;
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlapConfig;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::from_rows(
            "t",
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| (!v.is_empty()).then(|| v.to_string())).collect())
                .collect(),
        )
        .unwrap()
    }

    fn two_source_config() -> PipelineConfig {
        PipelineConfig {
            drug_source: None,
            sources: vec![SourceSpec::new("A", "SMILES", "Name"), SourceSpec::new("B", "SMILES", "Name")],
            catalog: None,
            overlap: OverlapConfig { wanted: vec!["A, B".into()], ..OverlapConfig::default() },
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn process_without_files() {
        let pipeline = Pipeline::new(two_source_config()).unwrap();
        let inputs = PipelineInputs {
            sources: vec![
                table(&["SMILES", "Name"], &[&["CCO", "ethanol"], &["C", "methane"]]),
                table(&["SMILES", "Name"], &[&["OCC", "alcohol"]]),
            ],
            ..PipelineInputs::default()
        };
        let out = pipeline.process(&inputs).unwrap();
        assert_eq!(out.aggregated.len(), 2);
        assert_eq!(out.selected.len(), 1);
        assert_eq!(out.selected[0].names(), ["ethanol", "alcohol"]);
        assert_eq!(out.report.sources[1], SourceReport { label: "B".into(), rows: 1, distinct: 1, unresolved: 0 });
        assert!(out.ranking.is_empty());
    }

    #[test]
    fn drug_table_stays_in_output_dir() {
        let dir = Path::new("out");
        let mut drug = DrugSourceConfig::default();
        assert_eq!(drug_output_path(dir, &drug), dir.join("drug_central.csv"));

        drug.source.path = PathBuf::from("/var/tmp/elsewhere/drugs.csv");
        assert_eq!(drug_output_path(dir, &drug), dir.join("drugs.csv"));
        drug.source.path = PathBuf::from("../../drugs.csv");
        assert_eq!(drug_output_path(dir, &drug), dir.join("drugs.csv"));
        drug.source.path = PathBuf::from("..");
        assert_eq!(drug_output_path(dir, &drug), dir.join("drug_central.csv"));
    }

    #[test]
    fn source_count_must_match_config() {
        let pipeline = Pipeline::new(two_source_config()).unwrap();
        let err = pipeline.process(&PipelineInputs::default()).unwrap_err();
        assert!(matches!(err, ChemlinkError::InvalidInput(_)));
    }
}
