//! Cross-source compound integration.
//!
//! Compound tables from several public sources are reduced to one
//! canonical identity per structure, merged into a single table that
//! records which sources carry each compound, filtered to chosen source
//! combinations, and used as a candidate pool for fingerprint similarity
//! search.
//!
//! - [`normalize`]: per-source (identity, name) rows, first occurrence wins
//! - [`aggregate`]: identity-keyed fold with lock-step labels and names
//! - [`overlap`]: selection by joined source combination
//! - [`rank`]: Morgan/Tanimoto top-N search
//! - [`approval`], [`catalog`], [`join`]: the table joins around them
//! - [`pipeline`]: the whole run, driven by a [`PipelineConfig`]
//!
//! ```
//! use chemlink::{aggregate, normalize_records, select_overlap, CompoundRecord, SourceSpec};
//! use chemlink_chem::{ChemToolkit, ToolkitConfig};
//!
//! let toolkit = ChemToolkit::new(ToolkitConfig::default()).unwrap();
//! let a = normalize_records(
//!     &[CompoundRecord::new(Some("CCO"), Some("ethanol"))],
//!     &SourceSpec::new("A", "SMILES", "Name"),
//!     &toolkit,
//! );
//! let b = normalize_records(
//!     &[CompoundRecord::new(Some("OCC"), Some("alcohol"))],
//!     &SourceSpec::new("B", "SMILES", "Name"),
//!     &toolkit,
//! );
//! let merged = aggregate(&[a, b]).unwrap();
//! assert_eq!(merged[0].source_labels(), "A, B");
//!
//! let wanted = ["A, B".to_string()].into_iter().collect();
//! assert_eq!(select_overlap(&merged, &wanted).len(), 1);
//! ```

pub mod aggregate;
pub mod approval;
pub mod catalog;
pub mod config;
pub mod join;
pub mod normalize;
pub mod output;
pub mod overlap;
pub mod pipeline;
pub mod rank;
pub mod record;

pub use aggregate::aggregate;
pub use approval::{flag_approved, join_targets, FlaggedCompounds, APPROVED_COLUMN};
pub use catalog::merge_with_aggregates;
pub use config::{CatalogSpec, DrugSourceConfig, OverlapConfig, PipelineConfig, RankingConfig, SourceSpec};
pub use join::{join, JoinKind};
pub use normalize::{normalize_records, normalize_source, records_from_table, LabeledSource, NormalizedRow};
pub use overlap::{select_overlap, select_overlap_with, OverlapMode};
pub use pipeline::{DrugTables, Pipeline, PipelineInputs, PipelineOutput, PipelineReport, SourceReport};
pub use rank::{rank_similar, DEFAULT_TOP_N};
pub use record::{
    AggregatedCompound, CandidateRecord, CompoundRecord, SimilarityMatch, SourceContribution, LABEL_DELIMITER,
};
