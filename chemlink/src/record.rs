//! Record types passed between pipeline stages.

use chemlink_chem::CanonicalIdentity;
use chemlink_core::{Annotated, Scored, Summarizable};
use indexmap::IndexMap;

/// Delimiter between source labels in a joined label string.
pub const LABEL_DELIMITER: &str = ", ";

/// One raw row of a source table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundRecord {
    /// Source-local identifier, when the source has one.
    pub id: Option<String>,
    pub smiles: Option<String>,
    pub name: Option<String>,
    /// Remaining non-missing cells, keyed by column, in table order.
    pub metadata: IndexMap<String, String>,
}

impl CompoundRecord {
    pub fn new(smiles: Option<&str>, name: Option<&str>) -> Self {
        CompoundRecord {
            smiles: smiles.map(str::to_string),
            name: name.map(str::to_string),
            ..CompoundRecord::default()
        }
    }

    /// Neither a structure nor a display name.
    pub fn is_blank(&self) -> bool {
        self.smiles.is_none() && self.name.is_none()
    }
}

/// One source's claim about one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContribution {
    pub identity: Option<CanonicalIdentity>,
    pub label: String,
    pub name: Option<String>,
}

/// Everything the sources say about one identity.
///
/// `labels` and `names` run in lock-step: `names[i]` is the display name
/// contributed by source `labels[i]`. Contributions without a name appear in
/// neither list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedCompound {
    /// `None` groups every record whose structure could not be canonicalized.
    pub identity: Option<CanonicalIdentity>,
    labels: Vec<String>,
    names: Vec<String>,
}

impl AggregatedCompound {
    pub(crate) fn new(identity: Option<CanonicalIdentity>) -> Self {
        AggregatedCompound { identity, labels: Vec::new(), names: Vec::new() }
    }

    pub(crate) fn push(&mut self, label: &str, name: &str) {
        self.labels.push(label.to_string());
        self.names.push(name.to_string());
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Contributing labels joined with `", "` in source order.
    pub fn source_labels(&self) -> String {
        self.labels.join(LABEL_DELIMITER)
    }

    /// Display name from the first contributing source.
    pub fn first_name(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    /// All display names joined with `", "`.
    pub fn joined_names(&self) -> String {
        self.names.join(LABEL_DELIMITER)
    }

    pub fn source_count(&self) -> usize {
        self.labels.len()
    }
}

impl Summarizable for AggregatedCompound {
    fn summary(&self) -> String {
        format!(
            "{} [{}]",
            self.identity.as_ref().map_or("<no structure>", |id| id.as_str()),
            self.source_labels()
        )
    }
}

/// A structure the ranker may return.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidateRecord {
    pub name: Option<String>,
    pub smiles: Option<String>,
}

/// A ranked candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatch {
    pub name: Option<String>,
    pub smiles: String,
    /// Tanimoto coefficient in `[0, 1]`.
    pub similarity: f64,
}

impl Scored for SimilarityMatch {
    fn score(&self) -> f64 {
        self.similarity
    }
}

impl Annotated for SimilarityMatch {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}
