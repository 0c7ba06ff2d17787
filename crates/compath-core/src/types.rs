//! Domain types shared by the loader, the similarity engine and the report emitter.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};

pub type PathwayId = String;
pub type GeneSet = BTreeSet<String>;

/// A named database contributing pathway data.
///
/// - `name`: unique key of the source, used in report file and column names
/// - `gene_sets`: pathway id to the gene symbols it contains
/// - `pathway_names`: pathway id to display name, same key domain as `gene_sets`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub gene_sets: BTreeMap<PathwayId, GeneSet>,
    pub pathway_names: BTreeMap<PathwayId, String>,
}

impl Source {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Adds a pathway, merging genes into an existing entry with the same id.
    /// The first display name seen for an id wins.
    pub fn insert_pathway<I, S>(&mut self, id: impl Into<PathwayId>, name: impl Into<String>, genes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        self.pathway_names.entry(id.clone()).or_insert_with(|| name.into());
        self.gene_sets.entry(id).or_default().extend(genes.into_iter().map(Into::into));
    }

    pub fn len(&self) -> usize { self.gene_sets.len() }

    pub fn is_empty(&self) -> bool { self.gene_sets.is_empty() }

    pub fn pathway_name(&self, pathway_id: &str) -> Result<&str> {
        self.pathway_names.get(pathway_id).map(String::as_str).ok_or_else(|| Error::MissingPathwayName {
            source_name: self.name.clone(),
            pathway_id: pathway_id.to_string(),
        })
    }

    /// Checks that every pathway with a gene set also has a display name.
    pub fn validate(&self) -> Result<()> {
        for id in self.gene_sets.keys() { self.pathway_name(id)?; }
        Ok(())
    }
}

/// An unordered pair of distinct source names, stored in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComparisonPair {
    pub a: String,
    pub b: String,
}

impl ComparisonPair {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self { Self { a: a.into(), b: b.into() } }

    pub fn file_name(&self) -> String { format!("{}_{}.tsv", self.a, self.b) }

    pub fn columns(&self) -> [String; 6] {
        [
            format!("{}_id", self.a),
            format!("{}_name", self.a),
            format!("{}_id", self.b),
            format!("{}_name", self.b),
            "gene_set_similarity".to_string(),
            "string_similarity".to_string(),
        ]
    }
}

/// One pathway-pair that passed both thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    pub pathway_id_a: PathwayId,
    pub pathway_name_a: String,
    pub pathway_id_b: PathwayId,
    pub pathway_name_b: String,
    pub gene_set_similarity: f64,
    pub string_similarity: f64,
}

/// Sorted score rows for one comparison pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityReport {
    pub pair: ComparisonPair,
    pub rows: Vec<ScoreRow>,
}

impl SimilarityReport {
    /// Builds a report, ordering rows by `pathway_id_a` then `gene_set_similarity`, both descending.
    pub fn new(pair: ComparisonPair, mut rows: Vec<ScoreRow>) -> Self {
        rows.sort_by(report_order);
        Self { pair, rows }
    }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

fn report_order(x: &ScoreRow, y: &ScoreRow) -> Ordering {
    y.pathway_id_a
        .cmp(&x.pathway_id_a)
        .then_with(|| y.gene_set_similarity.total_cmp(&x.gene_set_similarity))
}

/// Reports for every comparison pair, in pair enumeration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityMatrices {
    reports: Vec<SimilarityReport>,
}

impl SimilarityMatrices {
    pub fn push(&mut self, report: SimilarityReport) { self.reports.push(report); }

    pub fn get(&self, a: &str, b: &str) -> Option<&SimilarityReport> {
        self.reports.iter().find(|r| r.pair.a == a && r.pair.b == b)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimilarityReport> { self.reports.iter() }

    pub fn len(&self) -> usize { self.reports.len() }

    pub fn is_empty(&self) -> bool { self.reports.is_empty() }
}
