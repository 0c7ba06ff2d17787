//! Exhaustive pairwise comparison of pathway sources.

use std::collections::HashSet;
use std::path::Path;

use compath_core::config::{DEFAULT_MIN_GENE_SET_SIMILARITY, DEFAULT_MIN_STRING_SIMILARITY};
use compath_core::traits::{NoProgress, ProgressObserver, ReportSink};
use compath_core::types::{ComparisonPair, ScoreRow, SimilarityMatrices, SimilarityReport, Source};
use compath_core::{Error, Result};
use tracing::info;

use crate::report::TsvReportWriter;
use crate::scoring::{overlap, string_similarity};

/// Threshold pair applied to every comparison.
///
/// Rows scoring strictly below a threshold are dropped. Values outside
/// `[0, 1]` are not rejected: below zero keeps everything, above one keeps
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityEngine {
    pub min_gene_set_similarity: f64,
    pub min_string_similarity: f64,
}

impl Default for SimilarityEngine {
    fn default() -> Self {
        Self {
            min_gene_set_similarity: DEFAULT_MIN_GENE_SET_SIMILARITY,
            min_string_similarity: DEFAULT_MIN_STRING_SIMILARITY,
        }
    }
}

impl SimilarityEngine {
    pub fn new(min_gene_set_similarity: f64, min_string_similarity: f64) -> Self {
        Self { min_gene_set_similarity, min_string_similarity }
    }

    /// Scores every unordered pair of sources in input order and hands each
    /// report to `sink` as soon as it is built. Reports emitted before a
    /// failure stay emitted.
    pub fn compute<S, O>(&self, sources: &[Source], sink: &mut S, observer: &mut O) -> Result<SimilarityMatrices>
    where
        S: ReportSink + ?Sized,
        O: ProgressObserver + ?Sized,
    {
        ensure_unique_names(sources)?;
        let mut matrices = SimilarityMatrices::default();
        for (i, a) in sources.iter().enumerate() {
            for b in &sources[i + 1..] {
                info!(a = %a.name, b = %b.name, "calculating similarities");
                let report = self.compare(a, b, observer)?;
                sink.emit(&report)?;
                matrices.push(report);
            }
        }
        Ok(matrices)
    }

    /// Builds the report for one pair, scoring the full cross-product of pathways.
    pub fn compare<O>(&self, a: &Source, b: &Source, observer: &mut O) -> Result<SimilarityReport>
    where
        O: ProgressObserver + ?Sized,
    {
        let pair = ComparisonPair::new(a.name.as_str(), b.name.as_str());
        let name_similarity = string_similarity(&a.name, &b.name);
        let names_pass = name_similarity >= self.min_string_similarity;
        observer.on_pair_start(&pair, (a.len() as u64) * (b.len() as u64));

        let mut rows = Vec::new();
        for (a_id, a_set) in &a.gene_sets {
            for (b_id, b_set) in &b.gene_sets {
                observer.on_pathway_pair();
                let gene_set_similarity = overlap(a_set, b_set)?;
                if gene_set_similarity < self.min_gene_set_similarity || !names_pass { continue; }
                rows.push(ScoreRow {
                    pathway_id_a: a_id.clone(),
                    pathway_name_a: a.pathway_name(a_id)?.to_string(),
                    pathway_id_b: b_id.clone(),
                    pathway_name_b: b.pathway_name(b_id)?.to_string(),
                    gene_set_similarity,
                    string_similarity: name_similarity,
                });
            }
        }
        observer.on_pair_finish(&pair, rows.len());
        Ok(SimilarityReport::new(pair, rows))
    }
}

fn ensure_unique_names(sources: &[Source]) -> Result<()> {
    let mut seen = HashSet::new();
    for source in sources {
        if !seen.insert(source.name.as_str()) {
            return Err(Error::InvalidInput(format!("duplicate source name '{}'", source.name)));
        }
    }
    Ok(())
}

/// Computes all similarity reports and writes one TSV per pair into `directory`.
pub fn make_similarity_matrices(
    sources: &[Source],
    directory: &Path,
    min_gene_set_similarity: f64,
    min_string_similarity: f64,
) -> Result<SimilarityMatrices> {
    let mut writer = TsvReportWriter::new(directory);
    SimilarityEngine::new(min_gene_set_similarity, min_string_similarity).compute(sources, &mut writer, &mut NoProgress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collect(Vec<ComparisonPair>);

    impl ReportSink for Collect {
        fn emit(&mut self, report: &SimilarityReport) -> Result<()> {
            self.0.push(report.pair.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct Count { started: u64, ticks: u64, finished: usize }

    impl ProgressObserver for Count {
        fn on_pair_start(&mut self, _pair: &ComparisonPair, total: u64) { self.started += total; }
        fn on_pathway_pair(&mut self) { self.ticks += 1; }
        fn on_pair_finish(&mut self, _pair: &ComparisonPair, _rows: usize) { self.finished += 1; }
    }

    fn source(name: &str, pathways: &[(&str, &[&str])]) -> Source {
        let mut s = Source::new(name);
        for (id, genes) in pathways { s.insert_pathway(*id, format!("{id} pathway"), genes.iter().copied()); }
        s
    }

    #[test]
    fn pairs_enumerated_once_in_input_order() {
        let sources = vec![source("x", &[("p", &["A"])]), source("y", &[("q", &["A"])]), source("z", &[("r", &["A"])])];
        let mut sink = Collect::default();
        let matrices = SimilarityEngine::new(0.0, 0.0).compute(&sources, &mut sink, &mut NoProgress).unwrap();
        let expected = vec![ComparisonPair::new("x", "y"), ComparisonPair::new("x", "z"), ComparisonPair::new("y", "z")];
        assert_eq!(sink.0, expected);
        assert_eq!(matrices.iter().map(|r| r.pair.clone()).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn observer_sees_every_pathway_pair() {
        let sources = vec![source("x", &[("p1", &["A"]), ("p2", &["B"])]), source("y", &[("q1", &["A"]), ("q2", &["C"]), ("q3", &["B"])])];
        let mut count = Count::default();
        SimilarityEngine::default().compute(&sources, &mut Collect::default(), &mut count).unwrap();
        assert_eq!(count.started, 6);
        assert_eq!(count.ticks, 6);
        assert_eq!(count.finished, 1);
    }

    #[test]
    fn string_threshold_drops_whole_pair() {
        let sources = vec![source("kegg", &[("p", &["A"])]), source("msig", &[("q", &["A"])])];
        let matrices = SimilarityEngine::new(0.0, 0.9).compute(&sources, &mut Collect::default(), &mut NoProgress).unwrap();
        let report = matrices.get("kegg", "msig").unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn string_similarity_is_constant_per_pair() {
        let sources = vec![source("kegg", &[("p1", &["A"]), ("p2", &["A", "B"])]), source("keggx", &[("q", &["A"])])];
        let matrices = SimilarityEngine::new(0.0, 0.0).compute(&sources, &mut Collect::default(), &mut NoProgress).unwrap();
        let report = matrices.get("kegg", "keggx").unwrap();
        assert_eq!(report.len(), 2);
        let expected = string_similarity("kegg", "keggx");
        assert!(report.rows.iter().all(|r| r.string_similarity == expected));
    }

    #[test]
    fn empty_gene_set_aborts_even_when_names_fail_threshold() {
        let sources = vec![source("x", &[("p", &[])]), source("y", &[("q", &["A"])])];
        let result = SimilarityEngine::new(0.0, 2.0).compute(&sources, &mut Collect::default(), &mut NoProgress);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn missing_name_is_fatal() {
        let mut x = source("x", &[("p", &["A"])]);
        x.pathway_names.clear();
        let sources = vec![x, source("y", &[("q", &["A"])])];
        let result = SimilarityEngine::new(0.0, 0.0).compute(&sources, &mut Collect::default(), &mut NoProgress);
        assert!(matches!(result, Err(Error::MissingPathwayName { .. })));
    }

    #[test]
    fn duplicate_names_rejected() {
        let sources = vec![source("x", &[("p", &["A"])]), source("x", &[("q", &["A"])])];
        let result = SimilarityEngine::default().compute(&sources, &mut Collect::default(), &mut NoProgress);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
