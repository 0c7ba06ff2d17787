use crate::error::Result;
use crate::types::{ComparisonPair, SimilarityReport, Source};

/// A named database that can hand over its pathways.
pub trait SourceProvider {
    fn name(&self) -> &str;
    fn is_populated(&self) -> Result<bool>;
    fn load(&self) -> Result<Source>;
}

/// Hook invoked while a comparison pair is being scored. All methods default to no-ops.
pub trait ProgressObserver {
    fn on_pair_start(&mut self, _pair: &ComparisonPair, _total: u64) {}
    fn on_pathway_pair(&mut self) {}
    fn on_pair_finish(&mut self, _pair: &ComparisonPair, _rows: usize) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Receives each finished report as soon as its comparison pair completes.
pub trait ReportSink {
    fn emit(&mut self, report: &SimilarityReport) -> Result<()>;
}

impl ReportSink for Vec<SimilarityReport> {
    fn emit(&mut self, report: &SimilarityReport) -> Result<()> {
        self.push(report.clone());
        Ok(())
    }
}
