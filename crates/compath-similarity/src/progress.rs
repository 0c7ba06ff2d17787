use indicatif::{ProgressBar, ProgressStyle};

use compath_core::traits::ProgressObserver;
use compath_core::types::ComparisonPair;

const TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pathway pairs ({percent}%) {msg}";

/// Terminal progress bar, one per comparison pair.
#[derive(Default)]
pub struct ProgressBarObserver {
    bar: Option<ProgressBar>,
}

impl ProgressBarObserver {
    pub fn new() -> Self { Self::default() }
}

impl ProgressObserver for ProgressBarObserver {
    fn on_pair_start(&mut self, pair: &ComparisonPair, total: u64) {
        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message(format!("{} vs {}", pair.a, pair.b));
        self.bar = Some(pb);
    }

    fn on_pathway_pair(&mut self) {
        if let Some(pb) = &self.bar { pb.inc(1); }
    }

    fn on_pair_finish(&mut self, pair: &ComparisonPair, rows: usize) {
        if let Some(pb) = self.bar.take() {
            pb.finish_with_message(format!("{} vs {}: {} rows", pair.a, pair.b, rows));
        }
    }
}
