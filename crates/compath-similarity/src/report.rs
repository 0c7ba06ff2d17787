//! Tab-separated report files, one per comparison pair.

use std::borrow::Cow;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use compath_core::traits::ReportSink;
use compath_core::types::SimilarityReport;
use compath_core::{Error, Result};
use tracing::debug;

/// Writes `{directory}/{a}_{b}.tsv`, creating `directory` if needed and
/// replacing any existing file. Returns the written path.
pub fn write_report(report: &SimilarityReport, directory: &Path) -> Result<PathBuf> {
    fs::create_dir_all(directory).map_err(|e| Error::io(directory, e))?;
    let path = directory.join(report.pair.file_name());
    let file = fs::File::create(&path).map_err(|e| Error::io(&path, e))?;
    let mut out = BufWriter::new(file);
    write_tsv(report, &mut out).and_then(|()| out.flush()).map_err(|e| Error::io(&path, e))?;
    debug!(path = %path.display(), rows = report.len(), "wrote report");
    Ok(path)
}

/// Serializes a report: one header line, then one line per row in report order.
pub fn write_tsv<W: Write>(report: &SimilarityReport, out: &mut W) -> std::io::Result<()> {
    let header: Vec<String> = report.pair.columns().iter().map(|c| escape_field(c).into_owned()).collect();
    writeln!(out, "{}", header.join("\t"))?;
    for row in &report.rows {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            escape_field(&row.pathway_id_a),
            escape_field(&row.pathway_name_a),
            escape_field(&row.pathway_id_b),
            escape_field(&row.pathway_name_b),
            format_float(row.gene_set_similarity),
            format_float(row.string_similarity),
        )?;
    }
    Ok(())
}

/// Quotes fields holding a tab, line break or quote; inner quotes are doubled.
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains(['\t', '\n', '\r', '"']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Shortest round-trip form, keeping `.0` on integral values. Small values use
/// Rust exponent notation (`1e-5`), unlike pandas' `1e-05`.
fn format_float(value: f64) -> String { format!("{value:?}") }

/// Report sink that persists every report under one directory.
#[derive(Debug, Clone)]
pub struct TsvReportWriter {
    directory: PathBuf,
    written: Vec<PathBuf>,
}

impl TsvReportWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self { Self { directory: directory.into(), written: Vec::new() } }

    pub fn directory(&self) -> &Path { &self.directory }

    /// Paths written so far, in emission order.
    pub fn written(&self) -> &[PathBuf] { &self.written }
}

impl ReportSink for TsvReportWriter {
    fn emit(&mut self, report: &SimilarityReport) -> Result<()> {
        let path = write_report(report, &self.directory)?;
        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compath_core::types::{ComparisonPair, ScoreRow};

    fn report() -> SimilarityReport {
        SimilarityReport::new(
            ComparisonPair::new("kegg", "reactome"),
            vec![ScoreRow {
                pathway_id_a: "hsa04210".into(),
                pathway_name_a: "Apoptosis".into(),
                pathway_id_b: "R-HSA-109581".into(),
                pathway_name_b: "Apoptosis\tcore \"set\"".into(),
                gene_set_similarity: 1.0,
                string_similarity: 2.0 / 3.0,
            }],
        )
    }

    #[test]
    fn tsv_layout() {
        let mut buf = Vec::new();
        write_tsv(&report(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "kegg_id\tkegg_name\treactome_id\treactome_name\tgene_set_similarity\tstring_similarity");
        assert_eq!(lines[1], "hsa04210\tApoptosis\tR-HSA-109581\t\"Apoptosis\tcore \"\"set\"\"\"\t1.0\t0.6666666666666666");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn float_formatting() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(1e-5), "1e-5");
    }

    #[test]
    fn empty_report_has_header_only() {
        let empty = SimilarityReport::new(ComparisonPair::new("a", "b"), vec![]);
        let mut buf = Vec::new();
        write_tsv(&empty, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a_id\ta_name\tb_id\tb_name\tgene_set_similarity\tstring_similarity\n");
    }

    #[test]
    fn writer_creates_nested_directory_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested/out");
        let mut writer = TsvReportWriter::new(&dir);
        writer.emit(&report()).unwrap();
        writer.emit(&report()).unwrap();
        assert_eq!(writer.written().len(), 2);
        let text = fs::read_to_string(dir.join("kegg_reactome.tsv")).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
