//! Flat-file acquisition of pathway sources.
//!
//! Each database is a `.gmt` file: one pathway per line, tab separated as
//! `pathway_id  pathway_name  gene  gene ...`. The file stem names the source.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::traits::SourceProvider;
use crate::types::Source;

#[derive(Debug, Clone)]
pub struct GmtSourceProvider {
    name: String,
    path: PathBuf,
}

impl GmtSourceProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        Self { name, path }
    }

    pub fn with_name(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), path: path.into() }
    }

    pub fn path(&self) -> &Path { &self.path }

    fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))
    }
}

impl SourceProvider for GmtSourceProvider {
    fn name(&self) -> &str { &self.name }

    /// Non-empty regular file. Whitespace-only files pass here and load as an empty source.
    fn is_populated(&self) -> Result<bool> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.is_file() && meta.len() > 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }

    fn load(&self) -> Result<Source> { parse_gmt(&self.name, &self.read()?, &self.path) }
}

/// Parses GMT text into a source. Blank lines and blank gene fields are skipped.
pub fn parse_gmt(name: &str, content: &str, origin: &Path) -> Result<Source> {
    let mut source = Source::new(name);
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() { continue; }
        let mut fields = line.split('\t');
        let (Some(id), Some(pathway_name)) = (fields.next(), fields.next()) else {
            return Err(Error::InvalidInput(format!(
                "{}:{}: expected at least pathway id and name", origin.display(), line_no + 1
            )));
        };
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::InvalidInput(format!("{}:{}: empty pathway id", origin.display(), line_no + 1)));
        }
        let genes = fields.map(str::trim).filter(|g| !g.is_empty());
        source.insert_pathway(id, pathway_name.trim(), genes);
    }
    Ok(source)
}

/// Lists `.gmt` files under `root`, sorted by path.
pub fn discover_providers(root: &Path) -> Result<Vec<GmtSourceProvider>> {
    if !root.is_dir() {
        return Err(Error::InvalidInput(format!("input directory {} does not exist", root.display())));
    }
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
            Error::io(path, e.into())
        })?;
        if !entry.file_type().is_file() { continue; }
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("gmt") { files.push(path.to_path_buf()); }
    }
    files.sort();
    Ok(files.into_iter().map(GmtSourceProvider::new).collect())
}

/// Loads every populated provider, in provider order. Unpopulated ones are skipped.
pub fn load_sources<P: SourceProvider>(providers: &[P]) -> Result<Vec<Source>> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();
    for provider in providers {
        let name = provider.name();
        info!(source = name, "loading source");
        if !seen.insert(name.to_string()) {
            return Err(Error::InvalidInput(format!("duplicate source name '{name}'")));
        }
        if !provider.is_populated()? {
            warn!(source = name, "not populated");
            continue;
        }
        info!(source = name, "getting pathways");
        let source = provider.load()?;
        if source.is_empty() {
            warn!(source = name, "not populated");
            continue;
        }
        source.validate()?;
        info!(source = name, pathways = source.len(), "loaded source");
        sources.push(source);
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_gmt_reads_ids_names_and_genes() {
        let text = "hsa00010\tGlycolysis\tHK1\tPFKM\n\nhsa00020\tTCA cycle\tCS\t\tIDH1\r\n";
        let source = parse_gmt("kegg", text, Path::new("kegg.gmt")).expect("parse");
        assert_eq!(source.len(), 2);
        assert_eq!(source.pathway_name("hsa00020").ok(), Some("TCA cycle"));
        assert_eq!(source.gene_sets["hsa00020"].iter().collect::<Vec<_>>(), vec!["CS", "IDH1"]);
    }

    #[test]
    fn parse_gmt_rejects_line_without_name() {
        let err = parse_gmt("kegg", "hsa00010\n", Path::new("kegg.gmt")).expect_err("must fail");
        assert!(matches!(err, Error::InvalidInput(msg) if msg.contains("kegg.gmt:1")));
    }

    #[test]
    fn populated_checks_size_without_parsing() {
        let tmp = tempfile::tempdir().unwrap();
        let empty = tmp.path().join("empty.gmt");
        let full = tmp.path().join("full.gmt");
        fs::write(&empty, "").unwrap();
        fs::write(&full, "not even valid gmt").unwrap();
        assert!(!GmtSourceProvider::new(&empty).is_populated().unwrap());
        assert!(GmtSourceProvider::new(&full).is_populated().unwrap());
        assert!(!GmtSourceProvider::new(tmp.path()).is_populated().unwrap());
    }

    #[test]
    fn pathway_without_genes_is_kept_with_empty_set() {
        let source = parse_gmt("kegg", "hsa1\tEmpty\n", Path::new("kegg.gmt")).expect("parse");
        assert!(source.gene_sets["hsa1"].is_empty());
    }
}
