//! Corpus loading and validation.
//!
//! A corpus is an immutable, ordered list of [`QaEntry`] values. It is read
//! once at startup from a JSON file (either `{"qa_pairs": [...]}` or a bare
//! array) or from a directory of such files, and every record is validated
//! before any index is built.
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::{DocId, QaEntry};

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    entries: Vec<QaEntry>,
}

/// Raw record as found on disk; every field optional so a missing field is
/// reported with its record index instead of a generic serde error.
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(alias = "pregunta")]
    question: Option<String>,
    #[serde(alias = "respuesta")]
    answer: Option<String>,
    #[serde(alias = "categoria")]
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCorpus {
    Wrapped { qa_pairs: Vec<RawEntry> },
    Bare(Vec<RawEntry>),
}

impl RawCorpus {
    fn into_entries(self) -> Vec<RawEntry> {
        match self {
            Self::Wrapped { qa_pairs } => qa_pairs,
            Self::Bare(entries) => entries,
        }
    }
}

impl Corpus {
    /// Build a corpus from already-typed entries, validating each one.
    pub fn from_entries(entries: Vec<QaEntry>) -> Result<Self> {
        for (index, e) in entries.iter().enumerate() {
            check_field(index, "question", &e.question)?;
            check_field(index, "answer", &e.answer)?;
            check_field(index, "category", &e.category)?;
        }
        Ok(Self { entries })
    }

    /// Parse a corpus from a JSON string. `origin` is only used in errors.
    pub fn from_json_str(json: &str, origin: &Path) -> Result<Self> {
        let mut entries = Vec::new();
        append_json(json, origin, &mut entries)?;
        Ok(Self { entries })
    }

    /// Load a corpus from a JSON file or a directory of JSON files.
    ///
    /// Directories are walked recursively; files are read in path order and
    /// their records concatenated.
    pub fn load(path: &Path) -> Result<Self> {
        let meta = fs::metadata(path).map_err(|source| Error::CorpusIo { path: path.to_path_buf(), source })?;
        let files = if meta.is_dir() { list_json_files(path)? } else { vec![path.to_path_buf()] };
        if meta.is_dir() && files.is_empty() {
            return Err(Error::NotFound(format!("no .json files under {}", path.display())));
        }
        let mut entries = Vec::new();
        for file in &files {
            let content = fs::read_to_string(file).map_err(|source| Error::CorpusIo { path: file.clone(), source })?;
            let before = entries.len();
            append_json(&content, file, &mut entries)?;
            debug!(file = %file.display(), records = entries.len() - before, "read corpus file");
        }
        info!(path = %path.display(), files = files.len(), entries = entries.len(), "corpus loaded");
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: DocId) -> Option<&QaEntry> {
        self.entries.get(id.0)
    }

    pub fn entries(&self) -> &[QaEntry] {
        &self.entries
    }

    /// Entries paired with their ids, in corpus order.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, &QaEntry)> {
        self.entries.iter().enumerate().map(|(i, e)| (DocId(i), e))
    }

    /// Distinct category values present in the corpus.
    pub fn categories(&self) -> BTreeSet<String> {
        self.entries.iter().map(|e| e.category.clone()).collect()
    }
}

fn append_json(json: &str, origin: &Path, out: &mut Vec<QaEntry>) -> Result<()> {
    let raw: RawCorpus =
        serde_json::from_str(json).map_err(|source| Error::CorpusFormat { path: origin.to_path_buf(), source })?;
    for raw_entry in raw.into_entries() {
        let index = out.len();
        let question = require(index, "question", raw_entry.question)?;
        let answer = require(index, "answer", raw_entry.answer)?;
        let category = require(index, "category", raw_entry.category)?;
        out.push(QaEntry { question, answer, category });
    }
    Ok(())
}

fn require(index: usize, field: &str, value: Option<String>) -> Result<String> {
    let value = value.ok_or_else(|| Error::InvalidRecord { index, reason: format!("missing field `{field}`") })?;
    check_field(index, field, &value)?;
    Ok(value)
}

fn check_field(index: usize, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidRecord { index, reason: format!("field `{field}` is blank") });
    }
    Ok(())
}

/// Every `*.json` file under `root`, sorted. Symlinks are followed and any
/// walk error aborts the load so a directory is never half-read.
fn list_json_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(root).to_path_buf();
            Error::CorpusIo { path, source: err.into() }
        })?;
        let path = entry.into_path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
