use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::parser::{self, Metadata, ParsedDocument};

/// Raw text of one markdown document, keyed by its file name.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub filename: String,
    pub content: String,
}

pub struct LoadedSources {
    pub sources: Vec<SourceFile>,
    /// Files found but unreadable; reported, never fatal.
    pub skipped: Vec<String>,
}

/// Read a single markdown file.
pub fn load_file(path: &Path) -> Result<SourceFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(SourceFile {
        filename: file_name(path),
        content,
    })
}

/// Collect every `*.md` under `root`, sorted by file name.
pub fn load_sources(root: &Path) -> Result<LoadedSources> {
    if !root.is_dir() {
        bail!("Not a directory: {}", root.display());
    }

    let mut sources = Vec::new();
    let mut skipped = Vec::new();

    for entry in WalkDir::new(root).into_iter() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !path.extension().is_some_and(|ext| ext == "md") {
            continue;
        }

        match load_file(path) {
            Ok(source) => {
                debug!("Loaded {} ({} bytes)", source.filename, source.content.len());
                sources.push(source);
            }
            Err(e) => {
                warn!("Skipping {}: {:#}", path.display(), e);
                skipped.push(file_name(path));
            }
        }
    }

    sources.sort_by(|a, b| a.filename.cmp(&b.filename));
    skipped.sort();
    info!("Loaded {} documents ({} skipped) from {}", sources.len(), skipped.len(), root.display());
    Ok(LoadedSources { sources, skipped })
}

/// Parse independently in parallel; output order matches input order.
pub fn parse_sources(sources: &[SourceFile]) -> Vec<ParsedDocument> {
    sources
        .par_iter()
        .map(|s| parser::parse_markdown_document(&s.content, &s.filename))
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── Aggregation ──

/// Many documents combined, with summed counts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub generated_at: DateTime<Utc>,
    pub document_count: usize,
    pub skipped: Vec<String>,
    pub totals: Metadata,
    pub documents: Vec<ParsedDocument>,
}

impl Catalog {
    pub fn build(documents: Vec<ParsedDocument>, skipped: Vec<String>) -> Self {
        let mut totals = Metadata::default();
        for doc in &documents {
            totals.merge(&doc.metadata);
        }
        Catalog {
            generated_at: Utc::now(),
            document_count: documents.len(),
            skipped,
            totals,
            documents,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote catalog with {} documents to {}", self.document_count, path.display());
        Ok(())
    }
}
