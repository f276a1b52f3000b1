use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::error::{AnalysisError, Result};

/// One interaction row: two identifiers and the confidence score found in
/// the header's last column.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeList {
    /// Header names with surrounding whitespace removed.
    pub columns: Vec<String>,
    pub edges: Vec<EdgeRecord>,
}

impl EdgeList {
    pub fn score_column(&self) -> &str {
        self.columns.last().map(String::as_str).unwrap_or_default()
    }

    pub fn filtered(&self, threshold: f64) -> EdgeList {
        EdgeList {
            columns: self.columns.clone(),
            edges: filter_edges(&self.edges, threshold),
        }
    }
}

pub fn read_edges(path: &Path) -> Result<EdgeList> {
    let file = File::open(path).map_err(|e| AnalysisError::io(path, e))?;
    let list = read_edges_from(file)?;
    debug!(
        path = %path.display(),
        rows = list.edges.len(),
        "read edge list"
    );
    Ok(list)
}

/// Reads a tab separated edge list. Column 0 is the source, column 1 the
/// target and the header's last column the confidence score. Short rows that
/// stop before the score column have no score and are skipped.
pub fn read_edges_from<R: Read>(reader: R) -> Result<EdgeList> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.len() < 3 {
        return Err(AnalysisError::MissingColumns {
            found: columns.len(),
        });
    }

    let score_index = columns.len() - 1;
    let mut edges = Vec::new();
    let mut unscored = 0usize;
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let Some(raw) = record.get(score_index) else {
            unscored += 1;
            continue;
        };
        let score = match raw.trim().parse::<f64>() {
            Ok(score) if !score.is_nan() => score,
            _ => {
                return Err(AnalysisError::InvalidScore {
                    line,
                    value: raw.to_string(),
                })
            }
        };

        edges.push(EdgeRecord {
            source: record[0].to_string(),
            target: record[1].to_string(),
            score,
        });
    }

    if unscored > 0 {
        debug!(rows = unscored, "skipped rows without a score");
    }
    Ok(EdgeList { columns, edges })
}

/// Keeps the rows whose score reaches `threshold`, in their original order.
pub fn filter_edges(edges: &[EdgeRecord], threshold: f64) -> Vec<EdgeRecord> {
    edges
        .iter()
        .filter(|edge| edge.score >= threshold)
        .cloned()
        .collect()
}
