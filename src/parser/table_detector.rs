//! Table detection from text alignment.
//!
//! Tables are found without ruling lines: spans are grouped into rows, left
//! edges that recur across rows become column edges, and runs of rows that
//! line up with those edges form a table region.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::model::TableGrid;

use super::backend::RawTable;
use super::layout::TextSpan;

/// Width of the buckets left edges are snapped to.
const EDGE_BUCKET: f32 = 5.0;

/// Distance within which a span counts as aligned to a column edge.
const ALIGN_TOLERANCE: f32 = 5.0;

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Row grouping tolerance as a fraction of font size
    pub y_tolerance_factor: f32,
    /// Minimum fraction of a row's spans that must sit on column edges
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Row<'s> {
    spans: Vec<&'s TextSpan>,
}

/// Detects tables in the spans of one page.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables, top to bottom.
    pub fn detect(&self, spans: &[TextSpan]) -> Vec<RawTable> {
        let cfg = &self.config;
        if spans.len() < cfg.min_rows * cfg.min_columns {
            return Vec::new();
        }

        let rows = self.group_into_rows(spans);
        if rows.len() < cfg.min_rows {
            return Vec::new();
        }

        let columns = self.detect_columns(&rows);
        if columns.len() < cfg.min_columns {
            log::debug!("TableDetector: only {} column edges", columns.len());
            return Vec::new();
        }

        let mut tables = Vec::new();
        for (start, end) in self.find_regions(&rows, &columns) {
            let region = &rows[start..=end];
            let region_columns = self.detect_columns(region);

            if region_columns.len() < cfg.min_columns {
                continue;
            }
            if region_columns.len() > cfg.max_columns {
                log::debug!(
                    "TableDetector: skipping region with {} columns",
                    region_columns.len()
                );
                continue;
            }
            if is_list_pattern(region, &region_columns) {
                log::debug!("TableDetector: skipping list-like region");
                continue;
            }

            if let Some(table) = build_table(region, &region_columns) {
                tables.push(table);
            }
        }

        log::debug!("TableDetector: {} tables", tables.len());
        tables
    }

    fn group_into_rows<'s>(&self, spans: &'s [TextSpan]) -> Vec<Row<'s>> {
        let mut sorted: Vec<&TextSpan> = spans.iter().collect();
        sorted.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

        let mut rows: Vec<Row<'s>> = Vec::new();
        let mut row_y: Option<f32> = None;

        for span in sorted {
            let tolerance = span.font_size * self.config.y_tolerance_factor;
            match (row_y, rows.last_mut()) {
                (Some(y), Some(row)) if (span.y - y).abs() <= tolerance => row.spans.push(span),
                _ => {
                    row_y = Some(span.y);
                    rows.push(Row { spans: vec![span] });
                }
            }
        }

        rows
    }

    /// Left edges shared by enough rows, at least `min_column_gap` apart.
    ///
    /// When too few rows have several spans, every row votes.
    fn detect_columns(&self, rows: &[Row<'_>]) -> Vec<f32> {
        let multi: Vec<&Row<'_>> = rows.iter().filter(|r| r.spans.len() >= 2).collect();
        let voters: Vec<&Row<'_>> = if multi.len() >= self.config.min_rows {
            multi
        } else {
            rows.iter().collect()
        };

        let mut counts: HashMap<i32, usize> = HashMap::new();
        for row in &voters {
            let buckets: HashSet<i32> = row
                .spans
                .iter()
                .map(|s| (s.x / EDGE_BUCKET).round() as i32)
                .collect();
            for bucket in buckets {
                *counts.entry(bucket).or_default() += 1;
            }
        }

        let min_votes = ((voters.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);
        let mut edges: Vec<f32> = counts
            .into_iter()
            .filter(|(_, n)| *n >= min_votes)
            .map(|(bucket, _)| bucket as f32 * EDGE_BUCKET)
            .collect();
        edges.sort_by(f32::total_cmp);

        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            if merged
                .last()
                .map_or(true, |last| edge - last >= self.config.min_column_gap)
            {
                merged.push(edge);
            }
        }
        merged
    }

    /// Runs of at least `min_rows` consecutive aligned rows, as inclusive
    /// index ranges.
    fn find_regions(&self, rows: &[Row<'_>], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            if alignment_score(row, columns) >= self.config.min_alignment_ratio {
                start.get_or_insert(i);
                continue;
            }
            if let Some(s) = start.take() {
                if i - s >= self.config.min_rows {
                    regions.push((s, i - 1));
                }
            }
        }

        if let Some(s) = start {
            if rows.len() - s >= self.config.min_rows {
                regions.push((s, rows.len() - 1));
            }
        }

        regions
    }
}

fn alignment_score(row: &Row<'_>, columns: &[f32]) -> f32 {
    if row.spans.is_empty() {
        return 0.0;
    }
    let aligned = row
        .spans
        .iter()
        .filter(|s| columns.iter().any(|c| (s.x - c).abs() <= ALIGN_TOLERANCE))
        .count();
    aligned as f32 / row.spans.len() as f32
}

/// Column a left edge falls into, allowing spans to start slightly early.
fn column_for(x: f32, columns: &[f32]) -> usize {
    columns
        .iter()
        .rposition(|&c| x >= c - 10.0)
        .unwrap_or(0)
}

fn build_table(rows: &[Row<'_>], columns: &[f32]) -> Option<RawTable> {
    let bbox = rows
        .iter()
        .flat_map(|r| r.spans.iter().map(|s| s.bbox()))
        .reduce(|acc, b| acc.union(&b))?;

    let grid: TableGrid = rows
        .iter()
        .map(|row| {
            let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
            for span in &row.spans {
                cells[column_for(span.x, columns)].push(span.text.trim());
            }
            cells.into_iter().map(|parts| parts.join(" ")).collect()
        })
        .collect();

    Some(RawTable::new(bbox, grid))
}

fn number_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\(?\d{1,3}[.)]|\(?[a-zA-Z][.)]|\(?[ivxIVX]{1,4}[.)])$")
            .expect("valid list marker pattern")
    })
}

fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text,
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "►" | "■" | "●" | "□" | "◆" | "▶" | "➤"
    )
}

/// A numbered or bulleted list whose markers landed in their own column.
fn is_list_pattern(rows: &[Row<'_>], columns: &[f32]) -> bool {
    let mut bullets = 0;
    let mut numbers = 0;

    for row in rows {
        let Some(first) = row.spans.iter().min_by(|a, b| a.x.total_cmp(&b.x)) else {
            continue;
        };
        let text = first.text.trim();
        if is_bullet_marker(text) {
            bullets += 1;
        } else if number_marker().is_match(text) {
            numbers += 1;
        }
    }

    let total = rows.len() as f32;
    if bullets as f32 / total >= 0.5 {
        return true;
    }
    columns.len() == 2 && (bullets + numbers) as f32 / total >= 0.5
}
