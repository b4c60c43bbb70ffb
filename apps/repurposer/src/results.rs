//! Flat-file results log: one CSV row of final scores per run.
//!
//! Columns: `test_case,linkedin,instagram,email,timestamp`. Scores are written
//! with two decimals; a missing score is an empty cell.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};

use crate::content::platform::Platform;
use crate::errors::AppError;

pub const HEADER: &str = "test_case,linkedin,instagram,email,timestamp";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub test_case: u64,
    pub linkedin: Option<f64>,
    pub instagram: Option<f64>,
    pub email: Option<f64>,
    pub timestamp: String,
}

impl ResultRow {
    /// Row stamped with the current local time (`%Y-%m-%dT%H:%M:%S`).
    pub fn now(
        test_case: u64,
        linkedin: Option<f64>,
        instagram: Option<f64>,
        email: Option<f64>,
    ) -> Self {
        Self {
            test_case,
            linkedin,
            instagram,
            email,
            timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }

    pub fn score(&self, platform: Platform) -> Option<f64> {
        match platform {
            Platform::LinkedIn => self.linkedin,
            Platform::Instagram => self.instagram,
            Platform::Email => self.email,
        }
    }

    fn to_line(&self) -> String {
        let cell = |s: Option<f64>| s.map(|v| format!("{v:.2}")).unwrap_or_default();
        format!(
            "{},{},{},{},{}",
            self.test_case,
            cell(self.linkedin),
            cell(self.instagram),
            cell(self.email),
            self.timestamp
        )
    }

    fn parse(line: &str) -> Result<Self, String> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 5 {
            return Err(format!("expected 5 columns, found {}", fields.len()));
        }
        let score = |raw: &str| -> Result<Option<f64>, String> {
            if raw.is_empty() {
                Ok(None)
            } else {
                raw.parse::<f64>()
                    .map(Some)
                    .map_err(|e| format!("invalid score '{raw}': {e}"))
            }
        };
        Ok(Self {
            test_case: fields[0]
                .parse()
                .map_err(|e| format!("invalid test_case '{}': {e}", fields[0]))?,
            linkedin: score(fields[1])?,
            instagram: score(fields[2])?,
            email: score(fields[3])?,
            timestamp: fields[4].to_string(),
        })
    }
}

fn is_header(line: &str) -> bool {
    line.trim_start().to_lowercase().starts_with("test_case")
}

/// Per-platform aggregate over the rows that have a score for that platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformSummary {
    pub platform: Platform,
    pub runs: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

pub fn summarize(rows: &[ResultRow]) -> Vec<PlatformSummary> {
    Platform::ALL
        .iter()
        .map(|&platform| {
            let scores: Vec<f64> = rows.iter().filter_map(|r| r.score(platform)).collect();
            let mean = (!scores.is_empty()).then(|| scores.iter().sum::<f64>() / scores.len() as f64);
            PlatformSummary {
                platform,
                runs: scores.len(),
                mean,
                min: scores.iter().copied().reduce(f64::min),
                max: scores.iter().copied().reduce(f64::max),
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ResultsLog {
    path: PathBuf,
}

impl ResultsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the parent directory and the header row if the file is missing.
    pub fn ensure_exists(&self) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
        }
        if !self.path.exists() {
            fs::write(&self.path, format!("{HEADER}\n")).map_err(|e| AppError::io(&self.path, e))?;
            info!("Created results file {}", self.path.display());
        }
        Ok(())
    }

    /// One past the id in the last row. 1 when the file is missing, holds at
    /// most one row, or the last id cannot be read.
    pub fn next_test_case_id(&self) -> Result<u64, AppError> {
        if !self.path.exists() {
            return Ok(1);
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| AppError::io(&self.path, e))?;
        let lines: Vec<&str> = contents.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.len() <= 1 {
            return Ok(1);
        }

        let last = lines[lines.len() - 1];
        let first_cell = last.split(',').next().unwrap_or_default().trim();
        let next = first_cell
            .parse::<u64>()
            .map_err(|e| e.to_string())
            .and_then(|id| id.checked_add(1).ok_or_else(|| "id overflow".to_string()));
        Ok(next.unwrap_or_else(|e| {
            warn!(
                "Failed to infer next test_case id from {} (last row {last:?}): {e}",
                self.path.display()
            );
            1
        }))
    }

    pub fn append(&self, row: &ResultRow) -> Result<(), AppError> {
        self.ensure_exists()?;
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| AppError::io(&self.path, e))?;
        writeln!(file, "{}", row.to_line()).map_err(|e| AppError::io(&self.path, e))?;
        Ok(())
    }

    /// Reads every row. A missing file is an empty log; a headerless file is accepted.
    pub fn load(&self) -> Result<Vec<ResultRow>, AppError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| AppError::io(&self.path, e))?;

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .enumerate()
            .filter(|(n, (_, line))| !(*n == 0 && is_header(line)))
            .map(|(_, row)| row)
            .map(|(i, line)| {
                ResultRow::parse(line).map_err(|message| AppError::Results {
                    path: self.path.clone(),
                    message: format!("line {}: {message}", i + 1),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn log_in(dir: &TempDir) -> ResultsLog {
        ResultsLog::new(dir.path().join("evaluation").join("test_results.csv"))
    }

    fn row(id: u64, l: Option<f64>, i: Option<f64>, e: Option<f64>) -> ResultRow {
        ResultRow {
            test_case: id,
            linkedin: l,
            instagram: i,
            email: e,
            timestamp: "2026-01-02T03:04:05".to_string(),
        }
    }

    #[test]
    fn test_missing_file_starts_at_one() {
        let dir = TempDir::new().unwrap();
        let log = log_in(&dir);
        assert_eq!(log.next_test_case_id().unwrap(), 1);
        assert!(log.load().unwrap().is_empty());
    }

    #[test]
    fn test_ensure_exists_writes_header_once() {
        let dir = TempDir::new().unwrap();
        let log = log_in(&dir);
        log.ensure_exists().unwrap();
        log.ensure_exists().unwrap();
        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, format!("{HEADER}\n"));
        assert_eq!(log.next_test_case_id().unwrap(), 1);
    }

    #[test]
    fn test_append_formats_scores_and_blank_cells() {
        let dir = TempDir::new().unwrap();
        let log = log_in(&dir);
        log.append(&row(1, Some(0.856), None, Some(0.8))).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "1,0.86,,0.80,2026-01-02T03:04:05");
    }

    #[test]
    fn test_next_id_follows_last_row() {
        let dir = TempDir::new().unwrap();
        let log = log_in(&dir);
        log.append(&row(1, Some(0.7), Some(0.8), Some(0.9))).unwrap();
        log.append(&row(7, Some(0.7), Some(0.8), Some(0.9))).unwrap();
        assert_eq!(log.next_test_case_id().unwrap(), 8);
    }

    #[test]
    fn test_unparseable_last_row_falls_back_to_one() {
        let dir = TempDir::new().unwrap();
        let log = log_in(&dir);
        log.ensure_exists().unwrap();
        fs::write(log.path(), format!("{HEADER}\nabc,0.5,0.5,0.5,now\n")).unwrap();
        assert_eq!(log.next_test_case_id().unwrap(), 1);
    }

    #[test]
    fn test_max_id_in_last_row_falls_back_to_one() {
        let dir = TempDir::new().unwrap();
        let log = log_in(&dir);
        log.ensure_exists().unwrap();
        fs::write(
            log.path(),
            format!("{HEADER}\n{},0.5,0.5,0.5,2026-01-01T00:00:00\n", u64::MAX),
        )
        .unwrap();
        assert_eq!(log.next_test_case_id().unwrap(), 1);
    }

    #[test]
    fn test_load_skips_header_after_leading_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("padded.csv");
        fs::write(&path, format!("\n  \n{HEADER}\n1,0.50,,0.70,2026-01-01T00:00:00\n")).unwrap();
        let rows = ResultsLog::new(&path).load().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].instagram, None);
    }

    #[test]
    fn test_load_round_trips_appended_rows() {
        let dir = TempDir::new().unwrap();
        let log = log_in(&dir);
        log.append(&row(1, Some(0.64), Some(0.86), None)).unwrap();
        log.append(&row(2, Some(0.85), Some(0.6), Some(0.85))).unwrap();

        let rows = log.load().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], row(1, Some(0.64), Some(0.86), None));
        assert_eq!(rows[1].test_case, 2);
    }

    #[test]
    fn test_load_accepts_headerless_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("raw.csv");
        fs::write(&path, "3,0.50,0.60,0.70,2026-01-01T00:00:00\n").unwrap();
        let rows = ResultsLog::new(&path).load().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].test_case, 3);
    }

    #[test]
    fn test_load_reports_malformed_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, format!("{HEADER}\n1,0.5,0.5\n")).unwrap();
        let err = ResultsLog::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn test_summarize_skips_missing_scores() {
        let rows = vec![
            row(1, Some(0.6), None, Some(0.8)),
            row(2, Some(0.8), Some(0.9), None),
        ];
        let summary = summarize(&rows);
        assert_eq!(summary.len(), 3);

        let linkedin = &summary[0];
        assert_eq!(linkedin.platform, Platform::LinkedIn);
        assert_eq!(linkedin.runs, 2);
        assert!((linkedin.mean.unwrap() - 0.7).abs() < 1e-9);
        assert_eq!(linkedin.min, Some(0.6));
        assert_eq!(linkedin.max, Some(0.8));

        assert_eq!(summary[1].runs, 1);
        assert_eq!(summarize(&[])[2].mean, None);
    }
}
