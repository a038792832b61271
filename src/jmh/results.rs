//! JMH's JSON result format, as far as the run summary needs it

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// `<project>.json` for the first artifact, `<project><index>.json` after that
pub fn result_file_name(project: &str, index: usize) -> String {
    if index == 0 {
        format!("{}.json", project)
    } else {
        format!("{}{}.json", project, index)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResult {
    pub benchmark: String,
    pub mode: String,
    #[serde(default)]
    pub forks: u32,
    pub primary_metric: PrimaryMetric,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryMetric {
    pub score: f64,
    #[serde(default)]
    pub score_error: serde_json::Value,
    pub score_unit: String,
}

impl PrimaryMetric {
    /// JMH writes `"NaN"` as a string when a single fork leaves no error estimate
    pub fn error(&self) -> Option<f64> {
        self.score_error.as_f64()
    }
}

pub fn parse_results(json: &str) -> Result<Vec<BenchmarkResult>> {
    serde_json::from_str(json).context("Failed to parse JMH result JSON")
}

pub fn read_results(path: &Path) -> Result<Vec<BenchmarkResult>> {
    let json = fs::read_to_string(path).context(format!("Failed to read {:?}", path))?;
    parse_results(&json)
}
