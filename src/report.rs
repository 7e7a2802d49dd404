//! Benchmark aggregation.
//!
//! Groups recorded benchmarks by model and averages their metrics, producing
//! the JSON report the dashboard's comparison view reads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::job::BenchmarkRecord;

/// Aggregate quality figures for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Number of benchmarked images.
    pub image_count: usize,
    pub average_psnr: f64,
    pub average_ssim: f64,
}

/// Per-model benchmark summaries, keyed by model name.
///
/// A `BTreeMap` keeps the report's model order stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub models: BTreeMap<String, ModelSummary>,
}

impl BenchmarkReport {
    /// Aggregate raw benchmark records into per-model averages.
    ///
    /// Non-finite PSNR values (identical images) are excluded from the PSNR
    /// average but still counted as benchmarked images.
    pub fn from_records(records: &[BenchmarkRecord]) -> Self {
        let mut grouped: BTreeMap<String, Vec<&BenchmarkRecord>> = BTreeMap::new();
        for record in records {
            grouped
                .entry(record.model_name.clone())
                .or_default()
                .push(record);
        }

        let models = grouped
            .into_iter()
            .map(|(model, records)| {
                let finite_psnr: Vec<f64> = records
                    .iter()
                    .map(|r| r.psnr)
                    .filter(|p| p.is_finite())
                    .collect();
                let average_psnr = if finite_psnr.is_empty() {
                    0.0
                } else {
                    finite_psnr.iter().sum::<f64>() / finite_psnr.len() as f64
                };
                let average_ssim =
                    records.iter().map(|r| r.ssim).sum::<f64>() / records.len() as f64;

                (
                    model,
                    ModelSummary {
                        image_count: records.len(),
                        average_psnr,
                        average_ssim,
                    },
                )
            })
            .collect();

        Self { models }
    }

    /// Pretty-printed JSON form of the report.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
