//! Evaluation runner: generation followed by judge scoring.
//!
//! The runner formats every record with the task's prompt function, asks
//! the model under evaluation for an answer one record at a time, then
//! hands all answers to the metric for judging and aggregation.

use super::dataset::Dataset;
use super::metric::Metric;
use crate::document::{Document, ModelResponse};
use crate::llm::{GenerationOptions, LlmClient, Message};
use crate::tasks::TaskConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Configuration for an evaluation run.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Maximum records to evaluate (None = all).
    pub max_samples: Option<usize>,
    /// Generation budget override (None = the task's generation size).
    pub max_new_tokens: Option<u32>,
    /// Sampling temperature override.
    pub temperature: Option<f32>,
    /// Nucleus sampling cutoff.
    pub top_p: Option<f32>,
    /// Verbose output.
    pub verbose: bool,
}

/// Results for a single record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResult {
    /// Position of the record within the evaluated slice.
    pub index: usize,
    /// The formatted query sent to the model.
    pub query: String,
    /// Gold answer from the dataset.
    pub gold_answer: String,
    /// Generated answer from the model under evaluation.
    pub answer: String,
    /// Judge score in [0, 1].
    pub score: f64,
    /// Generation time.
    pub generation_time_ms: u64,
    /// Error message if generation failed (the item is then judged with
    /// an empty answer).
    pub error: Option<String>,
}

/// Aggregated evaluation results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalResults {
    /// Task name.
    pub task_name: String,
    /// Model under evaluation.
    pub model: String,
    /// Dataset name.
    pub dataset_name: String,
    /// Metric key the scores were computed under.
    pub metric_name: String,
    /// Total records evaluated.
    pub total_items: usize,
    /// Records whose generation call failed.
    pub generation_errors: usize,
    /// Corpus-level score as produced by the metric's aggregation.
    pub aggregate_score: f64,
    /// Average generation time (ms).
    pub avg_generation_time_ms: f64,
    /// Individual record results.
    pub item_results: Vec<ItemResult>,
    /// Total run time (seconds).
    pub total_time_secs: f64,
}

impl EvalResults {
    /// Create empty results.
    pub fn new(task_name: &str, model: &str, dataset_name: &str) -> Self {
        Self {
            task_name: task_name.to_string(),
            model: model.to_string(),
            dataset_name: dataset_name.to_string(),
            metric_name: String::new(),
            total_items: 0,
            generation_errors: 0,
            aggregate_score: 0.0,
            avg_generation_time_ms: 0.0,
            item_results: Vec::new(),
            total_time_secs: 0.0,
        }
    }

    /// Calculate summary statistics from item results.
    pub fn calculate_summary(&mut self) {
        if self.item_results.is_empty() {
            return;
        }

        self.total_items = self.item_results.len();
        self.generation_errors = self
            .item_results
            .iter()
            .filter(|r| r.error.is_some())
            .count();

        let total_time: u64 = self.item_results.iter().map(|r| r.generation_time_ms).sum();
        self.avg_generation_time_ms = total_time as f64 / self.total_items as f64;
    }

    /// Print summary to stdout.
    pub fn print_summary(&self) {
        println!("\n========== Evaluation Results ==========");
        println!("Task: {}", self.task_name);
        println!("Model: {}", self.model);
        println!("Dataset: {}", self.dataset_name);
        println!("Items evaluated: {}", self.total_items);
        if self.generation_errors > 0 {
            println!("Generation errors: {}", self.generation_errors);
        }
        println!("----------------------------------------");
        println!("{}: {:.4}", self.metric_name, self.aggregate_score);
        println!("Avg generation time: {:.0}ms", self.avg_generation_time_ms);
        println!("----------------------------------------");
        println!("Total time: {:.1}s", self.total_time_secs);
        println!("========================================\n");
    }

    /// Save results as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write results to {:?}", path))?;
        Ok(())
    }
}

/// Evaluation runner.
pub struct Runner {
    client: LlmClient,
    metric: Arc<dyn Metric>,
    config: RunConfig,
}

impl Runner {
    /// Create a new runner from a client for the model under evaluation
    /// and a metric to score with.
    pub fn new(client: LlmClient, metric: Arc<dyn Metric>, config: RunConfig) -> Self {
        Self {
            client,
            metric,
            config,
        }
    }

    /// Run a task over a dataset.
    pub async fn run(&self, task: &TaskConfig, dataset: &Dataset) -> Result<EvalResults> {
        let start_time = Instant::now();
        let mut results = EvalResults::new(task.name, self.client.model(), &dataset.name);
        results.metric_name = self.metric.name().to_string();

        let records: Vec<_> = if let Some(max) = self.config.max_samples {
            dataset.records.iter().take(max).collect()
        } else {
            dataset.records.iter().collect()
        };

        let docs: Vec<Document> = records
            .iter()
            .map(|record| (task.prompt_function)(record, task.name))
            .collect();

        let options = GenerationOptions {
            max_tokens: Some(
                self.config
                    .max_new_tokens
                    .unwrap_or(task.generation_size),
            ),
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            stop: task.stop_sequence.iter().map(|s| s.to_string()).collect(),
        };

        println!("Running {} on {} items...", task.name, docs.len());

        let mut responses = Vec::with_capacity(docs.len());
        let mut times = Vec::with_capacity(docs.len());
        let mut errors = Vec::with_capacity(docs.len());

        for (idx, doc) in docs.iter().enumerate() {
            if self.config.verbose {
                println!("\n[{}/{}] Generating answer...", idx + 1, docs.len());
            } else {
                print!(".");
                use std::io::Write;
                std::io::stdout().flush().ok();
            }

            let gen_start = Instant::now();
            let messages = vec![Message::user(doc.query.clone())];

            let (answer, error) = match self.client.chat_with_options(messages, &options).await {
                Ok(response) => (response.content, None),
                Err(e) => {
                    log::warn!("Generation failed for item {}: {}", idx, e);
                    (String::new(), Some(e.to_string()))
                }
            };

            times.push(gen_start.elapsed().as_millis() as u64);
            errors.push(error);
            responses.push(ModelResponse::new(answer));
        }

        if !self.config.verbose {
            println!(); // Newline after dots
        }

        println!("Judging {} answers...", responses.len());
        let score_maps = self.metric.compute(&responses, &docs).await?;
        let scores: Vec<f64> = score_maps
            .iter()
            .map(|m| m.get(self.metric.name()).copied().unwrap_or(0.0))
            .collect();

        for (idx, doc) in docs.iter().enumerate() {
            results.item_results.push(ItemResult {
                index: idx,
                query: doc.query.clone(),
                gold_answer: doc.gold().unwrap_or("").to_string(),
                answer: responses[idx].primary().to_string(),
                score: scores[idx],
                generation_time_ms: times[idx],
                error: errors[idx].clone(),
            });
        }

        results.aggregate_score = self.metric.aggregate(&scores);
        results.total_time_secs = start_time.elapsed().as_secs_f64();
        results.calculate_summary();

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_config_default() {
        let config = RunConfig::default();
        assert!(config.max_samples.is_none());
        assert!(config.max_new_tokens.is_none());
        assert!(!config.verbose);
    }

    fn item(index: usize, score: f64, time_ms: u64, error: Option<&str>) -> ItemResult {
        ItemResult {
            index,
            query: format!("query {}", index),
            gold_answer: "gold".to_string(),
            answer: "answer".to_string(),
            score,
            generation_time_ms: time_ms,
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_results_summary() {
        let mut results = EvalResults::new("alrage_qa", "test-model", "sample");
        results.item_results.push(item(0, 0.8, 100, None));
        results.item_results.push(item(1, 0.4, 300, Some("timeout")));

        results.calculate_summary();

        assert_eq!(results.total_items, 2);
        assert_eq!(results.generation_errors, 1);
        assert!((results.avg_generation_time_ms - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_results_summary_empty_is_noop() {
        let mut results = EvalResults::new("alrage_qa", "test-model", "sample");
        results.calculate_summary();
        assert_eq!(results.total_items, 0);
        assert_eq!(results.avg_generation_time_ms, 0.0);
    }

    #[test]
    fn test_results_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        let mut results = EvalResults::new("alrage_qa", "test-model", "sample");
        results.item_results.push(item(0, 0.9, 50, None));
        results.aggregate_score = 0.9;
        results.calculate_summary();
        results.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: EvalResults = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.task_name, "alrage_qa");
        assert_eq!(loaded.aggregate_score, 0.9);
        assert_eq!(loaded.item_results.len(), 1);
    }
}
