//! Evaluation module for the ALRAGE QA benchmark.
//!
//! This module provides:
//! - LLM-as-judge scoring (Arabic judge prompt plus score extraction)
//! - The metric interface and the judge-backed metric adapter
//! - Dataset loading (local JSON or the Hugging Face datasets server)
//! - A sequential generation-then-judging runner

pub mod dataset;
pub mod judge;
pub mod metric;
pub mod runner;

pub use dataset::{cache_path, create_sample_dataset, download_dataset, load_or_download, Dataset};
pub use judge::{judge_template, process_judge_response, Judge, JudgeReply, Judgment, LlmJudge};
pub use metric::{JudgeMetricWrapper, Metric, MetricCategory, MetricUseCase};
pub use runner::{EvalResults, ItemResult, RunConfig, Runner};
