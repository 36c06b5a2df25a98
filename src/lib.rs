//! ALRAGE Eval - LLM-as-judge evaluation for Arabic retrieval-augmented QA.
//!
//! This library evaluates language models on the
//! [ALRAGE](https://huggingface.co/datasets/OALL/ALRAGE) benchmark: each
//! dataset row carries an Arabic question, retrieved candidate contexts,
//! and a gold answer. The model under evaluation answers from the
//! contexts, and a second model judges the answer against the gold on a
//! 0-10 scale, normalized to [0, 1] and averaged over the dataset.
//!
//! # Quick Start
//!
//! ```no_run
//! use alrage_eval::{
//!     config::Config,
//!     eval::{create_sample_dataset, JudgeMetricWrapper, LlmJudge, RunConfig, Runner},
//!     llm::LlmClient,
//!     tasks,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let config = Config::load()?;
//!     config.validate()?;
//!
//!     // The judge is injected into the metric, the metric into the runner
//!     let judge = Arc::new(LlmJudge::from_config(config.judge_llm()));
//!     let metric = Arc::new(JudgeMetricWrapper::new(judge));
//!
//!     let client = LlmClient::new(config.llm.clone());
//!     let runner = Runner::new(client, metric, RunConfig::default());
//!
//!     // Run the registered task on the built-in sample rows
//!     let task = tasks::task_by_name("alrage_qa")?;
//!     let dataset = create_sample_dataset();
//!
//!     let results = runner.run(task, &dataset).await?;
//!     results.print_summary();
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **DatasetRecord / Document**: dataset rows and their formatted prompts
//! - **LlmClient**: OpenAI-compatible API client for both model roles
//! - **Judge / LlmJudge**: Arabic judge prompt, score extraction
//! - **Metric / JudgeMetricWrapper**: per-sample scoring plus mean aggregation
//! - **Runner**: sequential generate-then-judge loop over a dataset
//! - **tasks**: static task registration table

pub mod config;
pub mod document;
pub mod error;
pub mod eval;
pub mod llm;
pub mod tasks;

// Re-export commonly used types
pub use config::Config;
pub use document::{qa_prompt_arabic, DatasetRecord, Document, ModelResponse};
pub use error::{AlrageError, Result};
pub use eval::{Judge, JudgeMetricWrapper, LlmJudge, Metric, Runner};
pub use llm::LlmClient;
pub use tasks::{task_by_name, TaskConfig, TASKS_TABLE};
