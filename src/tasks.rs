//! Task registration table.
//!
//! Tasks are static descriptions: a prompt function plus the dataset and
//! generation settings the runner needs. Lookup is by name.

use crate::document::{qa_prompt_arabic, DatasetRecord, Document};
use crate::error::{AlrageError, Result};
use crate::eval::dataset::HF_REPO;

/// Prompt formatter signature: dataset record and task name in, document out.
pub type PromptFn = fn(&DatasetRecord, &str) -> Document;

/// Static description of one benchmark task.
#[derive(Debug, Clone, Copy)]
pub struct TaskConfig {
    /// Task name as used on the command line.
    pub name: &'static str,
    /// Formats one dataset record into a document.
    pub prompt_function: PromptFn,
    /// Suite tags the task is registered under.
    pub suite: &'static [&'static str],
    /// Hugging Face dataset repository.
    pub hf_repo: &'static str,
    /// Dataset configuration name, if the repository has several.
    pub hf_subset: Option<&'static str>,
    /// Splits available in the repository.
    pub hf_avail_splits: &'static [&'static str],
    /// Splits evaluated by default.
    pub evaluation_splits: &'static [&'static str],
    /// Whether remote dataset code is trusted.
    pub trust_dataset: bool,
    /// Token budget for one generation.
    pub generation_size: u32,
    /// Stop sequences for generation.
    pub stop_sequence: &'static [&'static str],
    /// Task version.
    pub version: u32,
}

/// The ALRAGE QA task.
pub static ALRAGE_QA: TaskConfig = TaskConfig {
    name: "alrage_qa",
    prompt_function: qa_prompt_arabic,
    suite: &["community"],
    hf_repo: HF_REPO,
    hf_subset: None,
    // Only the train split is published.
    hf_avail_splits: &["train"],
    evaluation_splits: &["train"],
    trust_dataset: true,
    generation_size: 200,
    stop_sequence: &[],
    version: 0,
};

/// All registered tasks, in discovery order.
pub static TASKS_TABLE: &[&TaskConfig] = &[&ALRAGE_QA];

/// Look up a task by name.
pub fn task_by_name(name: &str) -> Result<&'static TaskConfig> {
    TASKS_TABLE
        .iter()
        .find(|task| task.name == name)
        .copied()
        .ok_or_else(|| AlrageError::UnknownTask(name.to_string()))
}
