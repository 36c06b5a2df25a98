//! Evaluation document model and prompt formatting.
//!
//! A dataset row holds a question, retrieved candidate contexts, and a
//! gold answer. The formatter turns one row into the document shape that
//! the runner and the metric consume.

use crate::llm::Prompts;
use serde::{Deserialize, Serialize};

/// Task name used when none is supplied.
pub const DEFAULT_TASK_NAME: &str = "alrage";

/// Candidate contexts for one dataset row.
///
/// The published dataset stores these either as a list of strings or as a
/// single newline-delimited string; both forms deserialize here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Candidates {
    Many(Vec<String>),
    One(String),
}

impl Default for Candidates {
    fn default() -> Self {
        Candidates::Many(Vec::new())
    }
}

impl Candidates {
    /// Candidate entries, trimmed, with empty entries discarded.
    ///
    /// The single-string form is split on newlines first.
    pub fn normalized(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Candidates::Many(items) => items.iter().map(String::as_str).collect(),
            Candidates::One(text) => text.split('\n').collect(),
        };

        raw.into_iter()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// One row of the QA dataset.
///
/// All fields default to empty when absent so a partial row still formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRecord {
    #[serde(default)]
    pub question: String,

    #[serde(default)]
    pub candidates: Candidates,

    #[serde(default)]
    pub gold_answer: String,
}

impl DatasetRecord {
    /// Create a record from explicit parts (useful for testing).
    pub fn new(
        question: impl Into<String>,
        candidates: Vec<String>,
        gold_answer: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            candidates: Candidates::Many(candidates),
            gold_answer: gold_answer.into(),
        }
    }
}

/// One formatted evaluation item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Name of the task this document belongs to.
    pub task_name: String,
    /// Full prompt text shown to the model under evaluation.
    pub query: String,
    /// Instruction line embedded at the top of the query.
    pub instruction: String,
    /// Reference answers. For this task always a single entry, the gold answer.
    pub choices: Vec<String>,
    /// Index of the gold answer within `choices`, if one is designated.
    pub gold_index: Option<usize>,
}

impl Document {
    /// The gold answer this document designates, if any.
    pub fn gold(&self) -> Option<&str> {
        self.gold_index
            .and_then(|i| self.choices.get(i))
            .map(String::as_str)
    }
}

/// Raw generation output for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Generated strings, one per sampled completion.
    pub results: Vec<String>,
}

impl ModelResponse {
    /// Wrap a single generated string.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            results: vec![text.into()],
        }
    }

    /// The first generated string, or empty if generation produced nothing.
    pub fn primary(&self) -> &str {
        self.results.first().map(String::as_str).unwrap_or("")
    }
}

/// Format one dataset row into an evaluation document.
///
/// The query embeds the Arabic instruction, the question, and the trimmed
/// candidate contexts joined with ", ". The gold answer becomes the single
/// entry of `choices` with `gold_index` 0; a missing gold answer stays an
/// empty string rather than failing. An empty `task_name` falls back to
/// "alrage".
pub fn qa_prompt_arabic(record: &DatasetRecord, task_name: &str) -> Document {
    let instruction = Prompts::qa_instruction();
    let candidates = record.candidates.normalized().join(", ");

    let query = Prompts::qa_query()
        .replace("{instruction}", instruction)
        .replace("{question}", &record.question)
        .replace("{candidates}", &candidates);

    let task_name = if task_name.is_empty() {
        DEFAULT_TASK_NAME
    } else {
        task_name
    };

    Document {
        task_name: task_name.to_string(),
        query,
        instruction: instruction.to_string(),
        choices: vec![record.gold_answer.clone()],
        gold_index: Some(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cairo_record() -> DatasetRecord {
        DatasetRecord::new(
            "ما هي عاصمة مصر؟",
            vec!["القاهرة".to_string(), "الإسكندرية".to_string()],
            "القاهرة",
        )
    }

    #[test]
    fn test_query_contains_question_and_candidates() {
        let doc = qa_prompt_arabic(&cairo_record(), "alrage_qa");

        assert!(doc.query.contains("ما هي عاصمة مصر؟"));
        assert!(doc.query.contains("القاهرة, الإسكندرية"));
        assert!(doc.query.starts_with(Prompts::qa_instruction()));
        assert!(doc.query.ends_with('\n'));
        assert_eq!(doc.gold(), Some("القاهرة"));
    }

    #[test]
    fn test_query_exact_layout() {
        let record = DatasetRecord::new("q", vec!["a".to_string(), "b".to_string()], "a");
        let doc = qa_prompt_arabic(&record, "alrage_qa");

        let expected = format!(
            "{}\n\nالسؤال:\nq\n\nالسياقات المقترحة:\na, b\n",
            Prompts::qa_instruction()
        );
        assert_eq!(doc.query, expected);
    }

    #[test]
    fn test_string_and_list_candidates_equivalent() {
        let as_list = Candidates::Many(vec![
            "  القاهرة ".to_string(),
            "الإسكندرية".to_string(),
            "   ".to_string(),
        ]);
        let as_string = Candidates::One("  القاهرة \nالإسكندرية\n\n   ".to_string());

        assert_eq!(as_list.normalized(), as_string.normalized());
        assert_eq!(as_list.normalized(), vec!["القاهرة", "الإسكندرية"]);
    }

    #[test]
    fn test_candidates_deserialize_both_shapes() {
        let from_list: DatasetRecord =
            serde_json::from_str(r#"{"question": "q", "candidates": ["a", "b"], "gold_answer": "a"}"#)
                .unwrap();
        let from_string: DatasetRecord =
            serde_json::from_str(r#"{"question": "q", "candidates": "a\nb", "gold_answer": "a"}"#)
                .unwrap();

        assert_eq!(
            from_list.candidates.normalized(),
            from_string.candidates.normalized()
        );
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let record: DatasetRecord = serde_json::from_str(r#"{"question": "q"}"#).unwrap();
        assert!(record.gold_answer.is_empty());
        assert!(record.candidates.normalized().is_empty());

        let doc = qa_prompt_arabic(&record, "alrage_qa");
        assert_eq!(doc.choices, vec![String::new()]);
        assert_eq!(doc.gold(), Some(""));
    }

    #[test]
    fn test_task_name_fallback() {
        let doc = qa_prompt_arabic(&cairo_record(), "");
        assert_eq!(doc.task_name, "alrage");

        let doc = qa_prompt_arabic(&cairo_record(), "alrage_qa");
        assert_eq!(doc.task_name, "alrage_qa");
    }

    #[test]
    fn test_formatter_is_deterministic() {
        let record = cairo_record();
        let first = qa_prompt_arabic(&record, "alrage_qa");
        let second = qa_prompt_arabic(&record, "alrage_qa");
        assert_eq!(first, second);
    }

    #[test]
    fn test_gold_lookup_out_of_range_is_none() {
        let doc = Document {
            task_name: "alrage".to_string(),
            query: String::new(),
            instruction: String::new(),
            choices: vec!["x".to_string()],
            gold_index: Some(3),
        };
        assert_eq!(doc.gold(), None);

        let no_gold = Document {
            gold_index: None,
            ..doc
        };
        assert_eq!(no_gold.gold(), None);
    }

    #[test]
    fn test_model_response_primary() {
        let response = ModelResponse::new("answer");
        assert_eq!(response.primary(), "answer");

        let empty = ModelResponse::default();
        assert_eq!(empty.primary(), "");
    }
}
