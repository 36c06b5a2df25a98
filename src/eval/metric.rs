//! Metric interface and the judge-backed metric adapter.

use super::judge::Judge;
use crate::document::{Document, ModelResponse};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Score-map key used by the judge metric.
pub const LLM_AS_JUDGE: &str = "llm_as_judge";

/// Broad grouping a metric belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    /// Scored by a second model reading the generated answer.
    LlmAsJudge,
    /// Scored by direct comparison of generated text.
    Generative,
}

/// Downstream use the metric's numbers are tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricUseCase {
    Accuracy,
    None,
}

/// A metric as the evaluation harness sees it: per-sample scoring plus
/// corpus-level aggregation.
#[async_trait]
pub trait Metric: Send + Sync {
    /// Stable name, used as the key in per-sample score maps.
    fn name(&self) -> &str;

    fn category(&self) -> MetricCategory;

    fn use_case(&self) -> MetricUseCase;

    /// Whether larger aggregate values indicate better models.
    fn higher_is_better(&self) -> bool {
        true
    }

    /// Score each response against its formatted document, in order.
    /// Returns one score map per sample.
    async fn compute(
        &self,
        responses: &[ModelResponse],
        formatted_docs: &[Document],
    ) -> Result<Vec<HashMap<String, f64>>>;

    /// Collapse per-sample scores into a single corpus-level value.
    fn aggregate(&self, scores: &[f64]) -> f64;
}

/// Adapts a [`Judge`] to the [`Metric`] interface.
///
/// Each sample triggers one judge call; samples are judged strictly one
/// at a time, in document order, with no retries.
pub struct JudgeMetricWrapper {
    judge: Arc<dyn Judge>,
    metric_name: String,
}

impl JudgeMetricWrapper {
    /// Wrap a judge handle.
    pub fn new(judge: Arc<dyn Judge>) -> Self {
        Self {
            judge,
            metric_name: LLM_AS_JUDGE.to_string(),
        }
    }
}

#[async_trait]
impl Metric for JudgeMetricWrapper {
    fn name(&self) -> &str {
        &self.metric_name
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::LlmAsJudge
    }

    fn use_case(&self) -> MetricUseCase {
        MetricUseCase::None
    }

    async fn compute(
        &self,
        responses: &[ModelResponse],
        formatted_docs: &[Document],
    ) -> Result<Vec<HashMap<String, f64>>> {
        let mut results = Vec::with_capacity(formatted_docs.len());

        for (i, doc) in formatted_docs.iter().enumerate() {
            // The full formatted query plays the question role for the judge.
            let question = doc.query.as_str();
            let gold = doc.gold();
            let answer = responses.get(i).map(ModelResponse::primary).unwrap_or("");

            let judgment = self
                .judge
                .evaluate_answer(question, answer, None, gold)
                .await?;

            results.push(HashMap::from([(
                self.metric_name.clone(),
                judgment.score,
            )]));
        }

        Ok(results)
    }

    fn aggregate(&self, scores: &[f64]) -> f64 {
        if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{qa_prompt_arabic, DatasetRecord};
    use crate::eval::judge::{judge_template, Judgment};
    use std::sync::Mutex;

    /// Scores 1.0 when the answer matches gold exactly, recording every
    /// call it receives.
    struct RecordingJudge {
        calls: Mutex<Vec<(String, String, Option<String>)>>,
    }

    impl RecordingJudge {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Judge for RecordingJudge {
        async fn evaluate_answer(
            &self,
            question: &str,
            answer: &str,
            options: Option<&[String]>,
            gold: Option<&str>,
        ) -> Result<Judgment> {
            self.calls.lock().unwrap().push((
                question.to_string(),
                answer.to_string(),
                gold.map(str::to_string),
            ));

            let score = if gold == Some(answer) { 1.0 } else { 0.0 };
            Ok(Judgment {
                score,
                prompt: judge_template(question, answer, gold, options),
                raw_response: String::new(),
            })
        }
    }

    fn docs() -> Vec<Document> {
        vec![
            qa_prompt_arabic(
                &DatasetRecord::new(
                    "ما هي عاصمة مصر؟",
                    vec!["القاهرة".to_string(), "الإسكندرية".to_string()],
                    "القاهرة",
                ),
                "alrage_qa",
            ),
            qa_prompt_arabic(
                &DatasetRecord::new("ما هو أطول نهر؟", vec!["النيل".to_string()], "النيل"),
                "alrage_qa",
            ),
        ]
    }

    #[tokio::test]
    async fn test_compute_scores_each_sample() {
        let judge = Arc::new(RecordingJudge::new());
        let metric = JudgeMetricWrapper::new(judge.clone());

        let responses = vec![
            ModelResponse::new("القاهرة"),
            ModelResponse::new("الأمازون"),
        ];
        let scores = metric.compute(&responses, &docs()).await.unwrap();

        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0][LLM_AS_JUDGE], 1.0);
        assert_eq!(scores[1][LLM_AS_JUDGE], 0.0);
    }

    #[tokio::test]
    async fn test_compute_passes_query_and_gold_to_judge() {
        let judge = Arc::new(RecordingJudge::new());
        let metric = JudgeMetricWrapper::new(judge.clone());

        let docs = docs();
        let responses = vec![ModelResponse::new("a"), ModelResponse::new("b")];
        metric.compute(&responses, &docs).await.unwrap();

        let calls = judge.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        // The judge sees the full formatted query, not the bare question.
        assert_eq!(calls[0].0, docs[0].query);
        assert_eq!(calls[0].1, "a");
        assert_eq!(calls[0].2.as_deref(), Some("القاهرة"));
        assert_eq!(calls[1].2.as_deref(), Some("النيل"));
    }

    #[tokio::test]
    async fn test_compute_missing_response_judged_as_empty() {
        let judge = Arc::new(RecordingJudge::new());
        let metric = JudgeMetricWrapper::new(judge.clone());

        let scores = metric.compute(&[], &docs()).await.unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0][LLM_AS_JUDGE], 0.0);

        let calls = judge.calls.lock().unwrap();
        assert_eq!(calls[0].1, "");
    }

    #[test]
    fn test_aggregate_mean() {
        let metric = JudgeMetricWrapper::new(Arc::new(RecordingJudge::new()));
        assert_eq!(metric.aggregate(&[0.2, 0.8]), 0.5);
        assert_eq!(metric.aggregate(&[1.0]), 1.0);
    }

    #[test]
    fn test_aggregate_empty_is_zero() {
        let metric = JudgeMetricWrapper::new(Arc::new(RecordingJudge::new()));
        assert_eq!(metric.aggregate(&[]), 0.0);
    }

    #[test]
    fn test_metric_identity() {
        let metric = JudgeMetricWrapper::new(Arc::new(RecordingJudge::new()));
        assert_eq!(metric.name(), "llm_as_judge");
        assert_eq!(metric.category(), MetricCategory::LlmAsJudge);
        assert_eq!(metric.use_case(), MetricUseCase::None);
        assert!(metric.higher_is_better());
    }
}
