//! LLM-as-judge scoring for Arabic QA answers.
//!
//! The judge model is asked for a 0-10 rating, which is normalized to a
//! score in [0, 1]. Replies that contain no usable number score 0.0
//! rather than failing the run.

use crate::config::LlmConfig;
use crate::error::Result;
use crate::llm::{LlmClient, Message, Prompts, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Build the two-message Arabic judge prompt for one answer.
///
/// `options` is accepted for future multiple-choice variants and is not
/// referenced by the current template. A missing gold answer renders as
/// an empty string.
pub fn judge_template(
    question: &str,
    answer: &str,
    gold: Option<&str>,
    _options: Option<&[String]>,
) -> Vec<Message> {
    let user = Prompts::judge_user()
        .replace("{question}", question)
        .replace("{answer}", answer)
        .replace("{gold}", gold.unwrap_or(""));

    vec![Message::system(Prompts::judge_system()), Message::user(user)]
}

/// A judge reply in either of the shapes the backend hands back.
#[derive(Debug, Clone, Copy)]
pub enum JudgeReply<'a> {
    /// The judge's reply text.
    Text(&'a str),
    /// A full message transcript. Some backends echo the conversation
    /// instead of returning the reply alone; in that case only the
    /// user-role contents are scanned for a score.
    Messages(&'a [Message]),
}

/// Extract a normalized score from a judge reply.
///
/// The reply is split on whitespace and the first token that is a plain
/// decimal numeral (at most one dot) is taken as the 0-10 rating, then
/// divided by 10 and clamped into [0, 1]. Arabic-Indic digits count as
/// digits. If no token qualifies, the score is 0.0.
pub fn process_judge_response(reply: JudgeReply<'_>) -> f64 {
    let content = match reply {
        JudgeReply::Text(text) => text.to_string(),
        JudgeReply::Messages(messages) => messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join(" "),
    };

    content
        .split_whitespace()
        .find_map(parse_score_token)
        .map(|score| (score / 10.0).clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

/// Map Arabic-Indic and Extended Arabic-Indic digits to ASCII digits,
/// leaving all other characters untouched.
fn fold_digits(token: &str) -> String {
    token
        .chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
            _ => c,
        })
        .collect()
}

/// Parse a single token as a 0-10 rating, if it qualifies.
fn parse_score_token(token: &str) -> Option<f64> {
    let token = fold_digits(token);

    // Valid tokens are digits with at most one decimal point.
    let without_dot = token.replacen('.', "", 1);
    if without_dot.is_empty() || !without_dot.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    token.parse().ok()
}

/// Outcome of judging a single answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Judgment {
    /// Normalized score in [0, 1].
    pub score: f64,
    /// The messages that were sent to the judge model.
    pub prompt: Vec<Message>,
    /// The judge's raw reply text.
    pub raw_response: String,
}

/// A model that scores answers against a gold reference.
///
/// Transport failures surface as errors; an unparseable reply is not an
/// error and scores 0.0.
#[async_trait]
pub trait Judge: Send + Sync {
    async fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
        options: Option<&[String]>,
        gold: Option<&str>,
    ) -> Result<Judgment>;
}

/// Judge backed by an OpenAI-compatible chat endpoint.
pub struct LlmJudge {
    client: LlmClient,
}

impl LlmJudge {
    /// Create a new judge with the given LLM client.
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    /// Create from LLM config.
    pub fn from_config(config: LlmConfig) -> Self {
        Self::new(LlmClient::new(config))
    }

    /// The judge model name.
    pub fn model(&self) -> &str {
        self.client.model()
    }
}

#[async_trait]
impl Judge for LlmJudge {
    async fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
        options: Option<&[String]>,
        gold: Option<&str>,
    ) -> Result<Judgment> {
        let prompt = judge_template(question, answer, gold, options);
        let response = self.client.chat(prompt.clone()).await?;
        let score = process_judge_response(JudgeReply::Text(&response.content));

        Ok(Judgment {
            score,
            prompt,
            raw_response: response.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_plain_integer() {
        assert_eq!(process_judge_response(JudgeReply::Text("8")), 0.8);
        assert_eq!(process_judge_response(JudgeReply::Text("0")), 0.0);
        assert_eq!(process_judge_response(JudgeReply::Text("10")), 1.0);
    }

    #[test]
    fn test_score_embedded_in_text() {
        assert_eq!(
            process_judge_response(JudgeReply::Text("النتيجة: 8 من 10")),
            0.8
        );
    }

    #[test]
    fn test_score_decimal() {
        assert_eq!(process_judge_response(JudgeReply::Text("7.5")), 0.75);
        assert_eq!(process_judge_response(JudgeReply::Text(".5")), 0.05);
    }

    #[test]
    fn test_no_numeral_scores_zero() {
        assert_eq!(process_judge_response(JudgeReply::Text("ممتاز")), 0.0);
        assert_eq!(process_judge_response(JudgeReply::Text("")), 0.0);
        assert_eq!(process_judge_response(JudgeReply::Text("  \n ")), 0.0);
    }

    #[test]
    fn test_score_clamps_above_ten() {
        assert_eq!(process_judge_response(JudgeReply::Text("12")), 1.0);
        assert_eq!(process_judge_response(JudgeReply::Text("100")), 1.0);
    }

    #[test]
    fn test_negative_token_is_not_a_numeral() {
        // '-' disqualifies the token, so the scan moves on.
        assert_eq!(process_judge_response(JudgeReply::Text("-3")), 0.0);
        assert_eq!(process_judge_response(JudgeReply::Text("-3 6")), 0.6);
    }

    #[test]
    fn test_first_numeral_token_wins() {
        assert_eq!(process_judge_response(JudgeReply::Text("8 ثم 3")), 0.8);
        assert_eq!(
            process_judge_response(JudgeReply::Text("التقييم من 10 هو 2")),
            1.0
        );
    }

    #[test]
    fn test_multiple_dots_disqualify_token() {
        assert_eq!(process_judge_response(JudgeReply::Text("8.5.2 7")), 0.7);
        assert_eq!(process_judge_response(JudgeReply::Text("1.2.3")), 0.0);
    }

    #[test]
    fn test_arabic_indic_digits() {
        assert_eq!(process_judge_response(JudgeReply::Text("٨")), 0.8);
        assert_eq!(
            process_judge_response(JudgeReply::Text("التقييم: ٩ من ١٠")),
            0.9
        );
        // Extended Arabic-Indic digits as used in Persian-influenced text.
        assert_eq!(process_judge_response(JudgeReply::Text("۷")), 0.7);
    }

    #[test]
    fn test_message_transcript_scans_user_content_only() {
        let messages = vec![
            Message::system("أنت مقيّم 5"),
            Message::user("8"),
            Message::assistant("9"),
        ];
        assert_eq!(process_judge_response(JudgeReply::Messages(&messages)), 0.8);
    }

    #[test]
    fn test_message_transcript_joins_user_contents() {
        let messages = vec![Message::user("النتيجة"), Message::user("6")];
        assert_eq!(process_judge_response(JudgeReply::Messages(&messages)), 0.6);
    }

    #[test]
    fn test_message_transcript_without_user_content() {
        let messages = vec![Message::system("نظام"), Message::assistant("7")];
        assert_eq!(process_judge_response(JudgeReply::Messages(&messages)), 0.0);
        assert_eq!(process_judge_response(JudgeReply::Messages(&[])), 0.0);
    }

    #[test]
    fn test_template_shape() {
        let messages = judge_template("سؤال", "إجابة", Some("ذهبية"), None);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[0].content.contains("من 0 إلى 10"));
        assert!(messages[1].content.starts_with("سؤال"));
        assert!(messages[1].content.contains("الإجابة المقدمة: إجابة"));
        assert!(messages[1].content.contains("الإجابة الصحيحة: ذهبية"));
        assert!(messages[1].content.contains("قدم تقييمك كرقم فقط."));
    }

    #[test]
    fn test_template_missing_gold_renders_empty() {
        let messages = judge_template("سؤال", "إجابة", None, None);
        assert!(messages[1].content.contains("الإجابة الصحيحة: \n"));
    }

    #[test]
    fn test_template_ignores_options() {
        let options = vec!["أ".to_string(), "ب".to_string()];
        let with = judge_template("سؤال", "إجابة", Some("ذهبية"), Some(&options));
        let without = judge_template("سؤال", "إجابة", Some("ذهبية"), None);
        assert_eq!(with, without);
    }

    #[test]
    fn test_format_then_judge_one_record() {
        use crate::document::{qa_prompt_arabic, DatasetRecord};

        let record = DatasetRecord::new(
            "ما هي عاصمة مصر؟",
            vec!["القاهرة".to_string(), "الإسكندرية".to_string()],
            "القاهرة",
        );
        let doc = qa_prompt_arabic(&record, "alrage_qa");

        assert!(doc.query.contains("القاهرة, الإسكندرية"));
        assert_eq!(doc.gold(), Some("القاهرة"));

        let prompt = judge_template(&doc.query, "القاهرة", doc.gold(), None);
        assert!(prompt[1].content.contains("ما هي عاصمة مصر؟"));

        assert_eq!(process_judge_response(JudgeReply::Text("9")), 0.9);
    }
}
