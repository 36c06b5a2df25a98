//! Prompt templates for the ALRAGE QA task.
//!
//! The Arabic text matches the published OALL/ALRAGE task verbatim.

/// Collection of prompts used for answer generation and judging.
pub struct Prompts;

impl Prompts {
    /// Instruction line prepended to every QA query.
    pub fn qa_instruction() -> &'static str {
        "بناءً على السياقات المقترحة التالية، اجب عن السؤال التالي"
    }

    /// Full QA query shown to the model under evaluation.
    ///
    /// Placeholders: `{instruction}`, `{question}`, `{candidates}`.
    /// The trailing newline is part of the template.
    pub fn qa_query() -> &'static str {
        "{instruction}\n\nالسؤال:\n{question}\n\nالسياقات المقترحة:\n{candidates}\n"
    }

    /// System message for the judge model.
    pub fn judge_system() -> &'static str {
        r#"أنت مقيّم محايد خبير. مهمتك هي:
1. تقييم دقة الإجابة مقارنة بالإجابة الصحيحة
2. التحقق من أن الإجابة مدعومة بالسياق المقدم
3. تقييم جودة وشمولية الإجابة

قم بتقييم الإجابة على مقياس من 0 إلى 10."#
    }

    /// User message for the judge model.
    ///
    /// Placeholders: `{question}`, `{answer}`, `{gold}`.
    pub fn judge_user() -> &'static str {
        r#"{question}

الإجابة المقدمة: {answer}

الإجابة الصحيحة: {gold}

قيّم الإجابة على مقياس من 0 إلى 10، حيث:
- 0-2: إجابة خاطئة تماماً أو غير متعلقة
- 3-4: إجابة جزئية مع أخطاء كبيرة
- 5-6: إجابة متوسطة الدقة
- 7-8: إجابة جيدة مع بعض النقص
- 9-10: إجابة ممتازة ودقيقة

قدم تقييمك كرقم فقط."#
    }
}
