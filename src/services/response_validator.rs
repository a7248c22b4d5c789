use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};
use crate::models::quiz::{QuizQuestion, QuizSet, QUIZ_OPTION_COUNT, QUIZ_QUESTION_COUNT};

/// Removes one surrounding Markdown code fence (```` ``` ```` or ```` ```json ````).
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

pub fn accept_summary(raw: &str) -> Result<String> {
    if raw.trim().is_empty() {
        return Err(Error::MalformedGeneration(
            "summary completion was empty".to_string(),
        ));
    }
    Ok(raw.to_string())
}

/// Parses a quiz completion. Fails closed: any deviation from the expected
/// shape rejects the whole response.
pub fn parse_quiz(raw: &str) -> Result<QuizSet> {
    let cleaned = strip_code_fences(raw);
    let parsed: JsonValue = serde_json::from_str(cleaned)
        .map_err(|e| malformed(format!("completion is not valid JSON: {}", e)))?;

    let questions = parsed
        .get("questions")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| malformed("missing 'questions' array"))?;

    if questions.len() != QUIZ_QUESTION_COUNT {
        return Err(malformed(format!(
            "expected {} questions, got {}",
            QUIZ_QUESTION_COUNT,
            questions.len()
        )));
    }

    let questions = questions
        .iter()
        .enumerate()
        .map(|(idx, value)| parse_question(idx, value))
        .collect::<Result<Vec<_>>>()?;

    Ok(QuizSet::new_unchecked(questions))
}

fn parse_question(idx: usize, value: &JsonValue) -> Result<QuizQuestion> {
    let obj = value
        .as_object()
        .ok_or_else(|| malformed(format!("question {} is not an object", idx)))?;

    let question = non_empty_str(obj, "question", idx)?;
    let explanation = non_empty_str(obj, "explanation", idx)?;

    let options = obj
        .get("options")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| malformed(format!("question {} has no 'options' array", idx)))?;
    if options.len() != QUIZ_OPTION_COUNT {
        return Err(malformed(format!(
            "question {} has {} options, expected {}",
            idx,
            options.len(),
            QUIZ_OPTION_COUNT
        )));
    }
    let options = options
        .iter()
        .map(|o| o.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| malformed(format!("question {} has a non-string option", idx)))?;

    let correct = obj
        .get("correct")
        .and_then(JsonValue::as_u64)
        .ok_or_else(|| malformed(format!("question {} has no integer 'correct'", idx)))?;
    if correct >= QUIZ_OPTION_COUNT as u64 {
        return Err(malformed(format!(
            "question {} has correct index {} out of range",
            idx, correct
        )));
    }

    Ok(QuizQuestion {
        question,
        options,
        correct: correct as usize,
        explanation,
    })
}

fn non_empty_str(obj: &Map<String, JsonValue>, field: &str, idx: usize) -> Result<String> {
    obj.get(field)
        .and_then(JsonValue::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| malformed(format!("question {} has no '{}'", idx, field)))
}

fn malformed(reason: impl Into<String>) -> Error {
    Error::MalformedGeneration(reason.into())
}
