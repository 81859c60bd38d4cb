//! 作答批改：构造提示词、调用 LLM、解析回复

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::client::LlmClient;
use crate::models::analysis::AnalysisResult;

static SCORE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)"?score"?\s*[:=]\s*"?(-?\d+(?:\.\d+)?)"#).expect("Invalid score regex")
});
static WEAK_TOPICS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)weak[ _]?topics?"?\s*[:=]\s*"?([\w, ]+)"#).expect("Invalid weak topics regex")
});
static SUGGESTIONS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)suggestions?"?\s*[:=]\s*"?([\w, ]+)"#).expect("Invalid suggestions regex")
});

pub fn build_analysis_prompt(worksheet_text: &str, answer_key_text: &str) -> String {
    format!(
        "Compare the following worksheet and answer key. Worksheet: {worksheet_text}\n\n\
         Answer Key: {answer_key_text}\n\n\
         Give a score (0-100), list weak topics, and suggestions. \
         Respond only with JSON of the form \
         {{\"score\": number, \"weakTopics\": [string], \"suggestions\": [string]}}."
    )
}

/// 去掉 Markdown 代码块包裹
pub(crate) fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // 跳过语言标记（如 ```json），单行代码块的内容紧跟在标记之后
    let tag_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    let (tag, body) = rest.split_at(tag_len);
    let is_language_tag =
        tag.is_empty() || body.starts_with(|c: char| c.is_whitespace() || c == '{' || c == '[');
    let body = if is_language_tag { body } else { rest };
    body.trim().trim_end_matches("```").trim()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_score(value: &Value) -> Option<i32> {
    let score = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    score
        .is_finite()
        .then(|| score.round().clamp(0.0, 100.0) as i32)
}

// 列表字段既可能是数组，也可能是逗号分隔的字符串
fn parse_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => split_list(s),
        _ => Vec::new(),
    }
}

fn from_json_value(value: &Value) -> Option<AnalysisResult> {
    let object = value.as_object()?;
    let field = |names: &[&str]| names.iter().find_map(|name| object.get(*name));

    Some(AnalysisResult {
        score: field(&["score"]).and_then(parse_score).unwrap_or(0),
        weak_topics: parse_list(field(&["weakTopics", "weak_topics"])),
        suggestions: parse_list(field(&["suggestions"])),
        questions: field(&["questions"])
            .and_then(|q| serde_json::from_value(q.clone()).ok())
            .unwrap_or_default(),
    })
}

fn parse_json(text: &str) -> Option<AnalysisResult> {
    if let Some(result) = serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| from_json_value(&v))
    {
        return Some(result);
    }
    // 回复中夹杂说明文字时，取第一个对象
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&text[start..=end])
        .ok()
        .and_then(|v| from_json_value(&v))
}

fn parse_with_regex(text: &str) -> AnalysisResult {
    let score = SCORE_RE
        .captures(text)
        .and_then(|c| c[1].parse::<f64>().ok())
        .map_or(0, |s| s.round().clamp(0.0, 100.0) as i32);
    let weak_topics = WEAK_TOPICS_RE
        .captures(text)
        .map(|c| split_list(&c[1]))
        .unwrap_or_default();
    let suggestions = SUGGESTIONS_RE
        .captures(text)
        .map(|c| split_list(&c[1]))
        .unwrap_or_default();

    AnalysisResult {
        score,
        weak_topics,
        suggestions,
        questions: Vec::new(),
    }
}

/// 解析 LLM 回复：优先严格 JSON，否则按正则提取
pub fn parse_analysis_response(text: &str) -> AnalysisResult {
    let body = strip_code_fences(text);
    parse_json(body)
        .unwrap_or_else(|| {
            tracing::debug!("LLM reply is not JSON, falling back to regex parsing");
            parse_with_regex(body)
        })
        .clamped()
}

/// 比对作答与答案。LLM 不可用或调用失败时返回演示数据
pub async fn analyze_worksheet(
    client: Option<&LlmClient>,
    worksheet_text: &str,
    answer_key_text: &str,
) -> AnalysisResult {
    let Some(client) = client.filter(|c| c.is_available()) else {
        tracing::info!("LLM not configured, returning mock analysis");
        return AnalysisResult::mock();
    };

    let prompt = build_analysis_prompt(worksheet_text, answer_key_text);
    match client.complete(&prompt).await {
        Ok(reply) => parse_analysis_response(&reply),
        Err(e) => {
            tracing::warn!("Worksheet analysis failed, returning mock result: {}", e);
            AnalysisResult::mock()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ai::client::test_support::{completion_body, llm_config};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_prompt_contains_both_texts() {
        let prompt = build_analysis_prompt("2+2=5", "2+2=4");
        assert!(prompt.starts_with("Compare the following worksheet and answer key. Worksheet: 2+2=5"));
        assert!(prompt.contains("\n\nAnswer Key: 2+2=4\n\n"));
        assert!(prompt.contains("Give a score (0-100), list weak topics, and suggestions."));
    }

    #[test]
    fn test_parse_strict_json() {
        let result = parse_analysis_response(
            r#"{"score": 72, "weakTopics": ["Fractions"], "suggestions": ["Drill halves"]}"#,
        );
        assert_eq!(result.score, 72);
        assert_eq!(result.weak_topics, vec!["Fractions"]);
        assert_eq!(result.suggestions, vec!["Drill halves"]);
    }

    #[test]
    fn test_parse_fenced_json_with_snake_case() {
        let reply = "```json\n{\"score\": 64, \"weak_topics\": [\"Ratios\"], \"suggestions\": []}\n```";
        let result = parse_analysis_response(reply);
        assert_eq!(result.score, 64);
        assert_eq!(result.weak_topics, vec!["Ratios"]);
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn test_parse_fractional_and_string_scores() {
        let result = parse_analysis_response(r#"{"score": 85.5, "weakTopics": ["Fractions"]}"#);
        assert_eq!(result.score, 86);
        assert_eq!(result.weak_topics, vec!["Fractions"]);

        let result = parse_analysis_response(r#"{"score": "85", "weakTopics": ["Decimals"]}"#);
        assert_eq!(result.score, 85);
        assert_eq!(result.weak_topics, vec!["Decimals"]);

        assert_eq!(parse_analysis_response(r#"{"score": "90%"}"#).score, 90);
        assert_eq!(parse_analysis_response(r#"{"score": "n/a"}"#).score, 0);
    }

    #[test]
    fn test_parse_comma_separated_lists() {
        let result = parse_analysis_response(
            r#"{"score": 70, "weakTopics": "Fractions, Decimals", "suggestions": "Review halves,  Use number lines"}"#,
        );
        assert_eq!(result.score, 70);
        assert_eq!(result.weak_topics, vec!["Fractions", "Decimals"]);
        assert_eq!(result.suggestions, vec!["Review halves", "Use number lines"]);
    }

    #[test]
    fn test_parse_json_with_surrounding_prose() {
        let reply = r#"Here is the analysis: {"score": 77.4, "weak_topics": "Ratios"} Hope it helps."#;
        let result = parse_analysis_response(reply);
        assert_eq!(result.score, 77);
        assert_eq!(result.weak_topics, vec!["Ratios"]);
    }

    #[test]
    fn test_parse_single_line_fence() {
        let reply = r#"```json{"score": 81, "weakTopics": ["Geometry"]}```"#;
        let result = parse_analysis_response(reply);
        assert_eq!(result.score, 81);
        assert_eq!(result.weak_topics, vec!["Geometry"]);

        let reply = r#"```{"score": 60}```"#;
        assert_eq!(parse_analysis_response(reply).score, 60);
    }

    #[test]
    fn test_regex_fallback_on_broken_json() {
        let reply = r#"{"score": 83, "weakTopics": Fractions, Decimals"#;
        let result = parse_analysis_response(reply);
        assert_eq!(result.score, 83);
        assert_eq!(result.weak_topics, vec!["Fractions", "Decimals"]);
    }

    #[test]
    fn test_parse_regex_fallback() {
        let reply = "Score: 75\nWeak topics: Fractions, Word problems\nSuggestions: Practice daily, Review notes";
        let result = parse_analysis_response(reply);
        assert_eq!(result.score, 75);
        assert_eq!(result.weak_topics, vec!["Fractions", "Word problems"]);
        assert_eq!(result.suggestions, vec!["Practice daily", "Review notes"]);
    }

    #[test]
    fn test_parse_missing_score_defaults_to_zero() {
        let result = parse_analysis_response("weak topic = Geometry");
        assert_eq!(result.score, 0);
        assert_eq!(result.weak_topics, vec!["Geometry"]);
    }

    #[test]
    fn test_parse_clamps_score() {
        assert_eq!(parse_analysis_response("score: 250").score, 100);
        assert_eq!(parse_analysis_response(r#"{"score": -5}"#).score, 0);
    }

    #[tokio::test]
    async fn test_analyze_without_client_returns_mock() {
        assert_eq!(analyze_worksheet(None, "a", "b").await, AnalysisResult::mock());
    }

    #[tokio::test]
    async fn test_analyze_uses_llm_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
                r#"{"score": 91, "weakTopics": ["Decimals"], "suggestions": ["Line up the points"]}"#,
            )))
            .mount(&server)
            .await;

        let client = LlmClient::new(llm_config(&server.uri())).unwrap();
        let result = analyze_worksheet(Some(&client), "work", "key").await;
        assert_eq!(result.score, 91);
        assert_eq!(result.weak_topics, vec!["Decimals"]);
    }

    #[tokio::test]
    async fn test_analyze_falls_back_to_mock_on_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = LlmClient::new(llm_config(&server.uri())).unwrap();
        let result = analyze_worksheet(Some(&client), "work", "key").await;
        assert_eq!(result, AnalysisResult::mock());
    }
}
