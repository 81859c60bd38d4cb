//! 按薄弱知识点生成练习题

use serde::Deserialize;

use super::analysis::strip_code_fences;
use super::client::LlmClient;
use crate::models::questions::PracticeQuestion;

#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionsReply {
    List(Vec<PracticeQuestion>),
    Wrapped { questions: Vec<PracticeQuestion> },
}

pub fn build_questions_prompt(topics: &[String]) -> String {
    format!(
        "Generate one practice question for each of these topics: {}. \
         Format as JSON: [{{topic, question}}]",
        topics.join(", ")
    )
}

fn placeholders(topics: &[String]) -> Vec<PracticeQuestion> {
    topics.iter().map(|t| PracticeQuestion::placeholder(t)).collect()
}

/// 解析回复，无法解析时返回 None
pub fn parse_questions_response(text: &str) -> Option<Vec<PracticeQuestion>> {
    let body = strip_code_fences(text);
    let parsed = serde_json::from_str::<QuestionsReply>(body).ok().or_else(|| {
        let start = body.find('[')?;
        let end = body.rfind(']')?;
        (end > start)
            .then(|| serde_json::from_str::<QuestionsReply>(&body[start..=end]).ok())
            .flatten()
    })?;

    let questions = match parsed {
        QuestionsReply::List(list) => list,
        QuestionsReply::Wrapped { questions } => questions,
    };
    (!questions.is_empty()).then_some(questions)
}

/// 生成练习题，LLM 不可用、调用失败或回复无法解析时每个知识点返回占位题目
pub async fn generate_questions(
    client: Option<&LlmClient>,
    topics: &[String],
) -> Vec<PracticeQuestion> {
    let Some(client) = client.filter(|c| c.is_available()) else {
        return placeholders(topics);
    };

    match client.complete(&build_questions_prompt(topics)).await {
        Ok(reply) => parse_questions_response(&reply).unwrap_or_else(|| {
            tracing::warn!("Could not parse generated questions, using placeholders");
            placeholders(topics)
        }),
        Err(e) => {
            tracing::warn!("Question generation failed, using placeholders: {}", e);
            placeholders(topics)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ai::client::test_support::{completion_body, llm_config};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn topics() -> Vec<String> {
        vec!["Fractions".to_string(), "Decimals".to_string()]
    }

    #[test]
    fn test_prompt_lists_topics() {
        assert_eq!(
            build_questions_prompt(&topics()),
            "Generate one practice question for each of these topics: Fractions, Decimals. \
             Format as JSON: [{topic, question}]"
        );
    }

    #[test]
    fn test_parse_plain_and_wrapped() {
        let plain = r#"[{"topic": "Fractions", "question": "What is 1/3 + 1/3?"}]"#;
        assert_eq!(parse_questions_response(plain).unwrap()[0].topic, "Fractions");

        let wrapped = "```json\n{\"questions\": [{\"topic\": \"Decimals\", \"question\": \"0.1 + 0.2?\"}]}\n```";
        assert_eq!(parse_questions_response(wrapped).unwrap()[0].question, "0.1 + 0.2?");

        let chatty = "Here you go:\n[{\"topic\": \"Ratios\", \"question\": \"Simplify 4:8\"}]\nGood luck!";
        assert_eq!(parse_questions_response(chatty).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_questions_response("1. What is a fraction?").is_none());
        assert!(parse_questions_response("[]").is_none());
    }

    #[tokio::test]
    async fn test_generate_without_client_uses_placeholders() {
        let questions = generate_questions(None, &topics()).await;
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question, "Practice question for Fractions: ...");
    }

    #[tokio::test]
    async fn test_generate_with_unparseable_reply_uses_placeholders() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion_body("Sure! Q1: ...")),
            )
            .mount(&server)
            .await;

        let client = LlmClient::new(llm_config(&server.uri())).unwrap();
        let questions = generate_questions(Some(&client), &topics()).await;
        assert_eq!(questions[1], PracticeQuestion::placeholder("Decimals"));
    }
}
