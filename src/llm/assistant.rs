use crate::error::Result;
use crate::llm::client::GeminiClient;
use crate::llm::prompts::{chat_system_instruction, commentary_prompt, CHAT_GREETING};
use crate::llm::types::{ChatMessage, ChatRole, Content};
use crate::summary::NarrativeSummary;
use log::{info, warn};

pub struct FinancialAnalyst {
    client: GeminiClient,
    model: String,
}

impl FinancialAnalyst {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Short narrative commentary on the analysed statement.
    pub async fn commentary(&self, summary: &NarrativeSummary) -> Result<String> {
        let prompt = commentary_prompt(&summary.to_text());
        info!("Requesting commentary from {}", self.model);
        self.client
            .generate_content(&self.model, None, vec![Content::user(prompt)])
            .await
    }

    /// Opens a chat whose context is the analysed statement.
    pub fn start_chat(&self, summary: &NarrativeSummary) -> ChatSession {
        ChatSession::new(
            self.client.clone(),
            self.model.clone(),
            chat_system_instruction(&summary.to_text()),
        )
    }
}

/// Follow-up Q&A over one analysed statement.
///
/// `transcript` is what the user sees (greeting and error notices included);
/// `contents` is the turn history sent to the model.
pub struct ChatSession {
    client: GeminiClient,
    model: String,
    system_instruction: String,
    transcript: Vec<ChatMessage>,
    contents: Vec<Content>,
}

impl ChatSession {
    pub fn new(client: GeminiClient, model: String, system_instruction: String) -> Self {
        let mut session = Self {
            client,
            model,
            system_instruction,
            transcript: Vec::new(),
            contents: Vec::new(),
        };
        session.greet();
        session
    }

    fn greet(&mut self) {
        self.transcript
            .push(ChatMessage::new(ChatRole::Assistant, CHAT_GREETING));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub async fn send_message(&mut self, prompt: &str) -> Result<String> {
        self.transcript
            .push(ChatMessage::new(ChatRole::User, prompt));
        self.contents.push(Content::user(prompt));

        let reply = self
            .client
            .generate_content(
                &self.model,
                Some(&self.system_instruction),
                self.contents.clone(),
            )
            .await;

        match reply {
            Ok(text) => {
                self.contents.push(Content::model(text.clone()));
                self.transcript
                    .push(ChatMessage::new(ChatRole::Assistant, text.clone()));
                Ok(text)
            }
            Err(e) => {
                warn!("Chat turn failed: {}", e);
                // Drop the unanswered turn so the history keeps alternating roles.
                self.contents.pop();
                self.transcript
                    .push(ChatMessage::new(ChatRole::Assistant, format!("Error: {}", e)));
                Err(e)
            }
        }
    }

    /// Clears the conversation and starts again from the greeting.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.contents.clear();
        self.greet();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analyze, AnalysisConfig, LineItem};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn summary() -> NarrativeSummary {
        let items = vec![
            LineItem::new("CURRENT ASSETS", 400.0, 500.0),
            LineItem::new("TOTAL ASSETS", 1000.0, 1250.0),
            LineItem::new("CURRENT LIABILITIES", 200.0, 250.0),
        ];
        analyze(&items, &AnalysisConfig::default()).unwrap().summary
    }

    fn reply(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        }))
    }

    #[tokio::test]
    async fn test_commentary_sends_summary() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("Current ratio (current year)"))
            .respond_with(reply("Liquidity is stable."))
            .expect(1)
            .mount(&server)
            .await;

        let analyst = FinancialAnalyst::new(
            GeminiClient::new("k").with_base_url(server.uri()),
            "gemini-2.5-flash",
        );
        let text = analyst.commentary(&summary()).await.unwrap();
        assert_eq!(text, "Liquidity is stable.");
    }

    #[tokio::test]
    async fn test_chat_keeps_history_and_resets() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(reply("Current assets grew 25%."))
            .mount(&server)
            .await;

        let analyst = FinancialAnalyst::new(
            GeminiClient::new("k").with_base_url(server.uri()),
            "gemini-2.5-flash",
        );
        let mut chat = analyst.start_chat(&summary());
        assert_eq!(chat.messages().len(), 1);
        assert!(chat.system_instruction().contains("Full analysis table"));

        let answer = chat.send_message("How did current assets change?").await.unwrap();
        assert_eq!(answer, "Current assets grew 25%.");
        assert_eq!(chat.messages().len(), 3);
        assert_eq!(chat.messages()[1].role, ChatRole::User);
        assert_eq!(chat.messages()[2].role, ChatRole::Assistant);
        assert!(chat
            .messages()
            .windows(2)
            .all(|pair| pair[0].sent_at <= pair[1].sent_at));

        chat.reset();
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].content, CHAT_GREETING);
    }

    #[tokio::test]
    async fn test_chat_records_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let analyst = FinancialAnalyst::new(
            GeminiClient::new("k").with_base_url(server.uri()),
            "gemini-2.5-flash",
        );
        let mut chat = analyst.start_chat(&summary());

        assert!(chat.send_message("Hello?").await.is_err());
        let last = chat.messages().last().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert!(last.content.starts_with("Error:"));
    }
}
