//! OpenAI-compatible adapter for summary refinement.
//!
//! Supports OpenAI API, Azure OpenAI, and local Ollama instances.
//! The model only rewrites wording; every amount in the draft must survive.

use crate::domain::totals::format_soles;
use crate::domain::{DomainError, GeneratedDocument};
use crate::ports::AiPort;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// OpenAI-compatible AI adapter.
///
/// Can be configured to work with:
/// - OpenAI API (api.openai.com)
/// - Azure OpenAI
/// - Ollama (localhost)
/// - Any OpenAI-compatible API
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiAdapter {
    /// * `api_url` - API endpoint (e.g., "https://api.openai.com/v1/chat/completions")
    /// * `api_key` - API key (can be empty for local Ollama)
    /// * `model` - Model name (e.g., "gpt-4o-mini", "llama3.2")
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        }
    }

    fn system_prompt() -> &'static str {
        r#"Eres PILI, la asistente comercial de una empresa peruana de servicios eléctricos.

Reescribe el resumen que te entregan para el cliente:
- Tono cordial y profesional, en español neutro, máximo 4 oraciones.
- NO cambies, redondees ni omitas ningún monto, cantidad, área o código de documento.
- NO inventes datos que no estén en el resumen.
- Responde solo con el texto final, sin markdown ni comillas."#
    }

    fn user_prompt(document: &GeneratedDocument, draft: &str) -> String {
        format!(
            "Documento: {} {}\nCliente: {}\nTotal: {}\n\nResumen:\n{}",
            document.kind().label(),
            document.id(),
            document.client(),
            format_soles(document.totals().total),
            draft
        )
    }

    /// Strips code fences and wrapping quotes some models add around plain text.
    fn sanitize(raw_text: &str) -> String {
        let mut text = raw_text.trim();

        if let Some(rest) = text.strip_prefix("```") {
            // Drop an optional language tag on the opening fence
            let rest = match rest.find('\n') {
                Some(nl) => &rest[nl + 1..],
                None => rest,
            };
            text = rest.strip_suffix("```").unwrap_or(rest).trim();
        }

        if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            text = text[1..text.len() - 1].trim();
        }

        text.to_string()
    }

    /// Every soles amount in the draft must still appear verbatim.
    fn keeps_amounts(draft: &str, refined: &str) -> bool {
        draft
            .match_indices("S/ ")
            .map(|(start, _)| {
                let tail = &draft[start..];
                let end = tail
                    .char_indices()
                    .skip(3)
                    .find(|(_, c)| !(c.is_ascii_digit() || *c == ',' || *c == '.'))
                    .map(|(i, _)| i)
                    .unwrap_or(tail.len());
                tail[..end].trim_end_matches(['.', ','])
            })
            .all(|amount| refined.contains(amount))
    }
}

/// OpenAI API request structure.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI API response structure.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: String,
}

#[async_trait::async_trait]
impl AiPort for OpenAiAdapter {
    async fn refine_summary(
        &self,
        document: &GeneratedDocument,
        draft: &str,
    ) -> Result<String, DomainError> {
        info!(
            id = document.id(),
            draft_len = draft.len(),
            "sending summary to AI for refinement"
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Self::system_prompt().to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Self::user_prompt(document, draft),
                },
            ],
            temperature: 0.3,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Ai(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "AI API returned error");
            return Err(DomainError::Ai(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Ai(format!("Failed to parse API response: {}", e)))?;

        let raw_content = chat_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| DomainError::Ai("No response choices returned".to_string()))?;

        debug!(raw_len = raw_content.len(), "received AI response");

        let refined = Self::sanitize(&raw_content);
        if refined.is_empty() {
            return Err(DomainError::Ai("Empty refinement returned".to_string()));
        }
        if !Self::keeps_amounts(draft, &refined) {
            return Err(DomainError::Ai(
                "Refinement altered the quoted amounts".to_string(),
            ));
        }

        info!(id = document.id(), refined_len = refined.len(), "summary refined");
        Ok(refined)
    }
}
