// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLIENTE LLM
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Trait e implementações para chamadas de completion.
// Uma chamada por invocação, sem retry: qualquer falha sobe para o chamador.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ResearchConfig;

/// Erros de transporte do cliente LLM
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Resposta HTTP não-2xx
    #[error("API error ({status}): {body}")]
    ApiError {
        /// Status HTTP
        status: u16,
        /// Corpo da resposta
        body: String,
    },

    /// HTTP 429 (só reportado, sem retry)
    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    /// Corpo 2xx que não é o JSON esperado
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Falha de conexão ou de leitura
    #[error("Network error: {0}")]
    NetworkError(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        Self::NetworkError(e.to_string())
    }
}

/// Trait principal para clientes de completion.
///
/// Recebe o prompt já montado e devolve o texto agregado da resposta.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Envia o prompt e devolve o texto gerado
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO OPENAI (RESPONSES API)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsesBody {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesBody {
    /// Texto agregado: `output_text` quando vier pronto, senão a concatenação
    /// de todas as partes `output_text` das mensagens.
    fn aggregated_text(self) -> String {
        if let Some(text) = self.output_text {
            return text;
        }

        self.output
            .into_iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content)
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text)
            .collect()
    }
}

/// Cliente para a Responses API da OpenAI, com web search opcional.
pub struct OpenAiResponsesClient {
    api_key: String,
    model: String,
    endpoint: String,
    web_search: bool,
    client: reqwest::Client,
}

impl OpenAiResponsesClient {
    /// Cria o cliente a partir da configuração compartilhada.
    pub fn new(config: &ResearchConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: config.responses_endpoint(),
            web_search: config.web_search,
            client: reqwest::Client::new(),
        }
    }

    /// Modelo configurado
    pub fn model(&self) -> &str {
        &self.model
    }

    fn tools(&self) -> Vec<Tool> {
        if self.web_search {
            vec![Tool {
                kind: "web_search_preview",
            }]
        } else {
            vec![]
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiResponsesClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = ResponsesRequest {
            model: &self.model,
            input: prompt,
            tools: self.tools(),
        };

        log::debug!(
            "📤 POST {} | model={} | {} chars | web_search={}",
            self.endpoint,
            self.model,
            prompt.len(),
            self.web_search
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(LlmError::RateLimitError(body));
            }
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let body: ResponsesBody = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let text = body.aggregated_text();
        if text.is_empty() {
            log::warn!("⚠ Resposta do modelo sem texto de saída");
        }
        log::debug!("📥 {} chars recebidos", text.len());

        Ok(text)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO ROTEIRIZADA PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Cliente que devolve respostas pré-definidas em ordem e registra os prompts.
#[derive(Debug, Default)]
pub struct ScriptedCompletionClient {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletionClient {
    /// Cria um cliente sem respostas
    pub fn new() -> Self {
        Self::default()
    }

    /// Cria um cliente com respostas de sucesso, na ordem dada
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client = Self::new();
        for response in responses {
            client.push(Ok(response.into()));
        }
        client
    }

    /// Enfileira mais uma resposta
    pub fn push(&self, response: Result<String, LlmError>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
    }

    /// Prompts recebidos até agora, na ordem das chamadas
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Número de chamadas feitas
    pub fn calls(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        self.responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| Err(LlmError::ApiError {
                status: 500,
                body: "No scripted response left".into(),
            }))
    }
}
