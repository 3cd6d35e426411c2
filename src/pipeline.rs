// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PIPELINE DE PESQUISA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Orquestra os dois estágios em sequência:
// 1. Tema OZ → memo expandido (web search)
// 2. Memo → conceitos em JSON → Vec<Concept>
//
// Sem resultado parcial: se qualquer etapa falha, a execução inteira falha
// com o erro original.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::sync::Arc;
use std::time::Instant;

use crate::config::ResearchConfig;
use crate::llm::{CompletionClient, LlmError, OpenAiResponsesClient};
use crate::normalizer::{normalize_concepts, NormalizeError};
use crate::prompts::{PromptError, PromptTemplate};
use crate::types::{Concept, ResearchResult};
use crate::utils::word_count;

/// Erros de uma execução do pipeline
#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    /// Tema vazio ou só com espaços
    #[error("OZ theme is empty")]
    EmptyTheme,

    /// Template sem placeholder ou ilegível
    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// Falha de transporte em qualquer estágio
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Resposta do estágio 2 fora do formato
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Pipeline de dois estágios sobre um [`CompletionClient`].
pub struct ResearchPipeline {
    client: Arc<dyn CompletionClient>,
    memo_template: PromptTemplate,
    concepts_template: PromptTemplate,
}

impl ResearchPipeline {
    /// Cria o pipeline com os templates embutidos.
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            memo_template: PromptTemplate::memo(),
            concepts_template: PromptTemplate::concepts(),
        }
    }

    /// Cria o pipeline real (OpenAI) a partir da configuração.
    pub fn from_config(config: &ResearchConfig) -> Result<Self, PromptError> {
        let (memo, concepts) = config.load_templates()?;
        let client: Arc<dyn CompletionClient> = Arc::new(OpenAiResponsesClient::new(config));
        Self::new(client).with_templates(memo, concepts)
    }

    /// Troca os templates. Ambos precisam conter seus placeholders.
    pub fn with_templates(
        mut self,
        memo_template: PromptTemplate,
        concepts_template: PromptTemplate,
    ) -> Result<Self, PromptError> {
        memo_template.validate()?;
        concepts_template.validate()?;
        self.memo_template = memo_template;
        self.concepts_template = concepts_template;
        Ok(self)
    }

    /// Estágio 1: expande o tema em um memo.
    pub async fn expand_theme(&self, oz_text: &str) -> Result<String, ResearchError> {
        let prompt = self.memo_template.render(oz_text)?;
        let memo = self.client.complete(&prompt).await?;
        Ok(memo)
    }

    /// Estágio 2: gera os conceitos a partir do memo.
    pub async fn generate_concepts(&self, expanded_memo: &str) -> Result<Vec<Concept>, ResearchError> {
        let prompt = self.concepts_template.render(expanded_memo)?;
        let raw = self.client.complete(&prompt).await?;
        Ok(normalize_concepts(&raw)?)
    }

    /// Executa os dois estágios para um tema OZ e monta o resultado.
    pub async fn run_research_for_oz(&self, oz_text: &str) -> Result<ResearchResult, ResearchError> {
        if oz_text.trim().is_empty() {
            return Err(ResearchError::EmptyTheme);
        }

        let start = Instant::now();

        log::info!("🔎 Estágio 1 (expandir tema) para OZ: {}", oz_text);
        let expanded_memo = self.expand_theme(oz_text).await?;
        log::info!(
            "✅ Estágio 1 concluído: memo com {} palavras ({}ms)",
            word_count(&expanded_memo),
            start.elapsed().as_millis()
        );

        log::info!("💡 Estágio 2 (geração de conceitos)...");
        let concepts = self.generate_concepts(&expanded_memo).await?;
        log::info!(
            "✅ Estágio 2 concluído: {} conceitos gerados ({}ms total)",
            concepts.len(),
            start.elapsed().as_millis()
        );

        Ok(ResearchResult {
            oz_text: oz_text.to_string(),
            expanded_memo,
            concepts,
        })
    }
}
