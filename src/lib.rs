//! # OZ Research
//!
//! Pipeline de pesquisa em dois estágios sobre um modelo de linguagem:
//!
//! 1. Recebe um tema OZ curto (ex: "remote patient monitoring for CHF patients")
//! 2. Expande o tema em um memo de pesquisa usando web search
//! 3. Transforma o memo em uma lista de conceitos de negócio em JSON
//! 4. Valida o JSON e normaliza cada conceito para um schema fixo
//!
//! ## Arquitetura
//!
//! | Módulo | Papel |
//! |--------|-------|
//! | `prompts` | Templates e substituição de placeholders |
//! | `llm` | Trait `CompletionClient` + cliente OpenAI |
//! | `normalizer` | Cerca de código, parse JSON e schema dos conceitos |
//! | `pipeline` | Orquestração dos dois estágios |
//! | `report` | Resumo de console e persistência em JSON |
//!
//! Execução estritamente sequencial: o estágio 2 só roda depois do 1, sem
//! retry e sem resultado parcial.
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use oz_research::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_research_config();
//!     let pipeline = ResearchPipeline::from_config(&config)?;
//!     let result = pipeline.run_research_for_oz("climate risk for small insurers").await?;
//!     println!("{} conceitos", result.concepts.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Tipos de dados do pipeline.
///
/// - [`Concept`]: conceito de negócio com 8 campos de texto
/// - [`ResearchResult`]: tema + memo + conceitos
pub mod types;

/// Templates dos dois estágios e substituição de placeholders.
pub mod prompts;

/// Clientes de completion (OpenAI Responses API e cliente roteirizado).
pub mod llm;

/// Normalização da resposta JSON do estágio 2.
pub mod normalizer;

/// Orquestração dos dois estágios.
pub mod pipeline;

/// Resumo de console e persistência do resultado.
pub mod report;

/// Utilitários de texto.
pub mod utils;

/// Configuração via variáveis de ambiente.
///
/// - `OPENAI_API_KEY`: Chave da API
/// - `OZ_MODEL`: Modelo (padrão: "gpt-4.1")
/// - `OPENAI_BASE_URL`: URL base (padrão: "https://api.openai.com/v1")
/// - `OZ_WEB_SEARCH`: Web search nas chamadas (padrão: true)
/// - `OZ_OUTPUT`: Arquivo de saída (padrão: "last_run_output.json")
/// - `OZ_MEMO_PROMPT_FILE` / `OZ_CONCEPTS_PROMPT_FILE`: Templates alternativos
pub mod config;

// Re-exports principais
pub use config::{load_research_config, ResearchConfig};
pub use llm::{CompletionClient, LlmError, OpenAiResponsesClient};
pub use normalizer::{normalize_concepts, NormalizeError};
pub use pipeline::{ResearchError, ResearchPipeline};
pub use types::*;

/// Versão da biblioteca.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude com imports comuns para uso rápido.
///
/// ```rust,ignore
/// use oz_research::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{load_research_config, ResearchConfig};
    pub use crate::llm::{CompletionClient, LlmError, OpenAiResponsesClient, ScriptedCompletionClient};
    pub use crate::normalizer::{normalize_concepts, NormalizeError};
    pub use crate::pipeline::{ResearchError, ResearchPipeline};
    pub use crate::prompts::{fill_placeholder, PromptTemplate};
    pub use crate::report::{format_summary, save_result};
    pub use crate::types::*;
}
