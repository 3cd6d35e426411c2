// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURAÇÃO DA PESQUISA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Configuração do cliente LLM e da saída, montada uma vez no início do
// processo e passada por referência. Todas as opções podem vir do .env
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::fmt;
use std::path::PathBuf;

use crate::prompts::{PromptError, PromptTemplate, MEMO_PLACEHOLDER, THEME_PLACEHOLDER};

/// Modelo padrão usado nos dois estágios
pub const DEFAULT_MODEL: &str = "gpt-4.1";

/// URL base padrão da API OpenAI
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Arquivo de saída padrão
pub const DEFAULT_OUTPUT_PATH: &str = "last_run_output.json";

/// Configuração imutável de uma execução.
#[derive(Clone)]
pub struct ResearchConfig {
    /// Chave da API. Não é validada aqui; a chamada remota falha se faltar.
    pub api_key: String,

    /// Identificador do modelo.
    /// Padrão: "gpt-4.1"
    pub model: String,

    /// URL base da API (sem barra final).
    pub base_url: String,

    /// Envia a ferramenta `web_search_preview` em cada chamada.
    /// Padrão: true
    pub web_search: bool,

    /// Onde salvar o resultado em JSON.
    pub output_path: PathBuf,

    /// Template alternativo para o estágio 1 (opcional)
    pub memo_prompt_file: Option<PathBuf>,

    /// Template alternativo para o estágio 2 (opcional)
    pub concepts_prompt_file: Option<PathBuf>,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            web_search: true,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            memo_prompt_file: None,
            concepts_prompt_file: None,
        }
    }
}

// A chave nunca aparece em logs.
impl fmt::Debug for ResearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResearchConfig")
            .field("api_key", &mask_key(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("web_search", &self.web_search)
            .field("output_path", &self.output_path)
            .field("memo_prompt_file", &self.memo_prompt_file)
            .field("concepts_prompt_file", &self.concepts_prompt_file)
            .finish()
    }
}

impl ResearchConfig {
    /// Cria configuração padrão com a chave informada.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Troca o modelo.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Troca a URL base (útil para apontar para um servidor de teste).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Liga ou desliga o web search.
    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }

    /// Endpoint completo da Responses API.
    pub fn responses_endpoint(&self) -> String {
        format!("{}/responses", self.base_url.trim_end_matches('/'))
    }

    /// Indica se há uma chave configurada.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Carrega os templates dos dois estágios, usando os arquivos
    /// configurados quando existirem e os embutidos caso contrário.
    pub fn load_templates(&self) -> Result<(PromptTemplate, PromptTemplate), PromptError> {
        let memo = match &self.memo_prompt_file {
            Some(path) => PromptTemplate::from_file("memo", path, THEME_PLACEHOLDER)?,
            None => PromptTemplate::memo(),
        };
        let concepts = match &self.concepts_prompt_file {
            Some(path) => PromptTemplate::from_file("concepts", path, MEMO_PLACEHOLDER)?,
            None => PromptTemplate::concepts(),
        };
        Ok((memo, concepts))
    }
}

/// Interpreta flags booleanas do .env.
///
/// Case-insensitive:
/// - "0", "false", "no", "off" → false
/// - qualquer outro valor → true
pub fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

fn mask_key(key: &str) -> String {
    if key.is_empty() {
        "<unset>".to_string()
    } else {
        let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
        format!("***{}", tail)
    }
}

/// Carrega a configuração a partir das variáveis de ambiente.
///
/// Variáveis suportadas:
/// - `OPENAI_API_KEY`: Chave da API
/// - `OZ_MODEL`: Modelo (padrão: "gpt-4.1")
/// - `OPENAI_BASE_URL`: URL base (padrão: "https://api.openai.com/v1")
/// - `OZ_WEB_SEARCH`: Liga/desliga web search (padrão: true)
/// - `OZ_OUTPUT`: Arquivo de saída (padrão: "last_run_output.json")
/// - `OZ_MEMO_PROMPT_FILE`: Template alternativo do estágio 1
/// - `OZ_CONCEPTS_PROMPT_FILE`: Template alternativo do estágio 2
///
/// # Exemplo
///
/// ```rust,ignore
/// // .env
/// OPENAI_API_KEY=sk-...
/// OZ_MODEL=gpt-4o
///
/// // código
/// let config = load_research_config();
/// assert_eq!(config.model, "gpt-4o");
/// ```
pub fn load_research_config() -> ResearchConfig {
    let mut config = ResearchConfig::default();

    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        config.api_key = key.trim().to_string();
    }
    if !config.has_api_key() {
        log::warn!("⚠ OPENAI_API_KEY não definida; as chamadas ao modelo vão falhar");
    }

    if let Ok(model) = std::env::var("OZ_MODEL") {
        if !model.trim().is_empty() {
            config.model = model.trim().to_string();
            log::info!("📦 OZ_MODEL={}", config.model);
        }
    }

    if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
        if !base_url.trim().is_empty() {
            config = config.with_base_url(base_url.trim());
            log::info!("📦 OPENAI_BASE_URL={}", config.base_url);
        }
    }

    if let Ok(flag) = std::env::var("OZ_WEB_SEARCH") {
        config.web_search = parse_flag(&flag);
        log::info!("📦 OZ_WEB_SEARCH={}", config.web_search);
    }

    if let Ok(output) = std::env::var("OZ_OUTPUT") {
        if !output.trim().is_empty() {
            config.output_path = PathBuf::from(output.trim());
            log::info!("📦 OZ_OUTPUT={}", config.output_path.display());
        }
    }

    if let Ok(path) = std::env::var("OZ_MEMO_PROMPT_FILE") {
        if !path.trim().is_empty() {
            config.memo_prompt_file = Some(PathBuf::from(path.trim()));
        }
    }

    if let Ok(path) = std::env::var("OZ_CONCEPTS_PROMPT_FILE") {
        if !path.trim().is_empty() {
            config.concepts_prompt_file = Some(PathBuf::from(path.trim()));
        }
    }

    log::debug!("🔧 {:?}", config);

    config
}
