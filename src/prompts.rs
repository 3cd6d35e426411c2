//! # Prompts do Pipeline
//!
//! Templates dos dois estágios e a substituição de placeholders.
//!
//! - [`MEMO_TEMPLATE`] - Estágio 1: expande o tema OZ em um memo de 1-2 páginas
//! - [`CONCEPTS_TEMPLATE`] - Estágio 2: gera conceitos de negócio em JSON a partir do memo

use std::path::Path;

/// Placeholder do tema no template do estágio 1
pub const THEME_PLACEHOLDER: &str = "{{THEME}}";

/// Placeholder do memo no template do estágio 2
pub const MEMO_PLACEHOLDER: &str = "{{EXPANDED_MEMO}}";

/// Erros de montagem de prompts
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// O texto do template não contém o placeholder esperado
    #[error("Template '{template}' does not contain placeholder {placeholder}")]
    MissingPlaceholder {
        /// Nome do template
        template: String,
        /// Placeholder ausente
        placeholder: &'static str,
    },

    /// Falha ao ler o arquivo de template
    #[error("Failed to read prompt file {path}: {source}")]
    Io {
        /// Caminho do arquivo
        path: String,
        /// Erro de IO original
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// PROMPT 1: Memo de expansão do tema
// ============================================================================

/// Template do estágio 1. Executado com web search habilitado.
pub const MEMO_TEMPLATE: &str = r#"
You are a venture research analyst preparing an internal investment memo.
Use web search to ground every claim in recent, verifiable sources.

Write a 1-2 page memo that covers:
- The underlying shift (technology, regulation, demographics or cost curves) behind the theme
- Who feels the pain today and how they work around it
- Market size signals, spending patterns and budget owners
- Incumbents, recent startups and funding activity
- Open questions and where the theme could break down

You have already identified 1 high level idea which is {{THEME}}.
"#;

// ============================================================================
// PROMPT 2: Geração de conceitos (JSON)
// ============================================================================

/// Template do estágio 2. A resposta deve ser somente JSON.
pub const CONCEPTS_TEMPLATE: &str = r#"
You are a startup studio partner turning research into company concepts.
Use web search to check comparables and recent market activity.

Generate distinct business concepts that a new company could build.
For each concept be specific about the user, the wedge and why the timing is right.

Use the following expanded memo as input:
{{EXPANDED_MEMO}}

Respond ONLY with valid JSON in this exact format:
{
  "concepts": [
    {
      "name": "",
      "problem": "",
      "solution": "",
      "user": "",
      "why_now": "",
      "comparables": "",
      "differentiation": "",
      "risks": ""
    }
  ]
}
"#;

/// Substitui `placeholder` por `value` em `template`.
///
/// A substituição é literal, sem escape e sem limite de tamanho. O valor
/// inserido não é reprocessado, então tokens parecidos com placeholders
/// dentro dele ficam intactos. Sem o placeholder o template volta igual.
pub fn fill_placeholder(template: &str, placeholder: &str, value: &str) -> String {
    template.replace(placeholder, value)
}

/// Template nomeado com o placeholder que ele precisa conter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: String,
    text: String,
    placeholder: &'static str,
}

impl PromptTemplate {
    /// Cria um template sem validar; a validação acontece em [`render`](Self::render).
    pub fn new(name: impl Into<String>, text: impl Into<String>, placeholder: &'static str) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            placeholder,
        }
    }

    /// Template padrão do estágio 1
    pub fn memo() -> Self {
        Self::new("memo", MEMO_TEMPLATE, THEME_PLACEHOLDER)
    }

    /// Template padrão do estágio 2
    pub fn concepts() -> Self {
        Self::new("concepts", CONCEPTS_TEMPLATE, MEMO_PLACEHOLDER)
    }

    /// Carrega o texto do template de um arquivo, validando o placeholder.
    pub fn from_file(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        placeholder: &'static str,
    ) -> Result<Self, PromptError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PromptError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let template = Self::new(name, text, placeholder);
        template.validate()?;
        log::info!("📝 Template '{}' carregado de {}", template.name, path.display());
        Ok(template)
    }

    /// Falha se o placeholder não aparece no texto.
    pub fn validate(&self) -> Result<(), PromptError> {
        if self.text.contains(self.placeholder) {
            Ok(())
        } else {
            Err(PromptError::MissingPlaceholder {
                template: self.name.clone(),
                placeholder: self.placeholder,
            })
        }
    }

    /// Renderiza o template com `value`.
    ///
    /// Ao contrário de [`fill_placeholder`], um placeholder ausente é erro:
    /// o prompt nunca é enviado sem a substituição.
    pub fn render(&self, value: &str) -> Result<String, PromptError> {
        self.validate()?;
        Ok(fill_placeholder(&self.text, self.placeholder, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_placeholder_replaces_single_occurrence() {
        let template = "before {{THEME}} after";
        let filled = fill_placeholder(template, THEME_PLACEHOLDER, "heat pumps");
        assert_eq!(filled, "before heat pumps after");
    }

    #[test]
    fn test_fill_placeholder_does_not_expand_inserted_tokens() {
        let template = "A {{THEME}} B {{EXPANDED_MEMO}}";
        let filled = fill_placeholder(template, THEME_PLACEHOLDER, "x {{THEME}} y");
        assert_eq!(filled, "A x {{THEME}} y B {{EXPANDED_MEMO}}");
    }

    #[test]
    fn test_fill_placeholder_missing_is_noop() {
        let template = "no placeholder here";
        assert_eq!(fill_placeholder(template, THEME_PLACEHOLDER, "ignored"), template);
    }

    #[test]
    fn test_fill_placeholder_keeps_rest_byte_identical() {
        let filled = fill_placeholder(MEMO_TEMPLATE, THEME_PLACEHOLDER, "ração ✓");
        let (prefix, suffix) = MEMO_TEMPLATE.split_once(THEME_PLACEHOLDER).unwrap();
        assert!(filled.starts_with(prefix));
        assert!(filled.ends_with(suffix));
        assert_eq!(filled.len(), prefix.len() + "ração ✓".len() + suffix.len());
    }

    #[test]
    fn test_builtin_templates_contain_placeholders() {
        assert!(PromptTemplate::memo().validate().is_ok());
        assert!(PromptTemplate::concepts().validate().is_ok());
        assert!(CONCEPTS_TEMPLATE.contains("\"why_now\""));
    }

    #[test]
    fn test_render_missing_placeholder_is_error() {
        let template = PromptTemplate::new("broken", "nothing to fill", MEMO_PLACEHOLDER);
        let err = template.render("memo").unwrap_err();
        assert!(matches!(err, PromptError::MissingPlaceholder { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_from_file_validates_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        let bad = dir.path().join("bad.txt");
        std::fs::write(&good, "Theme: {{THEME}}").unwrap();
        std::fs::write(&bad, "Theme: missing").unwrap();

        let template = PromptTemplate::from_file("memo", &good, THEME_PLACEHOLDER).unwrap();
        assert_eq!(template.render("solar").unwrap(), "Theme: solar");

        assert!(PromptTemplate::from_file("memo", &bad, THEME_PLACEHOLDER).is_err());
        assert!(matches!(
            PromptTemplate::from_file("memo", dir.path().join("nope.txt"), THEME_PLACEHOLDER),
            Err(PromptError::Io { .. })
        ));
    }
}
