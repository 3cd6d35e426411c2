//! # Normalização da Resposta do Estágio 2
//!
//! Converte o texto cru devolvido pelo modelo em `Vec<Concept>`:
//!
//! 1. Remove espaços nas pontas
//! 2. Remove a cerca de código (```` ``` ```` / ```` ```json ````) se houver
//! 3. Faz o parse do JSON
//! 4. Extrai a lista `concepts` (ausente = vazia)
//! 5. Mapeia cada elemento para [`Concept`] com defaults por campo
//!
//! Uma única tentativa de parse. Qualquer formato inesperado vira erro
//! ([`NormalizeError`]); nada é convertido silenciosamente para `""`.

use serde_json::Value;

use crate::types::Concept;
use crate::utils::truncate_chars;

/// Campo de topo que contém a lista de conceitos
pub const CONCEPTS_KEY: &str = "concepts";

/// Quantos caracteres da resposta crua vão para o erro de parse
pub const RAW_EXCERPT_CHARS: usize = 1000;

const FENCE: &str = "```";

/// Erros de normalização
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// O texto não é JSON válido mesmo após remover a cerca
    #[error("Failed to parse JSON from concept response: {message}\nRaw output (truncated):\n{excerpt}")]
    Parse {
        /// Mensagem do parser (linha, coluna, motivo)
        message: String,
        /// Primeiros caracteres da resposta crua
        excerpt: String,
    },

    /// O JSON não tem o formato `{"concepts": [{...}, ...]}`, seja no topo
    /// ou em algum elemento da lista
    #[error("Concept response JSON has an unexpected shape ({reason}). Got keys: {keys:?}")]
    Schema {
        /// O que estava fora do formato
        reason: String,
        /// Chaves de topo, na ordem do documento
        keys: Vec<String>,
    },
}

impl NormalizeError {
    /// Chaves de topo encontradas, quando o erro é de schema
    pub fn keys(&self) -> Option<&[String]> {
        match self {
            Self::Schema { keys, .. } => Some(keys),
            _ => None,
        }
    }
}

/// Remove a cerca de código que alguns modelos colocam em volta do JSON.
///
/// Só age quando o texto (já sem espaços nas pontas) começa com ```` ``` ````:
/// tira todos os backticks iniciais, a tag `json` (case-insensitive) e o
/// whitespace seguinte, e a cerca final se existir.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    if !text.starts_with(FENCE) {
        return text;
    }

    let mut cleaned = text.trim_start_matches('`');

    if cleaned
        .get(..4)
        .is_some_and(|tag| tag.eq_ignore_ascii_case("json"))
    {
        cleaned = cleaned[4..].trim_start();
    }

    if let Some(inner) = cleaned.strip_suffix(FENCE) {
        cleaned = inner.trim();
    }

    cleaned
}

/// Faz o parse do texto (sem cerca) para JSON.
pub fn parse_payload(raw: &str) -> Result<Value, NormalizeError> {
    let raw = raw.trim();
    let cleaned = strip_code_fence(raw);

    serde_json::from_str(cleaned).map_err(|e| {
        log::warn!("⚠ JSON inválido na resposta de conceitos: {}", e);
        NormalizeError::Parse {
            message: e.to_string(),
            excerpt: truncate_chars(raw, RAW_EXCERPT_CHARS).to_string(),
        }
    })
}

/// Extrai e valida a lista de conceitos de um JSON já parseado.
pub fn extract_concepts(payload: Value) -> Result<Vec<Concept>, NormalizeError> {
    let mut object = match payload {
        Value::Object(object) => object,
        other => {
            return Err(NormalizeError::Schema {
                reason: format!("top-level value is {}", json_type_name(&other)),
                keys: vec![],
            })
        }
    };

    let keys: Vec<String> = object.keys().cloned().collect();

    let items = match object.remove(CONCEPTS_KEY) {
        None => {
            log::warn!("⚠ Resposta sem campo '{}'; nenhum conceito", CONCEPTS_KEY);
            return Ok(vec![]);
        }
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(NormalizeError::Schema {
                reason: format!("'{}' is {}", CONCEPTS_KEY, json_type_name(&other)),
                keys,
            });
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<Concept>(item).map_err(|e| NormalizeError::Schema {
                reason: format!("concept #{} is malformed: {}", index, e),
                keys: keys.clone(),
            })
        })
        .collect()
}

/// Pipeline completo: texto cru → conceitos.
pub fn normalize_concepts(raw: &str) -> Result<Vec<Concept>, NormalizeError> {
    let payload = parse_payload(raw)?;
    let concepts = extract_concepts(payload)?;
    log::debug!("🧩 {} conceitos normalizados", concepts.len());
    Ok(concepts)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BARE: &str = r#"{"concepts": [{"name": "CareLoop", "problem": "Readmissions", "why_now": "CMS penalties"}]}"#;

    #[test]
    fn test_strip_code_fence_json_tag() {
        let fenced = format!("```json\n{}\n```", BARE);
        assert_eq!(strip_code_fence(&fenced), BARE);
    }

    #[test]
    fn test_strip_code_fence_uppercase_tag_and_plain_fence() {
        assert_eq!(strip_code_fence("```JSON {\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_code_fence_without_closing_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_code_fence_leaves_bare_text() {
        assert_eq!(strip_code_fence("  {\"a\": 1}\n"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("json {}"), "json {}");
    }

    #[test]
    fn test_fenced_and_bare_are_equivalent() {
        let fenced = format!("\n```json\n{}\n```\n", BARE);
        assert_eq!(normalize_concepts(&fenced).unwrap(), normalize_concepts(BARE).unwrap());
    }

    #[test]
    fn test_bare_json_parses() {
        let concepts = normalize_concepts(BARE).unwrap();
        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].name, "CareLoop");
        assert_eq!(concepts[0].why_now, "CMS penalties");
        assert_eq!(concepts[0].solution, "");
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let concepts = normalize_concepts(r#"{"concepts": [{"name": "Acme"}]}"#).unwrap();
        assert_eq!(concepts, vec![Concept::named("Acme")]);
    }

    #[test]
    fn test_order_preserved_and_extra_keys_ignored() {
        let raw = r#"{"concepts": [{"name": "B", "score": 3}, {"name": "A"}, {}], "notes": "x"}"#;
        let names: Vec<_> = normalize_concepts(raw)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["B", "A", ""]);
    }

    #[test]
    fn test_missing_concepts_key_is_empty_list() {
        assert!(normalize_concepts(r#"{"ideas": []}"#).unwrap().is_empty());
        assert!(normalize_concepts(r#"{"concepts": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_concepts_not_a_list_is_schema_error() {
        let err = normalize_concepts(r#"{"concepts": "not a list", "meta": 1}"#).unwrap_err();
        assert!(matches!(err, NormalizeError::Schema { .. }));
        assert_eq!(err.keys().unwrap(), ["concepts", "meta"]);
        assert!(err.to_string().contains("a string"));
    }

    #[test]
    fn test_top_level_array_is_schema_error() {
        let err = normalize_concepts(r#"[{"name": "Acme"}]"#).unwrap_err();
        assert!(matches!(err, NormalizeError::Schema { .. }));
        assert!(err.keys().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_parse_error_with_reason() {
        let err = normalize_concepts("hello world").unwrap_err();
        match &err {
            NormalizeError::Parse { message, excerpt } => {
                assert!(message.contains("expected value"));
                assert_eq!(excerpt, "hello world");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("expected value"));
    }

    #[test]
    fn test_parse_error_excerpt_truncated_to_1000_chars() {
        let raw = "é".repeat(1500);
        match normalize_concepts(&raw).unwrap_err() {
            NormalizeError::Parse { excerpt, .. } => {
                assert_eq!(excerpt.chars().count(), RAW_EXCERPT_CHARS)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_schema_keys_follow_document_order() {
        let err = normalize_concepts(r#"{"meta": 1, "concepts": {}, "alpha": 2}"#).unwrap_err();
        assert_eq!(err.keys().unwrap(), ["meta", "concepts", "alpha"]);
    }

    #[test]
    fn test_non_object_element_fails_batch() {
        let err = normalize_concepts(r#"{"concepts": [{"name": "ok"}, "just a string"]}"#).unwrap_err();
        match &err {
            NormalizeError::Schema { reason, keys } => {
                assert!(reason.contains("concept #1"));
                assert!(reason.contains("just a string"));
                assert_eq!(keys, &["concepts"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_field_type_is_not_coerced() {
        let err = normalize_concepts(r#"{"concepts": [{"name": "Acme", "risks": ["a", "b"]}]}"#)
            .unwrap_err();
        assert!(matches!(err, NormalizeError::Schema { .. }));
        assert!(err.to_string().contains("concept #0"));
    }

    #[test]
    fn test_null_field_is_schema_error() {
        let err = normalize_concepts(r#"{"concepts": [{"name": null, "risks": null}]}"#).unwrap_err();
        assert!(matches!(err, NormalizeError::Schema { .. }));
    }
}
