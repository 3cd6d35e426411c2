// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RELATÓRIO E PERSISTÊNCIA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Resumo de console do ResearchResult e gravação em JSON indentado.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::fmt::Write as _;
use std::path::Path;

use crate::types::{Concept, ResearchResult};
use crate::utils::ellipsize;

/// Limite de caracteres por campo no resumo de console
pub const SUMMARY_FIELD_CHARS: usize = 200;

/// Erros de persistência
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Falha de serialização ou desserialização do JSON
    #[error("Failed to serialize research result: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Falha de leitura ou escrita do arquivo
    #[error("Failed to write {path}: {source}")]
    Io {
        /// Caminho do arquivo
        path: String,
        /// Erro de IO original
        #[source]
        source: std::io::Error,
    },
}

/// Resumo de um conceito: nome e Problem / Solution / Why now cortados.
pub fn format_concept_summary(index: usize, concept: &Concept) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Concept {}: {}", index, concept.name);
    let _ = writeln!(out, "  Problem      : {}", ellipsize(&concept.problem, SUMMARY_FIELD_CHARS));
    let _ = writeln!(out, "  Solution     : {}", ellipsize(&concept.solution, SUMMARY_FIELD_CHARS));
    let _ = writeln!(out, "  Why now      : {}", ellipsize(&concept.why_now, SUMMARY_FIELD_CHARS));
    out
}

/// Relatório completo de console: memo inteiro e resumo dos conceitos.
pub fn format_summary(result: &ResearchResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\n========== EXPANDED MEMO ==========\n");
    let _ = writeln!(out, "{}", result.expanded_memo);

    let _ = writeln!(out, "\n========== CONCEPTS (SUMMARY) ==========\n");
    if result.concepts.is_empty() {
        let _ = writeln!(out, "(no concepts returned)\n");
    }
    for (i, concept) in result.concepts.iter().enumerate() {
        let _ = writeln!(out, "{}", format_concept_summary(i + 1, concept));
    }

    out
}

/// Serializa o resultado em JSON indentado (2 espaços), sem escapar não-ASCII.
pub fn to_pretty_json(result: &ResearchResult) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Grava o resultado em `path`, sobrescrevendo qualquer arquivo anterior.
pub fn save_result(result: &ResearchResult, path: impl AsRef<Path>) -> Result<(), ReportError> {
    let path = path.as_ref();
    let json = to_pretty_json(result)?;

    std::fs::write(path, json).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;

    log::info!("💾 Resultado salvo em {}", path.display());
    Ok(())
}

/// Lê um resultado salvo anteriormente.
pub fn load_result(path: impl AsRef<Path>) -> Result<ResearchResult, ReportError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResearchResult {
        ResearchResult {
            oz_text: "cuidados cardíacos remotos".into(),
            expanded_memo: "Memo: análise com acentuação".into(),
            concepts: vec![Concept {
                name: "CareLoop".into(),
                problem: "p".repeat(250),
                solution: "Wearable patch".into(),
                why_now: "Reimbursement codes".into(),
                ..Concept::default()
            }],
        }
    }

    #[test]
    fn test_concept_summary_truncates_long_fields() {
        let summary = format_concept_summary(1, &sample().concepts[0]);
        assert!(summary.starts_with("Concept 1: CareLoop\n"));
        assert!(summary.contains(&format!("  Problem      : {}...\n", "p".repeat(200))));
        assert!(summary.contains("  Solution     : Wearable patch\n"));
        assert!(summary.contains("  Why now      : Reimbursement codes\n"));
    }

    #[test]
    fn test_format_summary_includes_memo() {
        let summary = format_summary(&sample());
        assert!(summary.contains("EXPANDED MEMO"));
        assert!(summary.contains("Memo: análise com acentuação"));
        assert!(summary.contains("Concept 1: CareLoop"));
    }

    #[test]
    fn test_pretty_json_shape_and_non_ascii() {
        let json = to_pretty_json(&sample()).unwrap();
        assert!(json.contains("cardíacos"));
        assert!(!json.contains("\\u"));
        assert!(json.starts_with("{\n  \"oz_text\""));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(value["concepts"][0].as_object().unwrap().len(), 8);
    }

    #[test]
    fn test_save_result_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last_run_output.json");
        std::fs::write(&path, "stale").unwrap();

        save_result(&sample(), &path).unwrap();
        assert_eq!(load_result(&path).unwrap(), sample());
    }

    #[test]
    fn test_save_result_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        assert!(matches!(save_result(&sample(), &path), Err(ReportError::Io { .. })));
    }
}
