// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS COMPARTILHADOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};

/// Nomes dos campos reconhecidos em um conceito, na ordem do schema.
pub const CONCEPT_FIELDS: [&str; 8] = [
    "name",
    "problem",
    "solution",
    "user",
    "why_now",
    "comparables",
    "differentiation",
    "risks",
];

/// Conceito de negócio gerado no estágio 2.
///
/// Todos os campos são texto e usam `""` quando ausentes no JSON de origem.
/// Campos extras no JSON são ignorados. Um campo presente com qualquer valor
/// que não seja string, inclusive `null`, é rejeitado na desserialização.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Concept {
    /// Nome do conceito
    pub name: String,
    /// Problema atacado
    pub problem: String,
    /// Solução proposta
    pub solution: String,
    /// Usuário / cliente alvo
    pub user: String,
    /// Por que agora
    pub why_now: String,
    /// Empresas ou produtos comparáveis
    pub comparables: String,
    /// Diferenciação frente aos comparáveis
    pub differentiation: String,
    /// Riscos principais
    pub risks: String,
}

impl Concept {
    /// Cria um conceito só com o nome, demais campos vazios.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Resultado agregado de uma execução completa do pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchResult {
    /// Tema OZ original informado pelo usuário
    pub oz_text: String,
    /// Memo expandido produzido pelo estágio 1
    pub expanded_memo: String,
    /// Conceitos na ordem devolvida pelo modelo (pode ser vazio)
    pub concepts: Vec<Concept>,
}
