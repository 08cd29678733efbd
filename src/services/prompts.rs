//! 提示词模板
//!
//! 提示词面向葡萄牙语试卷，字段名必须与 `models` 中的 serde 重命名保持一致。

use crate::models::{ChunkRange, SEE_ABOVE_PLACEHOLDER};

/// 元数据提示词
pub const METADATA_PROMPT: &str = r#"
Analise este PDF de prova de concurso público.

Extraia APENAS os metadados e a quantidade de questões, neste formato:

{
  "concurso": "nome completo do concurso",
  "banca": "nome da banca organizadora",
  "ano": 2021,
  "cargo": "nome do cargo",
  "total_questoes": 120
}

REGRAS:
- Retorne APENAS o JSON válido, sem texto adicional
- "total_questoes" é o número da última questão da prova
"#;

/// 答案表提示词
pub const ANSWER_KEY_PROMPT: &str = r#"
Analise este PDF de gabarito oficial e extraia as respostas neste formato:

{
  "respostas": {
    "1": "C",
    "2": "E",
    "3": "A"
  }
}

REGRAS:
- Chave = número da questão (string)
- Valor = letra da resposta correta ("C" ou "E" para certo/errado; "A" a "E" para múltipla escolha)
- Questões anuladas recebem o valor "ANULADA"
- Retorne APENAS o JSON válido, sem texto adicional
"#;

/// 分块抽取提示词
///
/// `infer_answers` 为 false 时，要求模型在试卷没有答案时返回 -1，
/// 而不是自行推断。
pub fn chunk_prompt(range: ChunkRange, infer_answers: bool) -> String {
    let start = range.start;
    let end = range.end;
    let answer_rule = if infer_answers {
        "- Se o PDF não trouxer o gabarito, INFIRA a resposta correta com base no seu conhecimento"
    } else {
        "- Se o PDF não trouxer o gabarito, use \"gabarito\": -1 (NÃO tente adivinhar)"
    };

    format!(
        r#"
Analise este PDF de prova de concurso público.

Extraia APENAS as questões de número {start} até {end} (inclusive), no formato JSON:

{{
  "questoes": [
    {{
      "numero": {start},
      "disciplina": "Português",
      "texto_id": "CB1A1",
      "texto_base": "texto de apoio COMPLETO",
      "comando": "Julgue os itens que se seguem, a partir das ideias veiculadas no texto CB1A1.",
      "enunciado": "afirmativa a ser julgada",
      "alternativas": ["Certo", "Errado"],
      "tipo": "certo_errado",
      "gabarito": -1
    }}
  ]
}}

=== ESTRUTURA ===

1. TEXTO DE APOIO (quando existe): identificado por um código (ex.: "Texto CB1A1").
   - "texto_id": o código do texto
   - "texto_base": o conteúdo COMPLETO do texto
2. COMANDO: a frase que liga o texto aos itens, EXATAMENTE como no PDF.
3. ENUNCIADO: a afirmativa ou pergunta numerada, EXATAMENTE como no PDF.

=== REGRAS ===

1. Extraia SOMENTE questões de {start} a {end}; não inclua nenhuma outra
2. Preserve os textos exatamente como estão no PDF
3. Se várias questões compartilham o MESMO texto de apoio:
   - inclua "texto_base" completo apenas na PRIMEIRA questão do grupo
   - nas seguintes use "texto_base": "{placeholder}"
   - mantenha "texto_id" e "comando" em todas as questões do grupo
4. Sem texto de apoio: "texto_id", "texto_base" e "comando" como strings vazias ""
5. Infira a disciplina pelo contexto (Português, Direito Constitucional, Informática, ...)
6. Imagem essencial: descreva como [IMAGEM: descrição breve] no campo apropriado

=== ALTERNATIVAS ===

- Certo/errado: "alternativas": ["Certo", "Errado"], "tipo": "certo_errado"
- Múltipla escolha: "alternativas": ["A) ...", "B) ...", ...], "tipo": "multipla_escolha"

=== GABARITO ===

- "gabarito": índice da alternativa correta (0 = primeira); certo/errado: 0 = Certo, 1 = Errado
{answer_rule}

Retorne APENAS o JSON válido, sem texto adicional.
"#,
        start = start,
        end = end,
        placeholder = SEE_ABOVE_PLACEHOLDER,
        answer_rule = answer_rule,
    )
}
