use serde_json::Value;

use super::de::{lenient_i64, lenient_options, lenient_string, lenient_u32};

/// 模型用来表示"同上一题的支撑文本"的占位符
pub const SEE_ABOVE_PLACEHOLDER: &str = "[VER TEXTO ACIMA]";

/// 字段级的解析问题：(字段名, 原因)
pub type FieldIssue = (&'static str, String);

/// 模型返回的原始题目（字段名与提示词中的 JSON 一致）
#[derive(Debug, Clone, Default)]
pub struct RawQuestion {
    pub number: Option<u32>,
    pub discipline: String,
    pub passage_id: String,
    pub passage_text: String,
    pub prompt: String,
    pub statement: String,
    pub options: Vec<String>,
    pub kind: String,
    pub answer: Option<i64>,
}

impl RawQuestion {
    /// 逐字段宽松解析
    ///
    /// 某个字段类型不对时只把该字段留空并记录，其它字段照常读取。
    pub fn from_entry(entry: &Value) -> (Self, Vec<FieldIssue>) {
        let mut issues = Vec::new();
        let raw = Self {
            number: field(entry, "numero", &mut issues, |v| lenient_u32(v)),
            discipline: field(entry, "disciplina", &mut issues, |v| lenient_string(v)),
            passage_id: field(entry, "texto_id", &mut issues, |v| lenient_string(v)),
            passage_text: field(entry, "texto_base", &mut issues, |v| lenient_string(v)),
            prompt: field(entry, "comando", &mut issues, |v| lenient_string(v)),
            statement: field(entry, "enunciado", &mut issues, |v| lenient_string(v)),
            options: field(entry, "alternativas", &mut issues, |v| lenient_options(v)),
            kind: field(entry, "tipo", &mut issues, |v| lenient_string(v)),
            answer: field(entry, "gabarito", &mut issues, |v| lenient_i64(v)),
        };
        (raw, issues)
    }
}

fn field<T: Default>(
    entry: &Value,
    name: &'static str,
    issues: &mut Vec<FieldIssue>,
    parse: impl FnOnce(&Value) -> Result<T, serde_json::Error>,
) -> T {
    match entry.get(name) {
        Some(value) => parse(value).unwrap_or_else(|e| {
            issues.push((name, e.to_string()));
            T::default()
        }),
        None => T::default(),
    }
}

fn binary_options() -> Vec<String> {
    vec!["Certo".to_string(), "Errado".to_string()]
}

/// 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// 判断题（Certo / Errado）
    BinaryJudgment,
    /// 选择题
    MultipleChoice,
}

impl QuestionKind {
    /// 按模型给出的 `tipo` 识别题型；无法识别时按选项数量推断
    pub fn from_external(tipo: &str, option_count: usize) -> Self {
        let tipo = tipo.trim().to_lowercase();
        if tipo.contains("certo") || tipo.contains("errado") {
            QuestionKind::BinaryJudgment
        } else if tipo.contains("multipla") || tipo.contains("múltipla") {
            QuestionKind::MultipleChoice
        } else if option_count == 2 {
            QuestionKind::BinaryJudgment
        } else {
            QuestionKind::MultipleChoice
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::BinaryJudgment => "certo_errado",
            QuestionKind::MultipleChoice => "multipla_escolha",
        }
    }
}

/// 支撑文本的状态
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Passage {
    #[default]
    Empty,
    Text(String),
    /// 与同一 `passage_id` 第一次出现的文本相同
    SeeAbove,
}

impl Passage {
    pub fn from_external(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Passage::Empty
        } else if trimmed == SEE_ABOVE_PLACEHOLDER {
            Passage::SeeAbove
        } else {
            Passage::Text(text.to_string())
        }
    }

    /// 输出 JSON 中的文本（占位符按原样输出）
    pub fn as_external(&self) -> &str {
        match self {
            Passage::Empty => "",
            Passage::Text(text) => text,
            Passage::SeeAbove => SEE_ABOVE_PLACEHOLDER,
        }
    }
}

/// 答案状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Answer {
    /// 没有可用答案（-1）
    #[default]
    Unresolved,
    /// 合并官方答案之前的临时值
    Provisional(usize),
    /// 由官方答案确定
    Resolved(usize),
    /// 官方答案宣布作废（-1，anulada = true）
    Annulled,
}

impl Answer {
    /// 对外的 `gabarito` 值
    pub fn index(self) -> i64 {
        match self {
            Answer::Provisional(i) | Answer::Resolved(i) => i as i64,
            Answer::Unresolved | Answer::Annulled => -1,
        }
    }

    pub fn is_annulled(self) -> bool {
        matches!(self, Answer::Annulled)
    }
}

/// 一道题
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub number: u32,
    pub discipline: String,
    /// 共享文本分组，空串表示没有
    pub passage_id: String,
    pub passage: Passage,
    pub prompt: String,
    pub statement: String,
    pub options: Vec<String>,
    pub kind: QuestionKind,
    pub answer: Answer,
    pub id: Option<String>,
}

impl Question {
    pub fn new(number: u32, kind: QuestionKind) -> Self {
        let options = match kind {
            QuestionKind::BinaryJudgment => binary_options(),
            QuestionKind::MultipleChoice => Vec::new(),
        };
        Self {
            number,
            discipline: String::new(),
            passage_id: String::new(),
            passage: Passage::Empty,
            prompt: String::new(),
            statement: String::new(),
            options,
            kind,
            answer: Answer::Unresolved,
            id: None,
        }
    }

    /// 由模型原始输出构造；没有有效题号时返回 None
    ///
    /// 只有 `accept_model_answers` 为 true 时才保留模型自己给出的答案，
    /// 并且索引必须落在选项范围内。判断题没有给出选项时补上 Certo / Errado。
    pub fn from_raw(raw: RawQuestion, accept_model_answers: bool) -> Option<Self> {
        let number = raw.number.filter(|n| *n > 0)?;
        let kind = QuestionKind::from_external(&raw.kind, raw.options.len());
        let options = match kind {
            QuestionKind::BinaryJudgment if raw.options.is_empty() => binary_options(),
            _ => raw.options,
        };
        let answer = match raw.answer {
            Some(i) if accept_model_answers && i >= 0 && (i as usize) < options.len() => {
                Answer::Provisional(i as usize)
            }
            _ => Answer::Unresolved,
        };
        Some(Self {
            number,
            discipline: raw.discipline.trim().to_string(),
            passage_id: raw.passage_id.trim().to_string(),
            passage: Passage::from_external(&raw.passage_text),
            prompt: raw.prompt,
            statement: raw.statement,
            options,
            kind,
            answer,
            id: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawQuestion {
        RawQuestion::from_entry(&serde_json::from_str(json).unwrap()).0
    }

    #[test]
    fn test_from_raw_maps_fields() {
        let q = Question::from_raw(
            raw(r#"{
                "numero": 3,
                "disciplina": " Português ",
                "texto_id": "CB1A1",
                "texto_base": "[VER TEXTO ACIMA]",
                "comando": "Julgue os itens.",
                "enunciado": "O texto é narrativo.",
                "alternativas": ["Certo", "Errado"],
                "tipo": "certo_errado",
                "gabarito": 0
            }"#),
            false,
        )
        .unwrap();

        assert_eq!(q.number, 3);
        assert_eq!(q.discipline, "Português");
        assert_eq!(q.passage, Passage::SeeAbove);
        assert_eq!(q.kind, QuestionKind::BinaryJudgment);
        // 默认不接受模型推断的答案
        assert_eq!(q.answer, Answer::Unresolved);
    }

    #[test]
    fn test_from_raw_accepts_model_answer_when_enabled() {
        let q = Question::from_raw(
            raw(r#"{"numero": 1, "alternativas": ["A) x", "B) y", "C) z"], "gabarito": 2}"#),
            true,
        )
        .unwrap();
        assert_eq!(q.kind, QuestionKind::MultipleChoice);
        assert_eq!(q.answer, Answer::Provisional(2));

        let q = Question::from_raw(
            raw(r#"{"numero": 1, "alternativas": ["Certo", "Errado"], "gabarito": 5}"#),
            true,
        )
        .unwrap();
        assert_eq!(q.answer, Answer::Unresolved);
    }

    #[test]
    fn test_from_raw_requires_positive_number() {
        assert!(Question::from_raw(raw(r#"{"enunciado": "x"}"#), false).is_none());
        assert!(Question::from_raw(raw(r#"{"numero": 0}"#), false).is_none());
    }

    #[test]
    fn test_kind_inferred_from_option_count() {
        assert_eq!(
            QuestionKind::from_external("", 2),
            QuestionKind::BinaryJudgment
        );
        assert_eq!(
            QuestionKind::from_external("", 5),
            QuestionKind::MultipleChoice
        );
        assert_eq!(
            QuestionKind::from_external("Múltipla Escolha", 2),
            QuestionKind::MultipleChoice
        );
    }

    #[test]
    fn test_answer_external_index() {
        assert_eq!(Answer::Resolved(3).index(), 3);
        assert_eq!(Answer::Annulled.index(), -1);
        assert_eq!(Answer::Unresolved.index(), -1);
    }

    #[test]
    fn test_from_entry_keeps_question_when_field_is_mistyped() {
        let (raw, issues) = RawQuestion::from_entry(&serde_json::json!({
            "numero": "2",
            "enunciado": {"texto": "x"},
            "alternativas": "Certo / Errado",
            "tipo": "certo_errado"
        }));
        assert_eq!(raw.number, Some(2));
        assert_eq!(raw.statement, "");
        assert_eq!(raw.options, vec!["Certo / Errado"]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].0, "enunciado");
    }

    #[test]
    fn test_binary_question_without_options_gets_certo_errado() {
        let q = Question::from_raw(raw(r#"{"numero": 4, "tipo": "certo_errado"}"#), false).unwrap();
        assert_eq!(q.kind, QuestionKind::BinaryJudgment);
        assert_eq!(q.options, vec!["Certo", "Errado"]);
    }
}
