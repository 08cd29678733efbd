use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::warn;

/// 模型返回的原始答案表 `{"respostas": {"1": "C", ...}}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnswerKey {
    #[serde(rename = "respostas", default)]
    pub answers: BTreeMap<String, serde_json::Value>,
}

/// 官方答案表中的一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEntry {
    /// 大写字母（判断题为 C / E，选择题为 A-E）
    Letter(String),
    /// 作废
    Annulled,
}

impl KeyEntry {
    pub fn parse(value: &str) -> Self {
        let normalized = value.trim().to_uppercase();
        match normalized.as_str() {
            "ANULADA" | "ANULADO" | "NULA" => KeyEntry::Annulled,
            "CERTO" => KeyEntry::Letter("C".to_string()),
            "ERRADO" => KeyEntry::Letter("E".to_string()),
            _ => KeyEntry::Letter(normalized),
        }
    }
}

/// 题号 → 官方答案
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey {
    entries: BTreeMap<u32, KeyEntry>,
}

impl AnswerKey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, number: u32, entry: KeyEntry) {
        self.entries.insert(number, entry);
    }

    pub fn get(&self, number: u32) -> Option<&KeyEntry> {
        self.entries.get(&number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 转换原始答案表；键不是题号的条目会被跳过
    pub fn from_raw(raw: RawAnswerKey) -> Self {
        let mut key = Self::new();
        for (number, value) in raw.answers {
            let Ok(parsed) = number.trim().parse::<u32>() else {
                warn!("⚠️ 答案表中的题号无法解析，已跳过: {:?}", number);
                continue;
            };
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => continue,
                other => other.to_string(),
            };
            key.insert(parsed, KeyEntry::parse(&text));
        }
        key
    }
}

impl FromIterator<(u32, KeyEntry)> for AnswerKey {
    fn from_iter<I: IntoIterator<Item = (u32, KeyEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_normalizes_entries() {
        let raw: RawAnswerKey = serde_json::from_str(
            r#"{"respostas": {"1": "c", "2": " E ", "3": "ANULADA", "x": "A", "4": null, "5": "Certo"}}"#,
        )
        .unwrap();
        let key = AnswerKey::from_raw(raw);

        assert_eq!(key.len(), 4);
        assert_eq!(key.get(1), Some(&KeyEntry::Letter("C".to_string())));
        assert_eq!(key.get(2), Some(&KeyEntry::Letter("E".to_string())));
        assert_eq!(key.get(3), Some(&KeyEntry::Annulled));
        assert_eq!(key.get(4), None);
        assert_eq!(key.get(5), Some(&KeyEntry::Letter("C".to_string())));
    }
}
