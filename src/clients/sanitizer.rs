//! 模型响应清洗
//!
//! 模型输出的 JSON 经常带有代码块标记、尾随逗号、控制字符，
//! 以及字符串内部未转义的换行。所有响应在解析之前都必须经过 [`sanitize`]。

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

use crate::error::ModelError;

static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z]*[ \t]*\r?\n?").expect("valid regex"));
static CLOSING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n?```\s*$").expect("valid regex"));
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("valid regex"));

/// 清洗模型响应，使其成为合法的 JSON 文本
pub fn sanitize(raw: &str) -> String {
    let text = strip_code_fence(raw.trim());
    let text = TRAILING_COMMA.replace_all(&text, "$1");
    let text = strip_control_chars(&text);
    escape_newlines_in_strings(&text)
}

/// 清洗并解析；失败时错误里带上原始响应
pub fn parse_model_json<T: DeserializeOwned>(raw: &str, label: &str) -> Result<T, ModelError> {
    let cleaned = sanitize(raw);
    serde_json::from_str(&cleaned).map_err(|source| ModelError::MalformedOutput {
        label: label.to_string(),
        raw: raw.to_string(),
        source,
    })
}

fn strip_code_fence(text: &str) -> String {
    if !text.starts_with("```") {
        return text.to_string();
    }
    let text = OPENING_FENCE.replace(text, "");
    CLOSING_FENCE.replace(&text, "").trim().to_string()
}

/// 去掉控制字符，保留 `\n` 和 `\r`
fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            let code = *c as u32;
            let control = code <= 0x09
                || code == 0x0B
                || code == 0x0C
                || (0x0E..=0x1F).contains(&code)
                || (0x7F..=0x9F).contains(&code);
            !control
        })
        .collect()
}

/// 字符串字面量内部的换行改写成 `\n` / `\r` 转义，结构性的换行保持不动
fn escape_newlines_in_strings(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if !in_string {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
            continue;
        }

        if escaped {
            escaped = false;
            out.push(c);
            continue;
        }

        match c {
            '\\' => {
                escaped = true;
                out.push(c);
            }
            '"' => {
                in_string = false;
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_strips_code_fence() {
        assert_eq!(sanitize("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(sanitize("```\n[1, 2]\n```  "), "[1, 2]");
        assert_eq!(sanitize("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_removes_trailing_commas() {
        let v: Value = serde_json::from_str(&sanitize("{\"a\": [1, 2, ], \"b\": {\"c\": 3,\n},}")).unwrap();
        assert_eq!(v["a"], serde_json::json!([1, 2]));
        assert_eq!(v["b"]["c"], 3);
    }

    #[test]
    fn test_strips_control_chars_but_keeps_structure() {
        let raw = "{\n\t\"a\":\u{0007} \"x\u{0085}y\"\n}";
        let v: Value = serde_json::from_str(&sanitize(raw)).unwrap();
        assert_eq!(v["a"], "xy");
    }

    #[test]
    fn test_newlines_inside_strings_survive_parsing() {
        let raw = "{\n  \"texto_base\": \"primeira linha\nsegunda linha\",\n  \"numero\": 1\n}";
        let cleaned = sanitize(raw);
        // 结构性换行不变
        assert!(cleaned.starts_with("{\n"));

        let v: Value = serde_json::from_str(&cleaned).unwrap();
        assert_eq!(v["texto_base"], "primeira linha\nsegunda linha");
        assert_eq!(v["numero"], 1);
    }

    #[test]
    fn test_escaped_quotes_do_not_toggle_string_state() {
        let raw = "{\"a\": \"diz \\\"oi\\\"\nfim\", \"b\": \"c:\\\\\"\n}";
        let v: Value = serde_json::from_str(&sanitize(raw)).unwrap();
        assert_eq!(v["a"], "diz \"oi\"\nfim");
        assert_eq!(v["b"], "c:\\");
    }

    #[test]
    fn test_carriage_returns_inside_strings() {
        let raw = "{\"a\": \"x\r\ny\"}\r\n";
        let v: Value = serde_json::from_str(&sanitize(raw)).unwrap();
        assert_eq!(v["a"], "x\r\ny");
    }

    #[test]
    fn test_parse_failure_keeps_raw_text() {
        let raw = "Desculpe, não consigo ler o PDF.";
        let err = parse_model_json::<Value>(raw, "metadata").unwrap_err();
        match err {
            ModelError::MalformedOutput { label, raw: kept, .. } => {
                assert_eq!(label, "metadata");
                assert_eq!(kept, raw);
            }
            other => panic!("意外的错误: {:?}", other),
        }
    }
}
