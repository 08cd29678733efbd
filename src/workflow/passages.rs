//! 展开共享支撑文本
//!
//! 同一 `passage_id` 的题目里，模型只在第一题给出完整文本，
//! 其余题目使用占位符。按题号升序处理，第一次出现的文本作为该组的文本。

use std::collections::HashMap;
use tracing::warn;

use crate::models::{Passage, Question, ReviewFlag};

pub fn resolve_shared_passages(mut questions: Vec<Question>) -> (Vec<Question>, Vec<ReviewFlag>) {
    questions.sort_by_key(|q| q.number);

    let mut cache: HashMap<String, String> = HashMap::new();
    let mut flags = Vec::new();

    let resolved = questions
        .into_iter()
        .map(|question| match &question.passage {
            Passage::Text(text) => {
                if !question.passage_id.is_empty() {
                    cache
                        .entry(question.passage_id.clone())
                        .or_insert_with(|| text.clone());
                }
                question
            }
            Passage::SeeAbove => match cache.get(&question.passage_id) {
                Some(text) if !question.passage_id.is_empty() => Question {
                    passage: Passage::Text(text.clone()),
                    ..question
                },
                _ => {
                    warn!(
                        "⚠️ 第 {} 题的支撑文本无法展开 (texto_id: {:?})",
                        question.number, question.passage_id
                    );
                    flags.push(ReviewFlag::UnresolvedPassageReference {
                        number: question.number,
                        passage_id: question.passage_id.clone(),
                    });
                    Question {
                        passage: Passage::Empty,
                        ..question
                    }
                }
            },
            Passage::Empty => question,
        })
        .collect();

    (resolved, flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionKind;

    fn question(number: u32, passage_id: &str, text: &str) -> Question {
        Question {
            passage_id: passage_id.to_string(),
            passage: Passage::from_external(text),
            ..Question::new(number, QuestionKind::BinaryJudgment)
        }
    }

    #[test]
    fn test_placeholder_takes_first_text() {
        let (resolved, flags) = resolve_shared_passages(vec![
            question(1, "T1", "full text"),
            question(2, "T1", "[VER TEXTO ACIMA]"),
        ]);
        assert!(flags.is_empty());
        assert_eq!(resolved[1].passage, Passage::Text("full text".to_string()));
    }

    #[test]
    fn test_later_text_does_not_replace_cached_text() {
        let (resolved, _) = resolve_shared_passages(vec![
            question(1, "T1", "primeira versão"),
            question(2, "T1", "versão repetida"),
            question(3, "T1", "[VER TEXTO ACIMA]"),
        ]);
        assert_eq!(resolved[1].passage.as_external(), "versão repetida");
        assert_eq!(resolved[2].passage.as_external(), "primeira versão");
    }

    #[test]
    fn test_processing_follows_question_number() {
        // 输入顺序打乱，结果仍按题号处理
        let (resolved, flags) = resolve_shared_passages(vec![
            question(3, "T1", "[VER TEXTO ACIMA]"),
            question(2, "T1", "texto dois"),
            question(1, "T2", "outro"),
        ]);
        assert!(flags.is_empty());
        assert_eq!(resolved[0].number, 1);
        assert_eq!(resolved[2].passage.as_external(), "texto dois");
    }

    #[test]
    fn test_groups_do_not_leak() {
        let (resolved, _) = resolve_shared_passages(vec![
            question(1, "T1", "um"),
            question(2, "T2", "dois"),
            question(3, "T1", "[VER TEXTO ACIMA]"),
            question(4, "T2", "[VER TEXTO ACIMA]"),
        ]);
        assert_eq!(resolved[2].passage.as_external(), "um");
        assert_eq!(resolved[3].passage.as_external(), "dois");
    }

    #[test]
    fn test_unresolvable_placeholder_degrades_to_empty() {
        let (resolved, flags) = resolve_shared_passages(vec![
            question(1, "T9", "[VER TEXTO ACIMA]"),
            question(2, "", "[VER TEXTO ACIMA]"),
        ]);
        assert!(resolved.iter().all(|q| q.passage == Passage::Empty));
        assert_eq!(flags.len(), 2);
        assert_eq!(
            flags[0],
            ReviewFlag::UnresolvedPassageReference {
                number: 1,
                passage_id: "T9".to_string()
            }
        );
    }
}
