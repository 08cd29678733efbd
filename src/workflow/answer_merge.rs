//! 合并官方答案

use tracing::warn;

use crate::models::{Answer, AnswerKey, KeyEntry, Question, QuestionKind, ReviewFlag};

/// 选择题字母 → 选项索引
fn letter_index(letter: &str) -> Option<usize> {
    match letter {
        "A" => Some(0),
        "B" => Some(1),
        "C" => Some(2),
        "D" => Some(3),
        "E" => Some(4),
        _ => None,
    }
}

/// 按题型把官方答案转换为答案状态
pub fn answer_from_key(kind: QuestionKind, entry: &KeyEntry) -> Answer {
    match entry {
        KeyEntry::Annulled => Answer::Annulled,
        KeyEntry::Letter(letter) => match kind {
            QuestionKind::BinaryJudgment => {
                if letter == "C" {
                    Answer::Resolved(0)
                } else {
                    Answer::Resolved(1)
                }
            }
            QuestionKind::MultipleChoice => letter_index(letter)
                .map(Answer::Resolved)
                .unwrap_or(Answer::Unresolved),
        },
    }
}

/// 把官方答案应用到题目上
///
/// 答案表里没有的题保持原来的临时答案，并记录 `MissingAnswerKeyEntry`。
pub fn merge_answers(questions: Vec<Question>, key: &AnswerKey) -> (Vec<Question>, Vec<ReviewFlag>) {
    let mut flags = Vec::new();
    let merged = questions
        .into_iter()
        .map(|question| match key.get(question.number) {
            Some(entry) => Question {
                answer: answer_from_key(question.kind, entry),
                ..question
            },
            None => {
                warn!("⚠️ 答案表中没有第 {} 题，需要人工复核", question.number);
                flags.push(ReviewFlag::MissingAnswerKeyEntry {
                    number: question.number,
                });
                question
            }
        })
        .collect();
    (merged, flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(entries: &[(u32, &str)]) -> AnswerKey {
        entries
            .iter()
            .map(|(n, v)| (*n, KeyEntry::parse(v)))
            .collect()
    }

    #[test]
    fn test_binary_judgment_mapping() {
        let questions = vec![
            Question::new(1, QuestionKind::BinaryJudgment),
            Question::new(2, QuestionKind::BinaryJudgment),
            Question::new(3, QuestionKind::BinaryJudgment),
        ];
        let (merged, flags) = merge_answers(questions, &key(&[(1, "C"), (2, "E"), (3, "ANULADA")]));

        assert!(flags.is_empty());
        assert_eq!(merged[0].answer.index(), 0);
        assert!(!merged[0].answer.is_annulled());
        assert_eq!(merged[1].answer.index(), 1);
        assert_eq!(merged[2].answer.index(), -1);
        assert!(merged[2].answer.is_annulled());
    }

    #[test]
    fn test_multiple_choice_mapping() {
        let questions = vec![
            Question::new(1, QuestionKind::MultipleChoice),
            Question::new(2, QuestionKind::MultipleChoice),
        ];
        let (merged, _) = merge_answers(questions, &key(&[(1, "D"), (2, "F")]));
        assert_eq!(merged[0].answer, Answer::Resolved(3));
        assert_eq!(merged[1].answer, Answer::Unresolved);
        assert_eq!(merged[1].answer.index(), -1);
    }

    #[test]
    fn test_missing_entry_keeps_provisional() {
        let question = Question {
            answer: Answer::Provisional(1),
            ..Question::new(7, QuestionKind::BinaryJudgment)
        };
        let (merged, flags) = merge_answers(vec![question], &AnswerKey::new());
        assert_eq!(merged[0].answer, Answer::Provisional(1));
        assert_eq!(flags, vec![ReviewFlag::MissingAnswerKeyEntry { number: 7 }]);
    }
}
