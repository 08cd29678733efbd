use crate::models::{ExamMetadata, OutputRecord, Question};
use crate::workflow::ids::question_id;

/// 把试卷元数据并入每道题，得到扁平的输出记录
///
/// 还没有 ID 的题目会按同样的规则补上。
pub fn flatten(metadata: &ExamMetadata, questions: &[Question]) -> Vec<OutputRecord> {
    questions
        .iter()
        .map(|q| OutputRecord {
            board: metadata.board.clone(),
            exam_name: metadata.exam_name.clone(),
            year: metadata.year,
            role: metadata.role.clone(),
            number: q.number,
            discipline: q.discipline.clone(),
            passage_id: q.passage_id.clone(),
            passage_text: q.passage.as_external().to_string(),
            prompt: q.prompt.clone(),
            statement: q.statement.clone(),
            options: q.options.clone(),
            kind: q.kind.as_str().to_string(),
            answer_index: q.answer.index(),
            annulled: q.answer.is_annulled(),
            id: q
                .id
                .clone()
                .unwrap_or_else(|| question_id(metadata, q.number)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Answer, QuestionKind};

    #[test]
    fn test_flatten_always_emits_optional_fields() {
        let meta = ExamMetadata {
            exam_name: "PF 2021".to_string(),
            board: "CEBRASPE".to_string(),
            year: Some(2021),
            role: "Agente".to_string(),
            total_questions: 1,
        };
        let question = Question {
            answer: Answer::Annulled,
            statement: "Item".to_string(),
            ..Question::new(1, QuestionKind::BinaryJudgment)
        };

        let records = flatten(&meta, &[question]);
        assert_eq!(records.len(), 1);
        let json = serde_json::to_value(&records[0]).unwrap();

        assert_eq!(json["banca"], "CEBRASPE");
        assert_eq!(json["concurso"], "PF 2021");
        assert_eq!(json["ano"], 2021);
        assert_eq!(json["texto_id"], "");
        assert_eq!(json["texto_base"], "");
        assert_eq!(json["comando"], "");
        assert_eq!(json["tipo"], "certo_errado");
        assert_eq!(json["gabarito"], -1);
        assert_eq!(json["anulada"], true);
        assert_eq!(json["id"], "cebraspe_agente_2021_001");
    }
}
