use serde::{Deserialize, Serialize};

/// 最终输出的一条题目记录（扁平结构，字段名保持下游约定）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    #[serde(rename = "banca")]
    pub board: String,
    #[serde(rename = "concurso")]
    pub exam_name: String,
    #[serde(rename = "ano")]
    pub year: Option<u32>,
    #[serde(rename = "cargo")]
    pub role: String,
    #[serde(rename = "numero")]
    pub number: u32,
    #[serde(rename = "disciplina")]
    pub discipline: String,
    #[serde(rename = "texto_id", default)]
    pub passage_id: String,
    #[serde(rename = "texto_base", default)]
    pub passage_text: String,
    #[serde(rename = "comando", default)]
    pub prompt: String,
    #[serde(rename = "enunciado")]
    pub statement: String,
    #[serde(rename = "alternativas")]
    pub options: Vec<String>,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "gabarito")]
    pub answer_index: i64,
    #[serde(rename = "anulada")]
    pub annulled: bool,
    pub id: String,
}
