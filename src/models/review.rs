//! 需要人工复核的非致命问题

use std::fmt;

/// 一次模型调用负责的题号区间（闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkRange {
    pub start: u32,
    pub end: u32,
}

impl ChunkRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, number: u32) -> bool {
        (self.start..=self.end).contains(&number)
    }

    /// 用于日志和调试文件名
    pub fn label(&self) -> String {
        format!("chunk_{}_{}", self.start, self.end)
    }
}

impl fmt::Display for ChunkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}]", self.start, self.end)
    }
}

/// 复核标记
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewFlag {
    /// 返回了请求区间之外的题号，已丢弃
    RangeMismatch { chunk: ChunkRange, number: u32 },
    /// 整个分块调用失败
    ChunkFailed { chunk: ChunkRange, reason: String },
    /// 条目缺少有效题号，已丢弃
    InvalidEntry { chunk: ChunkRange, reason: String },
    /// 字段类型不对，已留空，题目保留
    DegradedField {
        number: u32,
        field: String,
        reason: String,
    },
    /// 同一题号重复出现，只保留第一次
    DuplicateQuestion { number: u32 },
    /// 缺失的题号
    Gap { number: u32 },
    /// 官方答案中没有这道题
    MissingAnswerKeyEntry { number: u32 },
    /// 答案文件无法抽取，整份试卷未合并答案
    AnswerKeyUnavailable { reason: String },
    /// 占位符无法展开，支撑文本留空
    UnresolvedPassageReference { number: u32, passage_id: String },
}

impl ReviewFlag {
    /// 关联的题号（如果有）
    pub fn number(&self) -> Option<u32> {
        match self {
            ReviewFlag::RangeMismatch { number, .. }
            | ReviewFlag::DegradedField { number, .. }
            | ReviewFlag::DuplicateQuestion { number }
            | ReviewFlag::Gap { number }
            | ReviewFlag::MissingAnswerKeyEntry { number }
            | ReviewFlag::UnresolvedPassageReference { number, .. } => Some(*number),
            _ => None,
        }
    }
}

impl fmt::Display for ReviewFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewFlag::RangeMismatch { chunk, number } => {
                write!(f, "题号越界: 分块 {} 返回了第 {} 题", chunk, number)
            }
            ReviewFlag::ChunkFailed { chunk, reason } => {
                write!(f, "分块失败 {}: {}", chunk, reason)
            }
            ReviewFlag::InvalidEntry { chunk, reason } => {
                write!(f, "无效条目 (分块 {}): {}", chunk, reason)
            }
            ReviewFlag::DegradedField {
                number,
                field,
                reason,
            } => write!(f, "字段已留空: 第 {} 题 {}: {}", number, field, reason),
            ReviewFlag::DuplicateQuestion { number } => write!(f, "重复题号: {}", number),
            ReviewFlag::Gap { number } => write!(f, "缺失题号: {}", number),
            ReviewFlag::MissingAnswerKeyEntry { number } => {
                write!(f, "答案缺失: 第 {} 题", number)
            }
            ReviewFlag::AnswerKeyUnavailable { reason } => {
                write!(f, "答案文件不可用: {}", reason)
            }
            ReviewFlag::UnresolvedPassageReference { number, passage_id } => {
                write!(
                    f,
                    "支撑文本无法展开: 第 {} 题 (texto_id: {:?})",
                    number, passage_id
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_range_contains_bounds() {
        let chunk = ChunkRange::new(11, 20);
        assert!(chunk.contains(11));
        assert!(chunk.contains(20));
        assert!(!chunk.contains(10));
        assert!(!chunk.contains(25));
        assert_eq!(chunk.label(), "chunk_11_20");
    }

    #[test]
    fn test_flag_number() {
        let flag = ReviewFlag::RangeMismatch {
            chunk: ChunkRange::new(11, 20),
            number: 25,
        };
        assert_eq!(flag.number(), Some(25));
        assert!(flag.to_string().contains("25"));
        let flag = ReviewFlag::AnswerKeyUnavailable {
            reason: "timeout".to_string(),
        };
        assert_eq!(flag.number(), None);
    }
}
