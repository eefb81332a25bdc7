//! 公共类型（对外暴露）
use serde::Serialize;

/// JSON 输出项（对应输出数组的单个元素）
#[derive(Debug, Clone, Serialize)]
pub struct OutputItem<'a> {
    /// 行所在的输入源，stdin 为 "-"
    pub source: &'a str,
    /// 源内行号（从 1 开始）
    pub line: usize,
    pub text: &'a str,
}
