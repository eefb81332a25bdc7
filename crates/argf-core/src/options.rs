//! 匹配引擎与扫描统计（模块）

/// 匹配引擎类型
/// - Bytes：基于 `regex::bytes` 直接匹配行字节，遇到非 UTF-8 内容也不会出错。
/// - Utf8：先对行做有损 UTF-8 解码，再用 `regex::Regex` 匹配，适合需要字符语义的模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchEngine {
    #[default]
    Bytes,
    Utf8,
}

/// 扫描器统计信息
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// 成功打开的文件数（stdin 不计）
    pub sources_opened: usize,
    /// 成功扫描出的行数
    pub lines_read: usize,
}
