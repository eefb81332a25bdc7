//! grep 选项与输出统计（模块）
use argf_core::MatchEngine;
use std::path::PathBuf;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 每行一条，原样输出行内容
    #[default]
    Text,
    /// 流式 JSON 数组，元素为 `{source, line, text}`
    Json,
}

/// grep 选项
#[derive(Debug, Clone)]
pub struct GrepOptions {
    /// 命令行直接给出的模式
    pub patterns: Vec<String>,
    /// 规则文件路径（TOML）；与 patterns 合并使用
    pub rules_path: Option<PathBuf>,
    /// 匹配引擎：Bytes（字节级）或 Utf8（基于字符串）
    pub engine: MatchEngine,
    /// 反选：输出不匹配的行
    pub invert: bool,
    /// 文本输出时在行首加 `source:line:` 前缀
    pub with_source: bool,
    pub format: OutputFormat,
}

impl Default for GrepOptions {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            rules_path: None,
            engine: MatchEngine::Bytes,
            invert: false,
            with_source: false,
            format: OutputFormat::Text,
        }
    }
}

/// grep 统计信息（便于 CLI 打印）
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GrepStats {
    pub lines_scanned: usize,
    pub lines_written: usize,
}
