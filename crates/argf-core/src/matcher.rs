//! 行匹配器（Bytes/Utf8）
use crate::options::MatchEngine;
use crate::rules::{RuleError, RuleSpec};

/// 编译后的模式集合，任一模式命中即视为匹配
#[derive(Debug, Clone)]
pub enum LineMatcher {
    /// 字节级：直接在行字节上匹配
    Bytes(Vec<regex::bytes::Regex>),
    /// UTF-8：在有损解码后的文本上匹配
    Utf8(Vec<regex::Regex>),
}

impl LineMatcher {
    /// 从规则条目构建匹配器；任一模式非法则整体失败
    pub fn from_specs(specs: &[RuleSpec], engine: MatchEngine) -> Result<Self, RuleError> {
        match engine {
            MatchEngine::Bytes => {
                let mut patterns = Vec::with_capacity(specs.len());
                for r in specs {
                    patterns.push(regex::bytes::Regex::new(&r.pattern).map_err(|source| pattern_error(r, source))?);
                }
                Ok(LineMatcher::Bytes(patterns))
            }
            MatchEngine::Utf8 => {
                let mut patterns = Vec::with_capacity(specs.len());
                for r in specs {
                    patterns.push(regex::Regex::new(&r.pattern).map_err(|source| pattern_error(r, source))?);
                }
                Ok(LineMatcher::Utf8(patterns))
            }
        }
    }

    pub fn engine(&self) -> MatchEngine {
        match self {
            LineMatcher::Bytes(_) => MatchEngine::Bytes,
            LineMatcher::Utf8(_) => MatchEngine::Utf8,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            LineMatcher::Bytes(p) => p.len(),
            LineMatcher::Utf8(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 行是否命中任一模式。空匹配器不匹配任何行。
    pub fn is_match(&self, line: &[u8]) -> bool {
        match self {
            LineMatcher::Bytes(patterns) => patterns.iter().any(|re| re.is_match(line)),
            LineMatcher::Utf8(patterns) => {
                let text = String::from_utf8_lossy(line);
                patterns.iter().any(|re| re.is_match(&text))
            }
        }
    }
}

fn pattern_error(rule: &RuleSpec, source: regex::Error) -> RuleError {
    RuleError::Pattern { id: rule.id.clone(), source }
}
