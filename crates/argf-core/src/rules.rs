//! 规则文件加载（TOML）
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 规则加载或编译失败
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("read rules file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse rules file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid pattern in rule `{id}`: {source}")]
    Pattern {
        id: String,
        #[source]
        source: regex::Error,
    },
}

/// 单条规则的配置（支持 pattern 或 regex 字段）
#[derive(Debug, Clone, Deserialize)]
struct RuleEntry {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    regex: Option<String>,
}

/// 顶层规则文件结构
#[derive(Debug, Clone, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<RuleEntry>,
}

/// 归一化后的规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    pub id: String,
    pub name: Option<String>,
    pub pattern: String,
}

impl RuleSpec {
    /// 命令行 `-e` 给出的模式，以序号作为 id
    pub fn inline(index: usize, pattern: impl Into<String>) -> Self {
        Self { id: format!("e{index}"), name: None, pattern: pattern.into() }
    }
}

/// 从 TOML 规则文件加载并归一化为 RuleSpec 列表
pub fn load_rule_specs(path: &Path) -> Result<Vec<RuleSpec>, RuleError> {
    let txt = std::fs::read_to_string(path).map_err(|source| RuleError::Io { path: path.to_path_buf(), source })?;
    parse_rule_specs(&txt).map_err(|source| RuleError::Parse { path: path.to_path_buf(), source })
}

fn parse_rule_specs(txt: &str) -> Result<Vec<RuleSpec>, toml::de::Error> {
    let parsed: RuleFile = toml::from_str(txt)?;
    let mut out = Vec::new();

    for e in parsed.rules {
        // 兼容两种字段名：pattern 或 regex；两者都缺失的条目跳过
        let pattern = match (e.pattern, e.regex) {
            (Some(p), _) => p,
            (None, Some(r)) => r,
            _ => continue,
        };
        out.push(RuleSpec { id: e.id, name: e.name, pattern });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_pattern_or_regex_field() {
        let specs = parse_rule_specs(
            r#"
            [[rules]]
            id = "todo"
            name = "Todo marker"
            pattern = "TODO"

            [[rules]]
            id = "num"
            regex = '\d+'

            [[rules]]
            id = "empty"
            "#,
        )
        .unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].id, "todo");
        assert_eq!(specs[0].name.as_deref(), Some("Todo marker"));
        assert_eq!(specs[1].pattern, r"\d+");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_rule_specs(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, RuleError::Io { .. }));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(parse_rule_specs("rules = 3").is_err());
    }
}
