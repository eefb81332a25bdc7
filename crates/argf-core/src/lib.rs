//! 命令行输入抽象库
//!
//! 设计要点：
//! - 给出文件名时，按顺序逐个打开并逐行读取，多个文件首尾相接，对调用方表现为一条连续的行流。
//! - 未给出任何文件名时，整个生命周期只读 stdin，文件参数不再考虑。
//! - 打开或读取失败即终止，不跳过坏文件；正常读尽不算错误。
//! - 访问器误用（未扫描先取行等）属于程序错误，直接 panic；`try_*` 版本返回 UsageError。
//!
//! 另提供按正则筛选行的匹配器（LineMatcher）与 TOML 规则加载；输出格式由调用方负责。

mod error;
mod matcher;
mod options;
mod rules;
mod scanner;
mod source;

pub use error::{ScanError, UsageError};
pub use matcher::LineMatcher;
pub use options::{MatchEngine, ScanStats};
pub use rules::{load_rule_specs, RuleError, RuleSpec};
pub use scanner::Scanner;
pub use source::STDIN_NAME;
