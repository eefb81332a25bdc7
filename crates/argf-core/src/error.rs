//! 错误类型：数据错误（ScanError）与调用方误用（UsageError）
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 终止扫描的 I/O 错误。普通的输入结束不属于错误。
#[derive(Debug, Error)]
pub enum ScanError {
    /// 打开文件失败（不存在、无权限等）
    #[error("open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// 读取过程中的 I/O 错误（不含 EOF）
    #[error("read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// 出错的输入源名称（stdin 为 "-"）
    pub fn source_name(&self) -> String {
        match self {
            ScanError::Open { path, .. } => path.display().to_string(),
            ScanError::Read { name, .. } => name.clone(),
        }
    }

    /// 底层 I/O 错误
    pub fn io_error(&self) -> &io::Error {
        match self {
            ScanError::Open { source, .. } | ScanError::Read { source, .. } => source,
        }
    }
}

/// 调用方误用。属于程序错误而非数据错误，普通访问器遇到时直接 panic。
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UsageError {
    #[error("argf: line accessed before a successful scan")]
    LineBeforeScan,
    #[error("argf: line accessed after a failed scan")]
    LineAfterFailedScan,
    #[error("argf: error checked before scan")]
    ErrorBeforeScan,
    #[error("argf: scanner initialized twice or after scanning started")]
    AlreadyInitialized,
}
