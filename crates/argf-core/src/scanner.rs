//! 行扫描器：在“命令行给出的文件序列”与“标准输入”之上提供统一的逐行读取接口
//!
//! 用法与 `bufio.Scanner` 类似，先循环 `scan()`，结束后再检查 `error()`：
//!
//! ```no_run
//! use argf_core::Scanner;
//!
//! let mut input = Scanner::from_args();
//! while input.scan() {
//!     println!("{}", input.text());
//! }
//! if let Some(err) = input.error() {
//!     eprintln!("{err}");
//!     std::process::exit(1);
//! }
//! ```
//!
//! 状态转换：
//! - 当前源读尽（EOF 且读到 0 字节）→ 关闭并打开下一个文件，对调用方透明；
//! - 文件列表耗尽，或 stdin 读尽 → `scan()` 返回 false，`error()` 为 None；
//! - 打开或读取失败 → 记录终止错误，此后 `scan()` 永远返回 false。
use std::borrow::Cow;
use std::collections::VecDeque;
use std::env;
use std::ffi::OsString;
use std::fmt;
use std::io::BufRead;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::{ScanError, UsageError};
use crate::options::ScanStats;
use crate::source::{trim_line_end, Source};

/// 逐行扫描器。不保证线程安全；并发场景请为每个线程各建一个实例。
pub struct Scanner {
    initialized: bool,
    /// 任意一次 scan() 调用后置位
    started: bool,
    use_stdin: bool,
    pending: VecDeque<PathBuf>,
    current: Option<Source>,
    /// 替换进程 stdin 的读取器，初始化为 stdin 模式时取用
    stdin_override: Option<Box<dyn BufRead>>,
    line: Vec<u8>,
    line_source: String,
    line_number: usize,
    error: Option<ScanError>,
    stats: ScanStats,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("initialized", &self.initialized)
            .field("use_stdin", &self.use_stdin)
            .field("pending", &self.pending)
            .field("current", &self.current.as_ref().map(Source::name))
            .field("error", &self.error)
            .field("stats", &self.stats)
            .finish()
    }
}

impl Scanner {
    /// 创建未初始化的扫描器；首次 `scan()` 时以进程参数（去掉程序名）初始化。
    pub fn new() -> Self {
        Self {
            initialized: false,
            started: false,
            use_stdin: false,
            pending: VecDeque::new(),
            current: None,
            stdin_override: None,
            line: Vec::new(),
            line_source: String::new(),
            line_number: 0,
            error: None,
            stats: ScanStats::default(),
        }
    }

    /// 以给定文件名序列创建并初始化；序列为空则读 stdin。
    pub fn with_sources<I, P>(sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut scanner = Self::new();
        scanner.setup(sources.into_iter().map(Into::into).collect());
        scanner
    }

    /// 以进程参数（去掉程序名）创建并初始化
    pub fn from_args() -> Self {
        let mut scanner = Self::new();
        scanner.setup(sources_from_args(env::args_os()));
        scanner
    }

    /// 用任意 `BufRead` 代替进程 stdin（测试或嵌入时使用）。
    /// 仅在 stdin 模式下生效；扫描开始后调用无效果。
    pub fn with_stdin<R: BufRead + 'static>(mut self, reader: R) -> Self {
        let reader: Box<dyn BufRead> = Box::new(reader);
        if !self.initialized {
            self.stdin_override = Some(reader);
        } else if self.use_stdin && !self.started {
            self.current = Some(Source::stdin(reader));
        }
        self
    }

    /// 显式初始化输入源。只能在首次 `scan()` 之前调用一次；
    /// 重复调用返回 `UsageError::AlreadyInitialized`，状态保持不变。
    pub fn init<I, P>(&mut self, sources: I) -> Result<(), UsageError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        if self.initialized || self.started {
            return Err(UsageError::AlreadyInitialized);
        }
        self.setup(sources.into_iter().map(Into::into).collect());
        Ok(())
    }

    fn setup(&mut self, sources: VecDeque<PathBuf>) {
        self.initialized = true;
        if sources.is_empty() {
            self.use_stdin = true;
            self.current = Some(match self.stdin_override.take() {
                Some(reader) => Source::stdin(reader),
                None => Source::process_stdin(),
            });
            debug!("no file arguments, reading stdin");
        } else {
            debug!(count = sources.len(), "file sources queued");
            self.pending = sources;
        }
    }

    /// 前进到下一行。返回 true 时可通过 `text()`/`bytes()` 取得该行；
    /// 返回 false 表示输入结束或出错，用 `error()` 区分。
    pub fn scan(&mut self) -> bool {
        if !self.initialized {
            self.setup(sources_from_args(env::args_os()));
        }
        self.started = true;
        if self.error.is_some() {
            return false;
        }

        loop {
            let source = match &mut self.current {
                Some(source) => source,
                // stdin 读尽后不再有任何输入
                None if self.use_stdin => return self.exhausted(),
                None => {
                    let Some(path) = self.pending.pop_front() else {
                        return self.exhausted();
                    };
                    match Source::open(&path) {
                        Ok(source) => {
                            debug!(source = %path.display(), "opened source");
                            self.stats.sources_opened += 1;
                            self.current.insert(source)
                        }
                        Err(source) => {
                            warn!(path = %path.display(), error = %source, "open failed, scanning stopped");
                            self.error = Some(ScanError::Open { path, source });
                            return false;
                        }
                    }
                }
            };

            match source.read_line(&mut self.line) {
                Ok(0) => {
                    if !source.is_stdin() {
                        debug!(source = source.name(), "source exhausted, closing");
                    }
                    self.current = None;
                }
                Ok(_) => {
                    trim_line_end(&mut self.line);
                    self.line_source.clear();
                    self.line_source.push_str(source.name());
                    self.line_number = source.lines();
                    self.stats.lines_read += 1;
                    return true;
                }
                Err(err) => {
                    let name = source.name().to_string();
                    warn!(source = %name, error = %err, "read failed, scanning stopped");
                    self.error = Some(ScanError::Read { name, source: err });
                    self.current = None;
                    return false;
                }
            }
        }
    }

    fn exhausted(&mut self) -> bool {
        self.line.clear();
        debug!(lines = self.stats.lines_read, "all input consumed");
        false
    }

    fn check_line(&self) -> Result<(), UsageError> {
        if self.error.is_some() {
            return Err(UsageError::LineAfterFailedScan);
        }
        if self.stats.lines_read == 0 {
            return Err(UsageError::LineBeforeScan);
        }
        Ok(())
    }

    /// 当前行（不含行尾），调用方误用时返回 UsageError
    pub fn try_bytes(&self) -> Result<&[u8], UsageError> {
        self.check_line()?;
        Ok(&self.line)
    }

    /// 当前行的文本形式（有损 UTF-8 解码），调用方误用时返回 UsageError
    pub fn try_text(&self) -> Result<Cow<'_, str>, UsageError> {
        self.try_bytes().map(String::from_utf8_lossy)
    }

    /// 当前行的原始字节，不含行尾。两次 `scan()` 之间多次调用结果相同。
    ///
    /// # Panics
    /// 尚未有成功的 `scan()`，或最近一次 `scan()` 因错误失败。
    #[track_caller]
    pub fn bytes(&self) -> &[u8] {
        self.try_bytes().unwrap_or_else(|e| panic!("{e}"))
    }

    /// 当前行文本，不含行尾。非法 UTF-8 序列替换为 U+FFFD。
    ///
    /// # Panics
    /// 与 [`Scanner::bytes`] 相同。
    #[track_caller]
    pub fn text(&self) -> Cow<'_, str> {
        self.try_text().unwrap_or_else(|e| panic!("{e}"))
    }

    /// 当前行来源：文件名，stdin 为 "-"
    #[track_caller]
    pub fn source_name(&self) -> &str {
        self.check_line().unwrap_or_else(|e| panic!("{e}"));
        &self.line_source
    }

    /// 当前行在其来源中的行号（从 1 开始）
    #[track_caller]
    pub fn line_number(&self) -> usize {
        self.check_line().unwrap_or_else(|e| panic!("{e}"));
        self.line_number
    }

    /// 终止错误；普通的输入结束返回 None。调用方误用时返回 UsageError。
    pub fn try_error(&self) -> Result<Option<&ScanError>, UsageError> {
        if !self.started {
            return Err(UsageError::ErrorBeforeScan);
        }
        Ok(self.error.as_ref())
    }

    /// 使 `scan()` 返回 false 的错误；正常读尽时为 None。
    ///
    /// # Panics
    /// 从未调用过 `scan()`。
    #[track_caller]
    pub fn error(&self) -> Option<&ScanError> {
        self.try_error().unwrap_or_else(|e| panic!("{e}"))
    }

    /// 结束扫描并取出终止错误，便于以 `?` 向上传播
    pub fn into_error(self) -> Option<ScanError> {
        self.error
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }
}

/// 进程参数 → 文件源列表：去掉第一个元素（程序名）
fn sources_from_args<I: IntoIterator<Item = OsString>>(args: I) -> VecDeque<PathBuf> {
    args.into_iter().skip(1).map(PathBuf::from).collect()
}
