//! 输入源：文件或标准输入（内部使用）
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// stdin 在位置信息与错误信息中的名称
pub const STDIN_NAME: &str = "-";

/// 当前打开的输入源。文件随 drop 关闭；stdin 从不关闭。
pub(crate) enum Source {
    File {
        name: String,
        reader: BufReader<File>,
        lines: usize,
    },
    Stdin {
        reader: Box<dyn BufRead>,
        lines: usize,
    },
}

impl Source {
    /// 按路径打开文件
    pub(crate) fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Source::File {
            name: path.display().to_string(),
            reader: BufReader::new(file),
            lines: 0,
        })
    }

    pub(crate) fn stdin(reader: Box<dyn BufRead>) -> Self {
        Source::Stdin { reader, lines: 0 }
    }

    /// 进程自身的标准输入。不长期持有 stdin 锁，只在每次读取时加锁，
    /// 多个 stdin 模式的扫描器或宿主程序可以同时存在。
    pub(crate) fn process_stdin() -> Self {
        Self::stdin(Box::new(BufReader::new(io::stdin())))
    }

    pub(crate) fn name(&self) -> &str {
        match self {
            Source::File { name, .. } => name,
            Source::Stdin { .. } => STDIN_NAME,
        }
    }

    pub(crate) fn is_stdin(&self) -> bool {
        matches!(self, Source::Stdin { .. })
    }

    /// 本源内已读出的行数
    pub(crate) fn lines(&self) -> usize {
        match self {
            Source::File { lines, .. } | Source::Stdin { lines, .. } => *lines,
        }
    }

    /// 读取一行（含换行符）到 `buf`，返回读取的字节数；0 表示本源已读尽。
    /// 末尾缺少换行的残行同样作为一行返回。
    pub(crate) fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        buf.clear();
        let (n, lines) = match self {
            Source::File { reader, lines, .. } => (reader.read_until(b'\n', buf)?, lines),
            Source::Stdin { reader, lines } => (reader.read_until(b'\n', buf)?, lines),
        };
        if n > 0 {
            *lines += 1;
        }
        Ok(n)
    }
}

/// 去掉末尾的一个 `\n`，以及紧邻其前的一个 `\r`。其他位置的 `\r` 原样保留。
pub(crate) fn trim_line_end(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn trimmed(s: &[u8]) -> Vec<u8> {
        let mut v = s.to_vec();
        trim_line_end(&mut v);
        v
    }

    #[test]
    fn trims_exactly_one_terminator() {
        assert_eq!(trimmed(b"x\n"), b"x");
        assert_eq!(trimmed(b"x\r\n"), b"x");
        assert_eq!(trimmed(b"x\r\r\n"), b"x\r");
        assert_eq!(trimmed(b"x\n\n"), b"x\n");
        assert_eq!(trimmed(b"x\r"), b"x\r");
        assert_eq!(trimmed(b"a\rb"), b"a\rb");
        assert_eq!(trimmed(b""), b"");
    }

    #[test]
    fn read_line_keeps_partial_last_line() {
        let mut src = Source::stdin(Box::new(Cursor::new(b"one\ntwo".to_vec())));
        let mut buf = Vec::new();
        assert_eq!(src.read_line(&mut buf).unwrap(), 4);
        assert_eq!(buf, b"one\n");
        assert_eq!(src.read_line(&mut buf).unwrap(), 3);
        assert_eq!(buf, b"two");
        assert_eq!(src.read_line(&mut buf).unwrap(), 0);
        assert!(buf.is_empty());
        assert_eq!(src.lines(), 2);
        assert!(src.is_stdin());
        assert_eq!(src.name(), STDIN_NAME);
    }
}
