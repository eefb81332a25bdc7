//! 输出主流程：驱动 Scanner 逐行读取并写出（cat / grep）
use anyhow::{Context, Result};
use argf_core::{load_rule_specs, LineMatcher, RuleSpec, Scanner};
use std::io::Write;

use crate::options::{GrepOptions, GrepStats, OutputFormat};
use crate::types::OutputItem;

/// 汇总 `-e` 模式与规则文件，编译匹配器
pub fn build_matcher(opts: &GrepOptions) -> Result<LineMatcher> {
    let mut specs: Vec<RuleSpec> = opts
        .patterns
        .iter()
        .enumerate()
        .map(|(i, p)| RuleSpec::inline(i, p.as_str()))
        .collect();
    if let Some(path) = &opts.rules_path {
        specs.extend(load_rule_specs(path)?);
    }
    if specs.is_empty() {
        anyhow::bail!("no patterns given (use -e PATTERN or --rules FILE)");
    }
    Ok(LineMatcher::from_specs(&specs, opts.engine)?)
}

/// 逐行扫描并输出所有行；`numbered` 时按全局行号加前缀（与 `cat -n` 相同格式）
pub fn cat_and_write(mut scanner: Scanner, out: &mut dyn Write, numbered: bool) -> Result<GrepStats> {
    let mut stats = GrepStats::default();
    while scanner.scan() {
        stats.lines_scanned += 1;
        if numbered {
            write!(out, "{:>6}\t", stats.lines_scanned)?;
        }
        out.write_all(scanner.bytes())?;
        out.write_all(b"\n")?;
        stats.lines_written += 1;
    }
    finish(scanner, stats)
}

/// 逐行扫描，将命中（或在 invert 时未命中）的行写入 `out`
/// - Text：原样输出行字节，可选 `source:line:` 前缀
/// - Json：流式写出 JSON 数组，出错时也会先闭合数组
pub fn grep_and_write(
    mut scanner: Scanner,
    matcher: &LineMatcher,
    out: &mut dyn Write,
    opts: &GrepOptions,
) -> Result<GrepStats> {
    let mut stats = GrepStats::default();

    if opts.format == OutputFormat::Json {
        write!(out, "[")?;
    }
    let mut first = true;

    while scanner.scan() {
        stats.lines_scanned += 1;
        if matcher.is_match(scanner.bytes()) == opts.invert {
            continue;
        }
        stats.lines_written += 1;
        match opts.format {
            OutputFormat::Text => {
                if opts.with_source {
                    write!(out, "{}:{}:", scanner.source_name(), scanner.line_number())?;
                }
                out.write_all(scanner.bytes())?;
                out.write_all(b"\n")?;
            }
            OutputFormat::Json => {
                if !first { write!(out, ",")?; } else { first = false; }
                let text = scanner.text();
                let item = OutputItem { source: scanner.source_name(), line: scanner.line_number(), text: &text };
                serde_json::to_writer(&mut *out, &item)?;
            }
        }
    }

    if opts.format == OutputFormat::Json {
        write!(out, "]")?;
    }
    finish(scanner, stats)
}

/// 扫描结束：正常读尽返回统计，出错则向上传播扫描器的终止错误
fn finish(scanner: Scanner, stats: GrepStats) -> Result<GrepStats> {
    match scanner.into_error() {
        Some(err) => Err(err).context("input scan failed"),
        None => Ok(stats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argf_core::MatchEngine;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn stdin(input: &str) -> Scanner {
        let mut s = Scanner::new().with_stdin(Cursor::new(input.as_bytes().to_vec()));
        s.init(Vec::<PathBuf>::new()).unwrap();
        s
    }

    fn opts(patterns: &[&str]) -> GrepOptions {
        GrepOptions { patterns: patterns.iter().map(|p| p.to_string()).collect(), ..GrepOptions::default() }
    }

    #[test]
    fn cat_numbers_lines() {
        let mut out = Vec::new();
        let stats = cat_and_write(stdin("a\nb"), &mut out, true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "     1\ta\n     2\tb\n");
        assert_eq!(stats, GrepStats { lines_scanned: 2, lines_written: 2 });
    }

    #[test]
    fn grep_text_with_source_prefix() {
        let o = GrepOptions { with_source: true, ..opts(&["^b"]) };
        let m = build_matcher(&o).unwrap();
        let mut out = Vec::new();
        let stats = grep_and_write(stdin("apple\nbanana\ncherry\nblueberry\n"), &m, &mut out, &o).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "-:2:banana\n-:4:blueberry\n");
        assert_eq!(stats.lines_scanned, 4);
        assert_eq!(stats.lines_written, 2);
    }

    #[test]
    fn grep_invert() {
        let o = GrepOptions { invert: true, engine: MatchEngine::Utf8, ..opts(&["an"]) };
        let m = build_matcher(&o).unwrap();
        let mut out = Vec::new();
        grep_and_write(stdin("apple\nbanana\ncherry\n"), &m, &mut out, &o).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "apple\ncherry\n");
    }

    #[test]
    fn grep_json_array() {
        let o = GrepOptions { format: OutputFormat::Json, ..opts(&["x"]) };
        let m = build_matcher(&o).unwrap();
        let mut out = Vec::new();
        grep_and_write(stdin("x1\ny\nx2\r\n"), &m, &mut out, &o).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            v,
            serde_json::json!([
                { "source": "-", "line": 1, "text": "x1" },
                { "source": "-", "line": 3, "text": "x2" },
            ])
        );
    }

    #[test]
    fn grep_json_empty_input_is_empty_array() {
        let o = GrepOptions { format: OutputFormat::Json, ..opts(&["x"]) };
        let m = build_matcher(&o).unwrap();
        let mut out = Vec::new();
        grep_and_write(stdin(""), &m, &mut out, &o).unwrap();
        assert_eq!(out, b"[]");
    }

    #[test]
    fn no_patterns_is_an_error() {
        assert!(build_matcher(&GrepOptions::default()).is_err());
    }

    #[test]
    fn scan_error_propagates() {
        let scanner = Scanner::with_sources(["/no/such/argf/input.txt"]);
        let mut out = Vec::new();
        let err = cat_and_write(scanner, &mut out, false).unwrap_err();
        assert!(err.downcast_ref::<argf_core::ScanError>().is_some());
        assert!(out.is_empty());
    }
}
