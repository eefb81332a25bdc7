mod options;
mod output;
mod types;

use anyhow::{Context, Result};
use argf_core::{MatchEngine, Scanner};
use clap::{Parser, Subcommand};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::options::{GrepOptions, OutputFormat};
use crate::output::{build_matcher, cat_and_write, grep_and_write};

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "argf", version, about = "Line tools over files or stdin")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 依次输出所有输入行；未给出文件时读 stdin
    Cat {
        /// 行首加全局行号
        #[arg(short = 'n', long)]
        number: bool,

        /// 输入文件（为空则读 stdin）
        files: Vec<PathBuf>,
    },
    /// 输出匹配任一模式的行
    Grep {
        /// 正则模式，可重复
        #[arg(short = 'e', long = "regexp")]
        patterns: Vec<String>,

        /// 规则文件路径（TOML，[[rules]] id/pattern）
        #[arg(long)]
        rules: Option<PathBuf>,

        /// 匹配引擎：bytes 或 utf8（默认 bytes）
        #[arg(long, default_value = "bytes", value_parser = ["bytes", "utf8"])]
        engine: String,

        /// 输出不匹配的行
        #[arg(short = 'v', long)]
        invert_match: bool,

        /// 行首加 `source:line:` 前缀（仅 text 格式）
        #[arg(short = 'H', long)]
        with_source: bool,

        /// 输出格式：text 或 json
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// 输入文件（为空则读 stdin）
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();

    // stdout 加锁并缓冲，行数多时减少系统调用
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match cli.command {
        Commands::Cat { number, files } => {
            debug!(?files, number, "starting cat");
            let res = cat_and_write(Scanner::with_sources(files), &mut out, number);
            out.flush().context("flush output")?;
            let stats = res?;
            info!(lines = stats.lines_written, "cat finished");
        }
        Commands::Grep { patterns, rules, engine, invert_match, with_source, format, files } => {
            let engine = match engine.as_str() {
                "utf8" => MatchEngine::Utf8,
                _ => MatchEngine::Bytes,
            };
            let format = match format.as_str() {
                "json" => OutputFormat::Json,
                _ => OutputFormat::Text,
            };
            let opts = GrepOptions { patterns, rules_path: rules, engine, invert: invert_match, with_source, format };
            let matcher = build_matcher(&opts).context("build matcher")?;
            debug!(?files, patterns = matcher.len(), ?engine, "starting grep");

            let res = grep_and_write(Scanner::with_sources(files), &matcher, &mut out, &opts);
            // 出错时也把已写出的部分冲刷出去
            out.flush().context("flush output")?;
            let stats = res?;
            info!(scanned = stats.lines_scanned, matched = stats.lines_written, "grep finished");
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 日志写 stderr，默认 warn，避免干扰 stdout 上的行输出
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn grep_flags_parse() {
        let cli = Cli::try_parse_from(["argf", "grep", "-e", "foo", "-e", "bar", "-v", "--format", "json", "a.txt", "b.txt"]).unwrap();
        match cli.command {
            Commands::Grep { patterns, invert_match, format, files, .. } => {
                assert_eq!(patterns, ["foo", "bar"]);
                assert!(invert_match);
                assert_eq!(format, "json");
                assert_eq!(files, [PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cat_without_files_reads_stdin() {
        let cli = Cli::try_parse_from(["argf", "cat", "-n"]).unwrap();
        assert!(matches!(cli.command, Commands::Cat { number: true, ref files } if files.is_empty()));
    }

    #[test]
    fn unknown_engine_is_rejected() {
        assert!(Cli::try_parse_from(["argf", "grep", "-e", "x", "--engine", "pcre"]).is_err());
    }
}
