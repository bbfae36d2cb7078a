use std::fs::OpenOptions;

use anyhow::{Context, Result};
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::{Layer, fmt, registry};

use crate::args::Args;

/// 本项目的日志目标, 按命令行指定的等级输出
const PLATE_TARGETS: [&str; 4] = ["carplate", "recognizer", "detector", "metadata"];

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// 日志过滤规则
///
/// 第三方库只输出警告以上, onnxruntime 只输出错误
///
/// # 参数
///
/// * `level` - 本项目日志等级
fn plate_targets(level: Level) -> Targets {
    PLATE_TARGETS.iter().fold(
        Targets::new()
            .with_default(LevelFilter::WARN)
            .with_target("ort", LevelFilter::ERROR),
        |targets, target| targets.with_target(*target, level),
    )
}

/// 初始化日志记录器
///
/// 标准输出只留给识别结果 JSON, 控制台日志写入标准错误.
/// 日志文件额外记录线程名, 便于区分并发识别
///
/// # 参数
///
/// * `args` - 命令行参数
pub fn init_log(args: &Args) -> Result<()> {
    let targets = plate_targets(args.log_level.unwrap_or(Level::INFO));

    let console_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_filter(targets.clone());

    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(args.append_log)
        .truncate(!args.append_log)
        .open(&args.log_file)
        .with_context(|| format!("打开日志文件 {} 失败", args.log_file))?;
    let file_layer = fmt::layer()
        .with_writer(log_file)
        .with_ansi(false)
        .with_thread_names(true)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_filter(targets);

    tracing::subscriber::set_global_default(registry().with(console_layer).with(file_layer))
        .context("设置全局日志记录器失败")?;
    Ok(())
}
