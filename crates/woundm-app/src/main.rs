//! WoundM 会话回放工具
//!
//! 读取录制的事件脚本，经会话 Actor 逐条回放，输出最终测量结果。
//!
//! 用法：`woundm <recording.json> [--config <config.json>] [--out <results.wmr>] [--verbose]`

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use woundm_core::prelude::*;
use woundm_file::{load_config, save_results, SessionRecording};

/// 会话命令队列长度
const QUEUE_CAPACITY: usize = 64;

/// 命令行参数
#[derive(Debug, Default)]
struct Args {
    recording: PathBuf,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    verbose: bool,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = Args::default();
        let mut recording = None;
        let mut iter = std::env::args().skip(1);

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    args.config = Some(iter.next().context("--config requires a path")?.into());
                }
                "--out" | "-o" => {
                    args.out = Some(iter.next().context("--out requires a path")?.into());
                }
                "--verbose" | "-v" => args.verbose = true,
                other if other.starts_with('-') => bail!("Unknown option: {}", other),
                other => recording = Some(PathBuf::from(other)),
            }
        }

        args.recording = recording.context(
            "Usage: woundm <recording.json> [--config <config.json>] [--out <results.wmr>] [--verbose]",
        )?;
        Ok(args)
    }
}

fn describe(frame: &RenderFrame) -> String {
    let fmt = |v: Option<f64>| v.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".to_string());
    let confidence = frame
        .confidence
        .as_ref()
        .map(|c| format!("{:.2} {}", c.score, c.label))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "[{:?}] L={} W={} cm, confidence {} | {}",
        frame.stage,
        fmt(frame.length_cm),
        fmt(frame.width_cm),
        confidence,
        frame.prompt
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse()?;

    // 初始化日志
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing::subscriber::set_global_default(FmtSubscriber::builder().with_max_level(level).finish())?;

    info!("Starting WoundM replay...");

    let recording = SessionRecording::load(&args.recording)
        .with_context(|| format!("Failed to load recording {}", args.recording.display()))?;

    let config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => recording.config.clone().unwrap_or_default(),
    };

    let (handle, actor) = SessionActor::spawn(config, QUEUE_CAPACITY);

    // 渲染层：每次重绘输出一行
    let mut frames = handle.frames();
    let renderer = tokio::spawn(async move {
        while frames.changed().await.is_ok() {
            let frame = frames.borrow_and_update().clone();
            info!("{}", describe(&frame));
        }
    });

    let mut results = Vec::new();
    for command in recording.commands() {
        match handle.send(command).await {
            Ok(CommandOutcome::Finalized(result)) => {
                info!("Result: {}", result);
                results.push(result);
            }
            Ok(_) => {}
            Err(e) => warn!("Command rejected: {}", e),
        }
    }

    drop(handle);
    actor.await?;
    renderer.await?;

    if results.is_empty() {
        warn!("Recording finished without a finalized measurement");
    }

    println!("{}", serde_json::to_string_pretty(&results)?);

    if let Some(out) = &args.out {
        save_results(&results, out)
            .with_context(|| format!("Failed to save results to {}", out.display()))?;
    }

    Ok(())
}
