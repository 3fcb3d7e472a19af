use std::{panic, sync::Arc};

use anyhow::{Result, bail};
use clap::Parser;
use tokio::io::BufReader;

use retrace_scanner::{
    BinanceProvider, Cli, Granularity, RenderOptions, ScanEngine, ScanSettings,
    ui::{loading_line, render_snapshot, run_watch, watch_prompt},
};

fn init_log() {
    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Error)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("retrace_scanner"), my_code_level)
        .parse_default_env()
        .init();
}

async fn run_once(engine: &ScanEngine, granularity: Granularity, opts: RenderOptions) -> Result<()> {
    if !opts.json {
        println!("{}", loading_line());
    }
    let snapshot = engine.refresh(granularity).await;
    println!("{}", render_snapshot(&snapshot, opts)?);

    if let Some(error) = snapshot.error() {
        bail!("Scan at {} failed: {}", granularity, error);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));

    init_log();

    let args = Cli::parse();
    let opts = RenderOptions {
        show_all: args.all,
        json: args.json,
    };

    let provider = BinanceProvider::new()?;
    let engine = Arc::new(ScanEngine::new(
        Arc::new(provider),
        ScanSettings::from(&args),
    ));

    if args.watch {
        eprintln!("{}", watch_prompt());
        let stdin = BufReader::new(tokio::io::stdin());
        run_watch(engine, args.granularity, stdin, opts, |text| println!("{}", text)).await
    } else {
        run_once(&engine, args.granularity, opts).await
    }
}
