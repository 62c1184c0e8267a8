//! 階層キャッシュの擬似対局ベンチマーク
//!
//! ランダムな対局を進めながら局面キャッシュを叩き、ヒット率・階層破棄回数・
//! メモリ使用量を表示する。

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tools::stress::{self, StressFile};

#[derive(Parser, Debug)]
#[command(author, version, about = "Stress the tiered position cache with random games")]
struct Cli {
    /// 設定ファイル（TOML、`[tiers]` と `[stress]`）。フラグが指定されればそちらを優先する
    #[arg(long)]
    config: Option<PathBuf>,

    /// 対局数
    #[arg(long)]
    games: Option<usize>,

    /// 1局あたりの最大手数
    #[arg(long)]
    max_plies: Option<usize>,

    /// 1手あたりに展開する子局面の数
    #[arg(long)]
    children: Option<usize>,

    /// 子局面が壁置きになる確率
    #[arg(long)]
    wall_probability: Option<f64>,

    /// 乱数シード
    #[arg(long)]
    seed: Option<u64>,

    /// メモリ予算 (MiB)
    #[arg(long)]
    budget_mb: Option<usize>,

    /// 集計を JSON で出力する
    #[arg(long)]
    json: bool,
}

fn load_config(path: Option<&Path>) -> Result<StressFile> {
    let Some(path) = path else {
        return Ok(StressFile::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    StressFile::from_toml(&text).with_context(|| format!("failed to load {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let StressFile {
        mut tiers,
        stress: mut config,
    } = load_config(cli.config.as_deref())?;

    if let Some(mb) = cli.budget_mb {
        tiers.memory_budget = Some(mb.saturating_mul(1024 * 1024));
    }
    tiers.validate()?;

    if let Some(games) = cli.games {
        config.games = games;
    }
    if let Some(max_plies) = cli.max_plies {
        config.max_plies = max_plies;
    }
    if let Some(children) = cli.children {
        config.children_per_node = children;
    }
    if let Some(p) = cli.wall_probability {
        config.wall_probability = p;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if !(0.0..=1.0).contains(&config.wall_probability) {
        bail!("wall_probability must be within 0.0..=1.0");
    }

    log::info!("tiers={tiers:?}");
    log::info!("stress={config:?}");

    let start = Instant::now();
    let stats = stress::run(tiers, &config)?;
    let elapsed = start.elapsed();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("=== Tiered Position Cache Stress ===");
    println!("  Games: {}  Plies: {}", stats.games, stats.plies);
    println!(
        "  Lookups: {}  Hits: {} ({:.1}%)",
        stats.lookups,
        stats.hits,
        stats.hit_rate() * 100.0
    );
    println!(
        "  Inserts: {} (lookahead {})",
        stats.inserts, stats.lookahead_inserts
    );
    println!(
        "  Tier discards: {}  Max tier clears: {}  Exhausted retries: {}",
        stats.pressure_discards, stats.max_tier_clears, stats.exhausted_retries
    );
    println!("  Peak memory: {:.2} MiB", stats.peak_bytes as f64 / (1024.0 * 1024.0));
    println!("  Time elapsed: {:.2}s", elapsed.as_secs_f64());
    Ok(())
}
