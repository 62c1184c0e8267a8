use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rquoridor_core::CacheError;
use rquoridor_core::poshash::{NoInit, PositionCache, TierConfig, ZobristHasher};
use rquoridor_core::types::{
    Direction, Move, Player, Position, PositionInfo, Value, WallOrientation,
};

use super::types::{StressConfig, StressStats};

/// 設定どおりに擬似対局を繰り返す
pub fn run(tiers: TierConfig, config: &StressConfig) -> Result<StressStats> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
    let hasher = ZobristHasher::new(config.seed);
    let mut stats = StressStats::default();

    for game in 0..config.games {
        let mut cache = PositionCache::new(tiers, hasher.clone(), NoInit)
            .context("failed to build position cache")?;
        run_game(&mut cache, config, &mut rng, &mut stats)
            .with_context(|| format!("game {game} failed"))?;
        stats.games += 1;
        log::debug!(
            "game {game}: progress={} entries={} bytes={}",
            cache.progress(),
            cache.len(),
            cache.memory_bytes()
        );
    }
    Ok(stats)
}

/// 1局分の擬似対局
pub fn run_game<R: Rng>(
    cache: &mut PositionCache,
    config: &StressConfig,
    rng: &mut R,
    stats: &mut StressStats,
) -> Result<()> {
    let mut pos = Position::initial();

    for _ in 0..config.max_plies {
        let mut children = Vec::with_capacity(config.children_per_node);
        for _ in 0..config.children_per_node {
            let mv = random_move(&pos, rng, config.wall_probability)?;
            // 盤外・設置済みの手は読み捨てる
            if let Ok(child) = pos.apply(mv) {
                children.push((mv, child));
            }
        }
        if children.is_empty() {
            break;
        }

        for &(mv, child) in &children {
            lookup(cache, &child, mv, stats)?;
        }

        let (_, next) = children[rng.random_range(0..children.len())];
        pos = next;
        stats.plies += 1;

        let mover = !pos.side_to_move();
        if pos.pawn(mover).y() == mover.goal_row() {
            break;
        }

        let report = cache.advance(pos.walls_placed())?;
        if report.max_tier_cleared {
            stats.max_tier_clears += 1;
        }
        stats.pressure_discards += cache.enforce_budget()?.len();
        stats.peak_bytes = stats.peak_bytes.max(cache.memory_bytes());
    }
    Ok(())
}

fn random_move<R: Rng>(pos: &Position, rng: &mut R, wall_probability: f64) -> Result<Move> {
    if pos.walls_left(pos.side_to_move()) > 0 && rng.random_bool(wall_probability) {
        let orientation = if rng.random_bool(0.5) {
            WallOrientation::Row
        } else {
            WallOrientation::Column
        };
        let line = rng.random_range(0..Move::WALL_LINES);
        let at = rng.random_range(0..Move::WALL_LINES);
        Ok(Move::wall(orientation, line, at)?)
    } else {
        Ok(Move::step(Direction::ALL[rng.random_range(0..Direction::ALL.len())]))
    }
}

/// 探索の代わり: 子局面をキャッシュに問い合わせ、なければ評価して書き込む
fn lookup(
    cache: &mut PositionCache,
    child: &Position,
    mv: Move,
    stats: &mut StressStats,
) -> Result<()> {
    let tier = child.walls_placed();
    stats.lookups += 1;
    if cache.get_in(tier, child).is_some() {
        stats.hits += 1;
        return Ok(());
    }

    let info = PositionInfo {
        score: evaluate(child),
        depth: 0,
        best_move: mv,
        computations: 1,
    };
    if insert(cache, tier, *child, info, stats)? {
        stats.inserts += 1;
        if tier > cache.progress() {
            stats.lookahead_inserts += 1;
        }
    }
    Ok(())
}

/// ブロック上限に達したら階層を1つ捨てて1回だけやり直す
fn insert(
    cache: &mut PositionCache,
    tier: usize,
    pos: Position,
    info: PositionInfo,
    stats: &mut StressStats,
) -> Result<bool> {
    for _ in 0..2 {
        let Some(table) = cache.tier_mut(tier) else {
            return Ok(false);
        };
        let written = table.add_elt(pos).map(|slot| *slot = info);
        match written {
            Ok(()) => return Ok(true),
            Err(CacheError::ArenaExhausted { .. }) => {
                stats.exhausted_retries += 1;
                if cache.relieve_pressure()?.is_none() {
                    return Ok(false);
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(false)
}

/// ゴールまでの行数の差（手番側視点）
fn evaluate(pos: &Position) -> Value {
    let us = pos.side_to_move();
    let distance = |p: Player| i32::from(pos.pawn(p).y().abs_diff(p.goal_row()));
    Value::new((distance(!us) - distance(us)) * 100)
}
