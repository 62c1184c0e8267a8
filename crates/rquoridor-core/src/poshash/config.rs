//! キャッシュの設定
//!
//! いずれも `serde` でデシリアライズでき、省略したフィールドは既定値になる。

use serde::Deserialize;

use crate::error::{CacheError, CacheResult};
use crate::types::MAX_WALLS;

/// ハッシュ表1つ分の設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    /// バケット数（構築後は固定）
    pub bucket_count: usize,
    /// 1ブロックあたりの要素数（アリーナの伸長単位）
    pub block_size: usize,
    /// アリーナが確保できるブロック数の上限（`None` なら無制限）
    pub max_blocks: Option<usize>,
}

impl HashConfig {
    pub const DEFAULT_BUCKET_COUNT: usize = 1 << 16;
    pub const DEFAULT_BLOCK_SIZE: usize = 1024;

    pub fn validate(&self) -> CacheResult<()> {
        if self.bucket_count == 0 {
            return Err(CacheError::InvalidConfig("bucket_count must be >= 1".to_string()));
        }
        validate_arena(self.block_size, self.max_blocks)
    }
}

/// アリーナのブロック設定の検証
pub(crate) fn validate_arena(block_size: usize, max_blocks: Option<usize>) -> CacheResult<()> {
    if block_size == 0 || block_size > u32::MAX as usize {
        return Err(CacheError::InvalidConfig(format!(
            "block_size must be in 1..={}, got {}",
            u32::MAX,
            block_size
        )));
    }
    if max_blocks == Some(0) {
        return Err(CacheError::InvalidConfig("max_blocks must be >= 1".to_string()));
    }
    Ok(())
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            bucket_count: Self::DEFAULT_BUCKET_COUNT,
            block_size: Self::DEFAULT_BLOCK_SIZE,
            max_blocks: None,
        }
    }
}

/// メモリ逼迫時に階層を捨てる順序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscardStrategy {
    /// 0, 1, 2, ... の昇順。最大階層は最後
    #[default]
    Ascending,
    /// `keep_every` の倍数以外の階層を先に捨て、残りは昇順（最大階層は最後）
    ///
    /// 隣の階層から再計算しやすいよう、一定間隔で階層を残す。
    EveryNth { keep_every: usize },
}

/// 階層キャッシュの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    /// 最大進行度 W（階層は 0..=W）
    pub max_progress: usize,
    /// 各階層のハッシュ表の設定
    pub table: HashConfig,
    /// メモリ逼迫時の破棄順序
    pub discard_strategy: DiscardStrategy,
    /// 進行度が上がったとき、通過した階層を即座に破棄するか
    pub discard_passed_tiers: bool,
    /// 初めて最大進行度に到達したとき、最大階層を一度だけクリアするか
    pub clear_max_tier_on_reach: bool,
    /// 全階層の合計メモリ使用量の上限（バイト）
    pub memory_budget: Option<usize>,
}

impl TierConfig {
    pub fn validate(&self) -> CacheResult<()> {
        self.table.validate()?;
        if self.discard_strategy == (DiscardStrategy::EveryNth { keep_every: 0 }) {
            return Err(CacheError::InvalidConfig("keep_every must be >= 1".to_string()));
        }
        Ok(())
    }
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            max_progress: MAX_WALLS,
            table: HashConfig::default(),
            discard_strategy: DiscardStrategy::Ascending,
            discard_passed_tiers: false,
            clear_max_tier_on_reach: true,
            memory_budget: None,
        }
    }
}
