//! 階層キャッシュ（TieredCache）
//!
//! 設置済みの壁の枚数（進行度）ごとに1つずつ `GrowHash` を持つ。
//!
//! 壁は取り除けないので進行度は減らない。進行度が g を超えた時点で
//! 階層 g の局面には二度と到達しない。探索側はそれまでに必要なスコアを
//! 上の階層へ写しておくこと（本モジュールはコピーしない）。
//!
//! メモリの回収は常に階層単位で行い、個別要素の追い出しはしない。
//!
//! - 最大進行度 W に初めて到達したとき、階層 W を一度だけクリアする
//!   （それまでに溜まった局面の大半は到達不能な兄弟局面のため）
//! - メモリ逼迫時は `DiscardStrategy` の順に階層を捨てる
//!
//! いつ捨てるか（どの信号・閾値で）は呼び出し側が決める。

use super::config::{DiscardStrategy, TierConfig};
use super::hasher::{EltInit, FoldHasher, KeyHasher, NoInit};
use super::table::GrowHash;
use crate::error::{CacheError, CacheResult};

/// `advance` の結果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdvanceReport {
    pub from: usize,
    pub to: usize,
    /// 破棄した階層
    pub discarded: Vec<usize>,
    /// 最大階層をクリアしたか
    pub max_tier_cleared: bool,
}

/// 階層キャッシュ
pub struct TieredCache<K, V, H = FoldHasher, I = NoInit> {
    /// 進行度ごとの表。到達不能になって捨てた階層は `None`
    tiers: Vec<Option<GrowHash<K, V, H, I>>>,
    config: TierConfig,
    /// 新しい階層を作るための雛形
    hasher: H,
    init: I,
    progress: usize,
    max_tier_cleared: bool,
}

impl<K, V, H, I> TieredCache<K, V, H, I>
where
    K: Eq,
    V: Default,
    H: KeyHasher<K> + Clone,
    I: EltInit<K, V> + Clone,
{
    /// 階層 0..=W を作成する。進行度は0から始まる
    pub fn new(config: TierConfig, hasher: H, init: I) -> CacheResult<Self> {
        config.validate()?;

        let mut tiers = Vec::with_capacity(config.max_progress + 1);
        for _ in 0..=config.max_progress {
            tiers.push(Some(GrowHash::with_config(
                config.table,
                hasher.clone(),
                init.clone(),
            )?));
        }

        log::debug!(
            "tiered cache: {} tiers, {} buckets, {} elts/block",
            tiers.len(),
            config.table.bucket_count,
            config.table.block_size
        );

        Ok(Self {
            tiers,
            config,
            hasher,
            init,
            progress: 0,
            max_tier_cleared: false,
        })
    }

    fn fresh_table(&self) -> CacheResult<GrowHash<K, V, H, I>> {
        GrowHash::with_config(self.config.table, self.hasher.clone(), self.init.clone())
    }

    fn current(&self) -> Option<&GrowHash<K, V, H, I>> {
        self.tiers.get(self.progress).and_then(Option::as_ref)
    }

    fn current_mut(&mut self) -> CacheResult<&mut GrowHash<K, V, H, I>> {
        let progress = self.progress;
        self.tiers
            .get_mut(progress)
            .and_then(Option::as_mut)
            .ok_or(CacheError::NoSuchTier(progress))
    }

    /// 現在の階層から探す
    pub fn get(&self, key: &K) -> Option<&V> {
        self.current()?.get_elt(key)
    }

    /// 現在の階層から探す（書き換え用）
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.current_mut().ok()?.get_elt_mut(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.current().is_some_and(|t| t.contains(key))
    }

    /// 現在の階層に追加する（重複チェックなし）
    pub fn add(&mut self, key: K) -> CacheResult<&mut V> {
        self.current_mut()?.add_elt(key)
    }

    /// 現在の階層から取り除く
    pub fn remove(&mut self, key: &K) -> bool {
        self.current_mut().is_ok_and(|t| t.rm_elt(key))
    }

    /// 指定階層から探す（下の階層が残っている間のスコアの引き継ぎ用）
    pub fn get_in(&self, tier: usize, key: &K) -> Option<&V> {
        self.tier(tier)?.get_elt(key)
    }

    /// 進行度を進める
    ///
    /// 進行度は減らせない。同じ値なら何もしない。
    pub fn advance(&mut self, progress: usize) -> CacheResult<AdvanceReport> {
        if progress < self.progress {
            return Err(CacheError::ProgressRegressed {
                current: self.progress,
                requested: progress,
            });
        }
        if progress > self.config.max_progress {
            return Err(CacheError::ProgressOutOfRange {
                requested: progress,
                max: self.config.max_progress,
            });
        }

        let mut report = AdvanceReport {
            from: self.progress,
            to: progress,
            ..Default::default()
        };
        self.progress = progress;

        if self.config.discard_passed_tiers {
            for g in 0..progress {
                if self.tiers[g].take().is_some() {
                    report.discarded.push(g);
                }
            }
            if !report.discarded.is_empty() {
                log::debug!("tiered cache: retired passed tiers {:?}", report.discarded);
            }
        }

        if progress == self.config.max_progress && self.config.clear_max_tier_on_reach {
            report.max_tier_cleared = self.clear_max_tier()?;
        }

        Ok(report)
    }

    /// 最大階層を一度だけクリアする
    ///
    /// 最大進行度に到達していない場合や、既にクリア済みの場合は false。
    pub fn clear_max_tier(&mut self) -> CacheResult<bool> {
        let max = self.config.max_progress;
        if self.max_tier_cleared || self.progress < max {
            return Ok(false);
        }
        let fresh = self.fresh_table()?;
        let released = self.tiers[max].replace(fresh).map_or(0, |t| t.blocks_allocated());
        self.max_tier_cleared = true;
        log::info!("tiered cache: cleared max tier {max} ({released} blocks)");
        Ok(true)
    }

    /// 階層を丸ごと捨てる。解放したブロック数を返す
    ///
    /// 到達不能な階層（現在の進行度より下）は取り除き、
    /// それ以外は空の表に置き換える。他の階層には影響しない。
    pub fn discard_tier(&mut self, tier: usize) -> CacheResult<usize> {
        if tier > self.config.max_progress {
            return Err(CacheError::NoSuchTier(tier));
        }
        let old = if tier < self.progress {
            self.tiers[tier].take()
        } else {
            let fresh = self.fresh_table()?;
            self.tiers[tier].replace(fresh)
        };
        let released = old.map_or(0, |t| t.blocks_allocated());
        log::debug!("tiered cache: discarded tier {tier} ({released} blocks)");
        Ok(released)
    }

    /// メモリ逼迫時に1階層捨てる。捨てた階層を返す（捨てるものがなければ `None`）
    ///
    /// 到達不能な階層は空でもバケット配列を持っているので候補に入れる。
    /// 到達可能な階層は空の表に置き換わるだけなので、ブロックを持つものに限る。
    pub fn relieve_pressure(&mut self) -> CacheResult<Option<usize>> {
        let progress = self.progress;
        let victim = self.discard_order().into_iter().find(|&g| {
            self.tiers[g]
                .as_ref()
                .is_some_and(|t| g < progress || t.blocks_allocated() > 0)
        });
        match victim {
            Some(g) => {
                self.discard_tier(g)?;
                Ok(Some(g))
            }
            None => Ok(None),
        }
    }

    /// 予算を超えている間、階層を捨て続ける。捨てた階層を返す
    pub fn enforce_budget(&mut self) -> CacheResult<Vec<usize>> {
        let mut discarded = Vec::new();
        while self.over_budget() {
            match self.relieve_pressure()? {
                Some(g) => discarded.push(g),
                None => break,
            }
        }
        if !discarded.is_empty() {
            log::info!(
                "tiered cache: discarded tiers {:?} to fit budget ({} bytes in use)",
                discarded,
                self.memory_bytes()
            );
        }
        Ok(discarded)
    }
}

impl<K, V, H, I> TieredCache<K, V, H, I> {
    /// 現在の進行度
    #[inline]
    pub fn progress(&self) -> usize {
        self.progress
    }

    #[inline]
    pub fn max_progress(&self) -> usize {
        self.config.max_progress
    }

    #[inline]
    pub fn config(&self) -> &TierConfig {
        &self.config
    }

    pub fn tier(&self, tier: usize) -> Option<&GrowHash<K, V, H, I>> {
        self.tiers.get(tier).and_then(Option::as_ref)
    }

    pub fn tier_mut(&mut self, tier: usize) -> Option<&mut GrowHash<K, V, H, I>> {
        self.tiers.get_mut(tier).and_then(Option::as_mut)
    }

    /// 階層が残っているか
    pub fn is_active(&self, tier: usize) -> bool {
        self.tier(tier).is_some()
    }

    /// 全階層の要素数
    pub fn len(&self) -> usize {
        self.tiers.iter().flatten().map(GrowHash::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 全階層のメモリ使用量の概算（バイト）
    pub fn memory_bytes(&self) -> usize {
        self.tiers.iter().flatten().map(GrowHash::memory_bytes).sum()
    }

    /// メモリ予算を超えているか（予算未設定なら常に false）
    pub fn over_budget(&self) -> bool {
        self.config
            .memory_budget
            .is_some_and(|budget| self.memory_bytes() > budget)
    }

    /// メモリ逼迫時に捨てる順序
    pub fn discard_order(&self) -> Vec<usize> {
        let max = self.config.max_progress;
        match self.config.discard_strategy {
            DiscardStrategy::Ascending => (0..=max).collect(),
            DiscardStrategy::EveryNth { keep_every } => {
                let n = keep_every.max(1);
                (0..max)
                    .filter(|g| g % n != 0)
                    .chain((0..max).filter(|g| g % n == 0))
                    .chain(std::iter::once(max))
                    .collect()
            }
        }
    }
}
