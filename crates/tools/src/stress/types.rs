use anyhow::{Context, Result};
use rquoridor_core::poshash::TierConfig;
use serde::{Deserialize, Serialize};

/// 設定ファイル全体（`[tiers]` と `[stress]`、どちらも省略可）
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct StressFile {
    pub tiers: TierConfig,
    pub stress: StressConfig,
}

impl StressFile {
    /// TOML 文字列から読み込む
    pub fn from_toml(text: &str) -> Result<Self> {
        let file: StressFile = toml::from_str(text).context("invalid stress config")?;
        file.tiers.validate()?;
        Ok(file)
    }
}

/// 擬似対局の設定
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    /// 対局数（1局ごとにキャッシュを作り直す）
    pub games: usize,
    /// 1局あたりの最大手数
    pub max_plies: usize,
    /// 1手あたりに展開する子局面の数
    pub children_per_node: usize,
    /// 子局面が壁置きになる確率
    pub wall_probability: f64,
    /// 乱数シード
    pub seed: u64,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            games: 4,
            max_plies: 120,
            children_per_node: 64,
            wall_probability: 0.3,
            seed: 20050101,
        }
    }
}

/// 擬似対局の集計
#[derive(Debug, Clone, Default, Serialize)]
pub struct StressStats {
    pub games: usize,
    pub plies: usize,
    pub lookups: u64,
    pub hits: u64,
    pub inserts: u64,
    /// 進行度の先の階層への書き込み
    pub lookahead_inserts: u64,
    /// メモリ逼迫で捨てた階層の延べ数
    pub pressure_discards: usize,
    /// 最大階層クリアの回数
    pub max_tier_clears: usize,
    /// ブロック上限に達して階層を捨て直した回数
    pub exhausted_retries: usize,
    pub peak_bytes: usize,
}

impl StressStats {
    /// ヒット率（0.0〜1.0）
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }
}
