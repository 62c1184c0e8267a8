//! 局面キャッシュ
//!
//! 壁の枚数ごとに1つずつ持つハッシュ表と、その階層を管理する層。
//!
//! - `EltHeap`: 要素をブロック単位で確保するアリーナ（フリーリストで再利用）
//! - `GrowHash`: アリーナ上の要素をチェーンでつなぐハッシュ表
//! - `TieredCache`: 進行度（設置済みの壁の枚数）ごとの `GrowHash` の集合
//!
//! 1要素ずつの追加と表全体の破棄は安く、個別削除は効率を気にしない。

mod arena;
mod config;
mod hasher;
mod table;
mod tiered;
mod zobrist;

pub use arena::{Elt, EltHeap, EltRef};
pub use config::{DiscardStrategy, HashConfig, TierConfig};
pub use hasher::{EltInit, FoldHasher, KeyHasher, NoInit};
pub use table::{GrowHash, TableStats};
pub use tiered::{AdvanceReport, TieredCache};
pub use zobrist::ZobristHasher;

use crate::types::{Position, PositionInfo};

/// 局面 → 局面情報の表
pub type PositionInfoHash = GrowHash<Position, PositionInfo, ZobristHasher>;

/// 局面 → 局面情報の階層キャッシュ
pub type PositionCache = TieredCache<Position, PositionInfo, ZobristHasher>;
