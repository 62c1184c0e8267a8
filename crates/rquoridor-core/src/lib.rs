//! rquoridor-core
//!
//! コリドール探索エンジン用の局面キャッシュ。
//!
//! - `types`: 升・指し手・局面などの固定長の値型
//! - `poshash`: アリーナ上の伸長型ハッシュ表と、壁の枚数ごとの階層キャッシュ
//! - `error`: エラー型
//!
//! シングルスレッド前提。同じ表を複数スレッドから触る場合は呼び出し側で直列化すること。

pub mod error;
pub mod poshash;
pub mod types;

pub use error::{CacheError, CacheResult, TypeError};
pub use poshash::{GrowHash, PositionCache, PositionInfoHash, TieredCache};
pub use types::{Move, Player, Position, PositionInfo, Square};
