//! エラー型
//!
//! - `CacheError`: 局面キャッシュ（アリーナ／ハッシュ表／階層キャッシュ）のエラー
//! - `TypeError`: 盤面値型（升・指し手・局面）の構築時エラー
//!
//! 検索ミスはエラーではなく `Option::None` / `false` で返す。

use std::collections::TryReserveError;

/// 局面キャッシュのエラー
#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    /// 設定されたブロック数の上限に達した
    #[error("arena exhausted: block limit {blocks} reached")]
    ArenaExhausted { blocks: usize },

    /// 新しいブロックをOSから確保できなかった
    #[error("failed to allocate arena block")]
    AllocFailed(#[from] TryReserveError),

    /// 不正な設定値
    #[error("invalid cache config: {0}")]
    InvalidConfig(String),

    /// 壁の枚数は減らない
    #[error("progress cannot go back from {current} to {requested}")]
    ProgressRegressed { current: usize, requested: usize },

    /// 進行度が最大値を超えた
    #[error("progress {requested} exceeds maximum {max}")]
    ProgressOutOfRange { requested: usize, max: usize },

    /// 存在しない階層
    #[error("no such tier: {0}")]
    NoSuchTier(usize),
}

/// 盤面値型の構築エラー
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("square ({x}, {y}) is off the board")]
    SquareOutOfRange { x: u8, y: u8 },

    #[error("square id {0} is off the board")]
    SquareIdOutOfRange(u8),

    #[error("pawn delta ({dx}, {dy}) out of range")]
    PawnDeltaOutOfRange { dx: i8, dy: i8 },

    #[error("wall at line {line}, position {pos} is off the board")]
    WallOutOfRange { line: u8, pos: u8 },

    #[error("invalid move encoding {0:#04x}")]
    InvalidMoveCode(u8),

    #[error("invalid player id {0}")]
    InvalidPlayer(i8),

    #[error("wall count {0} out of range")]
    WallCountOutOfRange(u8),

    #[error("pawn cannot leave the board")]
    PawnOffBoard,

    #[error("wall slot already occupied")]
    WallOccupied,

    #[error("no walls left")]
    NoWallsLeft,
}

/// キャッシュ操作の結果型
pub type CacheResult<T> = Result<T, CacheError>;
