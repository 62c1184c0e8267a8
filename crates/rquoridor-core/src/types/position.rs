//! 局面（Position）
//!
//! 置換表のキーとして使う固定長の局面記述子。
//! 両者の駒位置・残り壁数・設置済みの壁（行/列ごとに 8x8 のビット集合）・手番を持つ。

use super::{Move, Player, Square, Value, WallOrientation};
use crate::error::TypeError;

/// 1人あたりの壁の枚数
pub const WALLS_PER_PLAYER: u8 = 10;
/// 盤上に置かれうる壁の総数（階層キャッシュの最大進行度）
pub const MAX_WALLS: usize = WALLS_PER_PLAYER as usize * Player::NUM;

/// 局面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pawns: [Square; Player::NUM],
    walls_left: [u8; Player::NUM],
    row_walls: u64,
    col_walls: u64,
    side_to_move: Player,
}

impl Position {
    /// 初期局面（白は (4,0)、黒は (4,8)、白番）
    pub fn initial() -> Position {
        Position {
            pawns: [Square::from_xy_unchecked(4, 0), Square::from_xy_unchecked(4, 8)],
            walls_left: [WALLS_PER_PLAYER; Player::NUM],
            row_walls: 0,
            col_walls: 0,
            side_to_move: Player::White,
        }
    }

    /// 壁のない局面を作成
    pub fn new(
        pawns: [Square; Player::NUM],
        walls_left: [u8; Player::NUM],
        side_to_move: Player,
    ) -> Result<Position, TypeError> {
        for &n in &walls_left {
            if n > WALLS_PER_PLAYER {
                return Err(TypeError::WallCountOutOfRange(n));
            }
        }
        Ok(Position {
            pawns,
            walls_left,
            row_walls: 0,
            col_walls: 0,
            side_to_move,
        })
    }

    #[inline]
    pub fn pawn(&self, player: Player) -> Square {
        self.pawns[player.index()]
    }

    #[inline]
    pub fn walls_left(&self, player: Player) -> u8 {
        self.walls_left[player.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    /// 設置済みの壁の枚数（階層キャッシュの進行度）
    #[inline]
    pub fn walls_placed(&self) -> usize {
        (self.row_walls.count_ones() + self.col_walls.count_ones()) as usize
    }

    /// 指定位置に壁があるか
    pub fn has_wall(&self, orientation: WallOrientation, line: u8, pos: u8) -> bool {
        let Some(bit) = wall_bit(line, pos) else {
            return false;
        };
        match orientation {
            WallOrientation::Row => self.row_walls & bit != 0,
            WallOrientation::Column => self.col_walls & bit != 0,
        }
    }

    /// 手番側が指し手を指した後の局面を返す
    ///
    /// 盤外への移動、設置済みの位置への壁置き、壁切れを拒否する。
    /// 経路の遮断判定は行わない。
    pub fn apply(&self, mv: Move) -> Result<Position, TypeError> {
        let us = self.side_to_move;
        let mut next = *self;

        if mv.is_wall() {
            let (line, pos) = (mv.wall_line(), mv.wall_pos());
            if self.walls_left[us.index()] == 0 {
                return Err(TypeError::NoWallsLeft);
            }
            if self.has_wall(mv.wall_orientation(), line, pos) {
                return Err(TypeError::WallOccupied);
            }
            let bit = wall_bit(line, pos).ok_or(TypeError::WallOutOfRange { line, pos })?;
            match mv.wall_orientation() {
                WallOrientation::Row => next.row_walls |= bit,
                WallOrientation::Column => next.col_walls |= bit,
            }
            next.walls_left[us.index()] -= 1;
        } else if mv.exists() {
            next.pawns[us.index()] = self.pawn(us).apply(mv.direction())?;
        } else {
            return Err(TypeError::PawnDeltaOutOfRange { dx: 0, dy: 0 });
        }

        next.side_to_move = !us;
        Ok(next)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::initial()
    }
}

#[inline]
fn wall_bit(line: u8, pos: u8) -> Option<u64> {
    if line >= Move::WALL_LINES || pos >= Move::WALL_LINES {
        return None;
    }
    Some(1u64 << (line * Move::WALL_LINES + pos))
}

/// 置換表に格納する局面情報
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionInfo {
    /// 評価値
    pub score: Value,
    /// 探索深さ
    pub depth: u8,
    /// 最善手
    pub best_move: Move,
    /// この評価値の導出に寄与した計算済み局面の累計
    ///
    /// 直接計算した局面は1。多くの計算から導かれた局面ほど捨てると高くつく。
    pub computations: u32,
}
