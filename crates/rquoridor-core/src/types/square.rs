//! 升（Square）と方向（Direction）
//!
//! 9x9 盤。升番号は `x + 9 * y`（0〜80）。
//! 方向は升番号への加算値として表し、組み合わせて任意の相対移動を作れる。

use crate::error::TypeError;

/// 方向（升番号の差分）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Direction(i8);

impl Direction {
    pub const LEFT: Direction = Direction(-1);
    pub const RIGHT: Direction = Direction(1);
    pub const DOWN: Direction = Direction(-9);
    pub const UP: Direction = Direction(9);

    /// 上下左右
    pub const ALL: [Direction; 4] =
        [Direction::LEFT, Direction::RIGHT, Direction::DOWN, Direction::UP];

    /// (dx, dy) から生成（各成分は -2〜2）
    pub const fn from_delta(dx: i8, dy: i8) -> Result<Direction, TypeError> {
        if dx <= -3 || dx >= 3 || dy <= -3 || dy >= 3 {
            return Err(TypeError::PawnDeltaOutOfRange { dx, dy });
        }
        Ok(Direction(dx + 9 * dy))
    }

    /// エンコード済みの値から復元
    #[inline]
    pub(crate) const fn from_raw(raw: i8) -> Direction {
        Direction(raw)
    }

    /// 生の値を取得
    #[inline]
    pub const fn raw(self) -> i8 {
        self.0
    }

    /// 2つの方向を合成する（各成分は -2〜2 に収まること）
    pub const fn combine(self, rhs: Direction) -> Result<Direction, TypeError> {
        let (dx0, dy0) = self.delta();
        let (dx1, dy1) = rhs.delta();
        Direction::from_delta(dx0 + dx1, dy0 + dy1)
    }

    /// (dx, dy) に分解
    pub const fn delta(self) -> (i8, i8) {
        // -2..=2 の範囲に丸めて復元する
        let mut dy = self.0 / 9;
        let mut dx = self.0 % 9;
        if dx > 2 {
            dx -= 9;
            dy += 1;
        } else if dx < -2 {
            dx += 9;
            dy -= 1;
        }
        (dx, dy)
    }
}

/// 升
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    /// 升の数
    pub const NUM: usize = 81;
    /// 最大の升番号
    pub const MAX_ID: u8 = 80;

    /// 座標から生成
    pub const fn new(x: u8, y: u8) -> Result<Square, TypeError> {
        if x > 8 || y > 8 {
            return Err(TypeError::SquareOutOfRange { x, y });
        }
        Ok(Square(x + 9 * y))
    }

    /// 範囲チェックを省略して生成（定数用）
    #[inline]
    pub(crate) const fn from_xy_unchecked(x: u8, y: u8) -> Square {
        debug_assert!(x <= 8 && y <= 8);
        Square(x + 9 * y)
    }

    /// 升番号から生成
    pub const fn from_id(id: u8) -> Result<Square, TypeError> {
        if id > Self::MAX_ID {
            return Err(TypeError::SquareIdOutOfRange(id));
        }
        Ok(Square(id))
    }

    #[inline]
    pub const fn x(self) -> u8 {
        self.0 % 9
    }

    #[inline]
    pub const fn y(self) -> u8 {
        self.0 / 9
    }

    /// インデックスとして使用
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// 方向を適用した升を返す（盤外や左右の折り返しはエラー）
    pub const fn apply(self, dir: Direction) -> Result<Square, TypeError> {
        let (dx, dy) = dir.delta();
        let x = self.x() as i8 + dx;
        let y = self.y() as i8 + dy;
        if x < 0 || x > 8 || y < 0 || y > 8 {
            return Err(TypeError::PawnOffBoard);
        }
        Ok(Square(x as u8 + 9 * y as u8))
    }
}
