//! 指し手（Move）
//!
//! 1バイトにエンコードする。
//!
//! - bit0 = 1: 壁置き / 0: 駒移動
//! - 駒移動: `(move as i8) >> 1` が方向（`Direction`）
//! - 壁置き: bit1 = 行に置く、bit2-4 = 行/列番号、bit5-7 = 行/列内の位置

use super::Direction;
use crate::error::TypeError;

/// 壁の向き
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WallOrientation {
    /// 列に沿って置く（縦壁）
    Column = 0,
    /// 行に沿って置く（横壁）
    Row = 1,
}

/// 指し手
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Move(u8);

impl Move {
    /// 壁を置ける行/列の数
    pub const WALL_LINES: u8 = 8;

    /// 無効な指し手
    pub const NONE: Move = Move(0);

    /// 壁置き
    pub const fn wall(
        orientation: WallOrientation,
        line: u8,
        pos: u8,
    ) -> Result<Move, TypeError> {
        if line >= Self::WALL_LINES || pos >= Self::WALL_LINES {
            return Err(TypeError::WallOutOfRange { line, pos });
        }
        Ok(Move((pos << 5) | (line << 2) | ((orientation as u8) << 1) | 1))
    }

    /// 駒移動（各成分は -2〜2、両方0は不可）
    pub const fn pawn(dx: i8, dy: i8) -> Result<Move, TypeError> {
        if dx == 0 && dy == 0 {
            return Err(TypeError::PawnDeltaOutOfRange { dx, dy });
        }
        match Direction::from_delta(dx, dy) {
            Ok(dir) => Ok(Move::step(dir)),
            Err(e) => Err(e),
        }
    }

    /// 方向を指定した駒移動
    #[inline]
    pub const fn step(dir: Direction) -> Move {
        Move((dir.raw() << 1) as u8)
    }

    /// エンコード済みの値から生成
    ///
    /// 壁置きはどのビット列も有効。駒移動は各成分が -2〜2 に収まる方向だけ受け付ける。
    /// 0 は `Move::NONE`。
    pub const fn from_u8(mv: u8) -> Result<Move, TypeError> {
        let m = Move(mv);
        if m.is_wall() || mv == 0 {
            return Ok(m);
        }
        let (dx, dy) = m.direction().delta();
        if dx < -2 || dx > 2 || dy < -2 || dy > 2 {
            return Err(TypeError::InvalidMoveCode(mv));
        }
        Ok(m)
    }

    #[inline]
    pub const fn is_wall(self) -> bool {
        self.0 & 0x01 != 0
    }

    #[inline]
    pub const fn is_pawn(self) -> bool {
        !self.is_wall()
    }

    #[inline]
    pub const fn wall_orientation(self) -> WallOrientation {
        if self.0 & 0x02 != 0 {
            WallOrientation::Row
        } else {
            WallOrientation::Column
        }
    }

    #[inline]
    pub const fn wall_line(self) -> u8 {
        (self.0 & 0x1f) >> 2
    }

    #[inline]
    pub const fn wall_pos(self) -> u8 {
        self.0 >> 5
    }

    /// 駒移動の方向
    #[inline]
    pub const fn direction(self) -> Direction {
        Direction::from_raw((self.0 as i8) >> 1)
    }

    /// 1バイト表現
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self.0
    }

    /// `Move::NONE` 以外なら true
    #[inline]
    pub const fn exists(self) -> bool {
        self.0 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_none() {
        assert!(!Move::NONE.exists());
        assert_eq!(Move::default(), Move::NONE);
    }

    #[test]
    fn test_move_wall_encoding() {
        let mv = Move::wall(WallOrientation::Row, 3, 7).unwrap();
        assert!(mv.is_wall());
        assert!(mv.exists());
        assert_eq!(mv.wall_orientation(), WallOrientation::Row);
        assert_eq!(mv.wall_line(), 3);
        assert_eq!(mv.wall_pos(), 7);

        let mv = Move::wall(WallOrientation::Column, 0, 0).unwrap();
        assert!(mv.is_wall());
        assert_eq!(mv.wall_orientation(), WallOrientation::Column);
    }

    #[test]
    fn test_move_wall_out_of_range() {
        assert_eq!(
            Move::wall(WallOrientation::Row, 8, 0),
            Err(TypeError::WallOutOfRange { line: 8, pos: 0 })
        );
    }

    #[test]
    fn test_move_pawn() {
        let mv = Move::pawn(1, -1).unwrap();
        assert!(mv.is_pawn());
        assert_eq!(mv.direction().delta(), (1, -1));

        let mv = Move::step(Direction::UP.combine(Direction::UP).unwrap());
        assert_eq!(mv.direction().delta(), (0, 2));

        assert!(Move::pawn(0, 0).is_err());
        assert!(Move::pawn(0, 3).is_err());
    }

    #[test]
    fn test_move_from_u8() {
        let mv = Move::pawn(-2, 1).unwrap();
        assert_eq!(Move::from_u8(mv.to_u8()), Ok(mv));
        let wall = Move::wall(WallOrientation::Column, 7, 7).unwrap();
        assert_eq!(Move::from_u8(wall.to_u8()), Ok(wall));
        assert_eq!(Move::from_u8(0), Ok(Move::NONE));

        // 方向 21 = (3, 2) は盤外
        assert_eq!(Move::from_u8(21 << 1), Err(TypeError::InvalidMoveCode(42)));
        // 方向 -30 = (-3, -3)
        let code = (-30i8 << 1) as u8;
        assert_eq!(Move::from_u8(code), Err(TypeError::InvalidMoveCode(code)));
    }
}
