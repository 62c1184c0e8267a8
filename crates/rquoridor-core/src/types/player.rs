//! 手番（Player）

use crate::error::TypeError;

/// 手番（白/黒）
///
/// 白は y=0 側から出発して y=8 を目指す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Player {
    White = 0,
    Black = 1,
}

impl Player {
    /// 手番の数
    pub const NUM: usize = 2;

    /// 数値IDから変換（0: 白, 1: 黒）
    pub const fn from_id(id: i8) -> Result<Player, TypeError> {
        match id {
            0 => Ok(Player::White),
            1 => Ok(Player::Black),
            _ => Err(TypeError::InvalidPlayer(id)),
        }
    }

    /// 相手番を返す
    #[inline]
    pub const fn opponent(self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// インデックスとして使用（配列アクセス用）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// ゴールとなる行
    #[inline]
    pub const fn goal_row(self) -> u8 {
        match self {
            Player::White => 8,
            Player::Black => 0,
        }
    }
}

impl std::ops::Not for Player {
    type Output = Player;

    #[inline]
    fn not(self) -> Player {
        self.opponent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_opponent() {
        assert_eq!(Player::White.opponent(), Player::Black);
        assert_eq!(!Player::Black, Player::White);
    }

    #[test]
    fn test_player_from_id() {
        assert_eq!(Player::from_id(0), Ok(Player::White));
        assert_eq!(Player::from_id(1), Ok(Player::Black));
        // NoPlayer 相当の値は拒否する
        assert_eq!(Player::from_id(-1), Err(TypeError::InvalidPlayer(-1)));
        assert_eq!(Player::from_id(2), Err(TypeError::InvalidPlayer(2)));
    }

    #[test]
    fn test_player_goal_row() {
        assert_eq!(Player::White.goal_row(), 8);
        assert_eq!(Player::Black.goal_row(), 0);
    }
}
