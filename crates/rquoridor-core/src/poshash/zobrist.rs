//! 局面用の Zobrist ハッシュ
//!
//! 既定の `FoldHasher` は分布を保証しないため、`Position` をキーにする場合は
//! こちらを使う。乱数表はシードから決定的に生成する。

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use super::KeyHasher;
use crate::types::{Player, Position, Square, WALLS_PER_PLAYER, WallOrientation};

const WALL_SLOTS: usize = 64;
const WALL_COUNTS: usize = WALLS_PER_PLAYER as usize + 1;

/// Zobrist 乱数表
#[derive(Debug, Clone)]
pub struct ZobristHasher {
    pawn: [[u64; Square::NUM]; Player::NUM],
    row_wall: [u64; WALL_SLOTS],
    col_wall: [u64; WALL_SLOTS],
    walls_left: [[u64; WALL_COUNTS]; Player::NUM],
    side: u64,
}

impl ZobristHasher {
    pub const DEFAULT_SEED: u64 = 0x5155_4f52_4944_4f52;

    pub fn new(seed: u64) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut table = Self {
            pawn: [[0; Square::NUM]; Player::NUM],
            row_wall: [0; WALL_SLOTS],
            col_wall: [0; WALL_SLOTS],
            walls_left: [[0; WALL_COUNTS]; Player::NUM],
            side: 0,
        };

        for keys in table.pawn.iter_mut() {
            keys.iter_mut().for_each(|k| *k = rng.next_u64());
        }
        table.row_wall.iter_mut().for_each(|k| *k = rng.next_u64());
        table.col_wall.iter_mut().for_each(|k| *k = rng.next_u64());
        for keys in table.walls_left.iter_mut() {
            keys.iter_mut().for_each(|k| *k = rng.next_u64());
        }
        table.side = rng.next_u64();
        table
    }
}

impl Default for ZobristHasher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

impl KeyHasher<Position> for ZobristHasher {
    fn hash_key(&self, pos: &Position) -> u64 {
        let mut h = 0;
        for player in [Player::White, Player::Black] {
            h ^= self.pawn[player.index()][pos.pawn(player).index()];
            h ^= self.walls_left[player.index()][pos.walls_left(player) as usize];
        }
        for line in 0..8u8 {
            for p in 0..8u8 {
                let slot = (line * 8 + p) as usize;
                if pos.has_wall(WallOrientation::Row, line, p) {
                    h ^= self.row_wall[slot];
                }
                if pos.has_wall(WallOrientation::Column, line, p) {
                    h ^= self.col_wall[slot];
                }
            }
        }
        if pos.side_to_move() == Player::Black {
            h ^= self.side;
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, Move};

    #[test]
    fn test_zobrist_deterministic() {
        let a = ZobristHasher::new(1);
        let b = ZobristHasher::new(1);
        let pos = Position::initial();
        assert_eq!(a.hash_key(&pos), b.hash_key(&pos));
    }

    #[test]
    fn test_zobrist_distinguishes_moves() {
        let z = ZobristHasher::default();
        let pos = Position::initial();
        let step = pos.apply(Move::step(Direction::UP)).unwrap();
        let wall = pos.apply(Move::wall(WallOrientation::Row, 0, 0).unwrap()).unwrap();
        let h0 = z.hash_key(&pos);
        assert_ne!(h0, z.hash_key(&step));
        assert_ne!(h0, z.hash_key(&wall));
        assert_ne!(z.hash_key(&step), z.hash_key(&wall));
    }
}
