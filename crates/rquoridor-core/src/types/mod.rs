//! 盤面の基本型
//!
//! 置換表から見ると外部の協調者にあたる値型。
//! いずれも固定長で、範囲外の値は構築時に `TypeError` で拒否する。

mod mv;
mod player;
mod position;
mod square;
mod value;

pub use mv::{Move, WallOrientation};
pub use player::Player;
pub use position::{MAX_WALLS, Position, PositionInfo, WALLS_PER_PLAYER};
pub use square::{Direction, Square};
pub use value::Value;
