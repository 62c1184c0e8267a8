//! 評価値（Value）
//!
//! 通常の評価値は両者のゴールまでの距離差をもとにしたスケールで、
//! `Value::WIN` 付近を「n手でゴール到達」のスコアとして予約している。

/// 評価値
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Value(i32);

impl Value {
    /// ゼロ
    pub const ZERO: Value = Value(0);
    /// 勝ち（ゴール到達側の最大スコア）
    pub const WIN: Value = Value(30000);
    /// 未評価
    pub const NONE: Value = Value(30001);

    /// 最大探索深度内での勝ちスコア
    pub const WIN_IN_MAX_PLY: Value = Value(Self::WIN.0 - 256);
    /// 最大探索深度内での負けスコア
    pub const LOSS_IN_MAX_PLY: Value = Value(-Self::WIN_IN_MAX_PLY.0);

    /// 値から生成
    #[inline]
    pub const fn new(v: i32) -> Value {
        Value(v)
    }

    /// ply手でゴールに到達するスコア
    #[inline]
    pub const fn win_in(ply: i32) -> Value {
        Value(Self::WIN.0 - ply)
    }

    /// ply手で相手がゴールに到達するスコア
    #[inline]
    pub const fn loss_in(ply: i32) -> Value {
        Value(-Self::WIN.0 + ply)
    }

    #[inline]
    pub const fn is_win(self) -> bool {
        self.0 >= Self::WIN_IN_MAX_PLY.0 && self.0 != Self::NONE.0
    }

    #[inline]
    pub const fn is_loss(self) -> bool {
        self.0 <= Self::LOSS_IN_MAX_PLY.0
    }

    /// 決着スコア（勝ちまたは負け）かどうか
    #[inline]
    pub const fn is_decisive(self) -> bool {
        self.is_win() || self.is_loss()
    }

    /// 生の値を取得
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::NONE
    }
}

impl std::ops::Neg for Value {
    type Output = Value;

    #[inline]
    fn neg(self) -> Value {
        Value(-self.0)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Value {
        Value(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_win_in() {
        let v = Value::win_in(5);
        assert!(v.is_win());
        assert!(!v.is_loss());
        assert!(v.is_decisive());
    }

    #[test]
    fn test_value_loss_in() {
        let v = Value::loss_in(3);
        assert!(!v.is_win());
        assert!(v.is_loss());
    }

    #[test]
    fn test_value_default_is_none() {
        // 新規スロットは未評価扱い
        assert_eq!(Value::default(), Value::NONE);
        assert!(!Value::NONE.is_win());
    }

    #[test]
    fn test_value_ordering() {
        assert!(Value::win_in(1) > Value::win_in(10));
        assert!(Value::ZERO > Value::loss_in(1));
        assert_eq!(-Value::new(40), Value::new(-40));
    }
}
