//! ハッシュ関数と要素初期化フック
//!
//! - `KeyHasher`: キー → 整数。バケット番号はこの値をバケット数で割った余り
//! - `EltInit`: `add_elt` 直後に値スロットを初期化するフック
//!
//! どちらもクロージャをそのまま渡せる。

use std::hash::{Hash, Hasher};

/// キーのハッシュ関数
pub trait KeyHasher<K: ?Sized> {
    fn hash_key(&self, key: &K) -> u64;
}

impl<K: ?Sized, F> KeyHasher<K> for F
where
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

/// 既定のハッシュ関数
///
/// キーの `Hash` が書き出すバイト列を32bitに畳み込む。
/// 分布の良さは保証しない。偏りが問題になる場合は専用の関数を渡すこと。
#[derive(Debug, Clone, Copy, Default)]
pub struct FoldHasher;

impl<K: Hash + ?Sized> KeyHasher<K> for FoldHasher {
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        let mut state = ByteFold::default();
        key.hash(&mut state);
        state.finish()
    }
}

#[derive(Default)]
struct ByteFold {
    acc: u32,
}

impl Hasher for ByteFold {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.acc = self.acc.rotate_left(5) ^ u32::from(b);
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        u64::from(self.acc)
    }
}

/// 要素の初期化フック
pub trait EltInit<K, V> {
    fn init(&self, value: &mut V, key: &K);
}

impl<K, V, F> EltInit<K, V> for F
where
    F: Fn(&mut V, &K),
{
    #[inline]
    fn init(&self, value: &mut V, key: &K) {
        self(value, key)
    }
}

/// 初期化フックなし
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInit;

impl<K, V> EltInit<K, V> for NoInit {
    #[inline]
    fn init(&self, _value: &mut V, _key: &K) {}
}
