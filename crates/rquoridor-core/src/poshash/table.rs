//! 伸長型ハッシュ表（GrowHash）
//!
//! 1要素ずつの追加と表全体の破棄を安くし、個別削除の効率は気にしない表。
//!
//! - バケット: チェーンの先頭要素への参照。チェーンは要素内のリンクでつなぐ
//! - 追加: チェーンの先頭に挿入する（同じキーを重複して追加すると新しい方が見える）
//! - 重複チェックはしない。必要なら呼び出し側が `get_elt` で確認してから追加する

use super::arena::{EltHeap, EltRef};
use super::config::HashConfig;
use super::hasher::{EltInit, FoldHasher, KeyHasher, NoInit};
use crate::error::CacheResult;

/// 表の統計
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableStats {
    /// 生存している要素数
    pub live: usize,
    /// 確保済みブロック数
    pub blocks: usize,
    /// フリーリスト上のスロット数
    pub free: usize,
    /// 最長チェーンの長さ
    pub longest_chain: usize,
    /// メモリ使用量の概算（バイト）
    pub memory_bytes: usize,
}

/// 伸長型ハッシュ表
pub struct GrowHash<K, V, H = FoldHasher, I = NoInit> {
    /// 各バケットのチェーン先頭
    heads: Vec<Option<EltRef>>,
    heap: EltHeap<K, V>,
    num_elts: usize,
    hasher: H,
    init: I,
}

impl<K: Eq, V: Default, H: KeyHasher<K>> GrowHash<K, V, H, NoInit> {
    /// 既定の設定で作成（初期化フックなし）
    pub fn new(hasher: H) -> Self {
        Self::from_parts(HashConfig::default(), hasher, NoInit)
    }
}

impl<K: Eq, V: Default, H: KeyHasher<K>, I: EltInit<K, V>> GrowHash<K, V, H, I> {
    /// 既定の設定で、初期化フック付きで作成
    pub fn with_init(hasher: H, init: I) -> Self {
        Self::from_parts(HashConfig::default(), hasher, init)
    }

    /// 設定を指定して作成
    pub fn with_config(config: HashConfig, hasher: H, init: I) -> CacheResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, hasher, init))
    }

    fn from_parts(config: HashConfig, hasher: H, init: I) -> Self {
        Self {
            heads: vec![None; config.bucket_count],
            heap: EltHeap::from_validated(config.block_size, config.max_blocks),
            num_elts: 0,
            hasher,
            init,
        }
    }

    #[inline]
    fn bucket_index(&self, key: &K) -> usize {
        (self.hasher.hash_key(key) % self.heads.len() as u64) as usize
    }

    /// 新しい要素を追加し、値スロットを返す
    ///
    /// 値スロットは新規なら `V::default()`、再利用なら以前の内容のまま。
    /// 初期化フックがあればその後に呼ぶ。
    pub fn add_elt(&mut self, key: K) -> CacheResult<&mut V> {
        let bucket = self.bucket_index(&key);
        let r = self.heap.elt_alloc(key)?;

        let elt = self.heap.get_mut(r);
        elt.next = self.heads[bucket];
        self.init.init(&mut elt.value, &elt.key);

        self.heads[bucket] = Some(r);
        self.num_elts += 1;
        Ok(&mut self.heap.get_mut(r).value)
    }

    /// キーに一致する最初の要素を探す
    fn find(&self, key: &K) -> Option<EltRef> {
        let mut cur = self.heads[self.bucket_index(key)];
        while let Some(r) = cur {
            let elt = self.heap.get(r);
            if elt.key == *key {
                return Some(r);
            }
            cur = elt.next;
        }
        None
    }

    /// 既存の要素を探す
    pub fn get_elt(&self, key: &K) -> Option<&V> {
        self.find(key).map(|r| &self.heap.get(r).value)
    }

    /// 既存の要素を探す（書き換え用）
    pub fn get_elt_mut(&mut self, key: &K) -> Option<&mut V> {
        let r = self.find(key)?;
        Some(&mut self.heap.get_mut(r).value)
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// キーに一致する最初の要素を取り除く。見つからなければ false
    pub fn rm_elt(&mut self, key: &K) -> bool {
        let bucket = self.bucket_index(key);
        let mut prev: Option<EltRef> = None;
        let mut cur = self.heads[bucket];

        while let Some(r) = cur {
            let (found, next) = {
                let elt = self.heap.get(r);
                (elt.key == *key, elt.next)
            };
            if found {
                match prev {
                    None => self.heads[bucket] = next,
                    Some(p) => self.heap.get_mut(p).next = next,
                }
                self.heap.elt_free(r);
                self.num_elts -= 1;
                return true;
            }
            prev = Some(r);
            cur = next;
        }
        false
    }
}

impl<K, V, H, I> GrowHash<K, V, H, I> {
    /// 生存している要素数
    #[inline]
    pub fn len(&self) -> usize {
        self.num_elts
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_elts == 0
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.heads.len()
    }

    #[inline]
    pub fn blocks_allocated(&self) -> usize {
        self.heap.blocks_allocated()
    }

    /// アリーナへの参照
    #[inline]
    pub fn heap(&self) -> &EltHeap<K, V> {
        &self.heap
    }

    /// 全要素を捨てる。解放したブロック数を返す
    ///
    /// コストはブロック数とバケット数に比例し、要素数には依存しない
    /// （`EltHeap::requires_cleanup` が false の場合）。
    pub fn clear(&mut self) -> usize {
        self.heads.fill(None);
        self.num_elts = 0;
        self.heap.release()
    }

    /// メモリ使用量の概算（バイト）
    pub fn memory_bytes(&self) -> usize {
        self.heads.capacity() * std::mem::size_of::<Option<EltRef>>() + self.heap.memory_bytes()
    }

    /// 統計を集計する（全チェーンを走査する）
    pub fn stats(&self) -> TableStats {
        let longest_chain = self
            .heads
            .iter()
            .map(|&head| self.chain(head).count())
            .max()
            .unwrap_or(0);

        TableStats {
            live: self.num_elts,
            blocks: self.heap.blocks_allocated(),
            free: self.heap.free_len(),
            longest_chain,
            memory_bytes: self.memory_bytes(),
        }
    }

    /// 生存している全要素を走査する（バケット順、チェーン内は新しい順）
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.heads.iter().flat_map(move |&head| {
            self.chain(head).map(move |r| {
                let elt = self.heap.get(r);
                (&elt.key, &elt.value)
            })
        })
    }

    fn chain(&self, head: Option<EltRef>) -> impl Iterator<Item = EltRef> + '_ {
        std::iter::successors(head, move |&r| self.heap.get(r).next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    fn small(bucket_count: usize, block_size: usize) -> GrowHash<u64, u32, FoldHasher> {
        let config = HashConfig {
            bucket_count,
            block_size,
            max_blocks: None,
        };
        GrowHash::with_config(config, FoldHasher, NoInit).unwrap()
    }

    #[test]
    fn test_table_empty_lookup() {
        let table = small(16, 8);
        for k in 0..100 {
            assert!(table.get_elt(&k).is_none());
        }
        assert!(table.is_empty());
        assert_eq!(table.blocks_allocated(), 0);
    }

    #[test]
    fn test_table_add_and_get() {
        let mut table = small(16, 8);
        *table.add_elt(42).unwrap() = 7;
        assert_eq!(table.get_elt(&42), Some(&7));
        assert_eq!(table.len(), 1);

        *table.get_elt_mut(&42).unwrap() += 1;
        assert_eq!(table.get_elt(&42), Some(&8));
    }

    #[test]
    fn test_table_remove() {
        let mut table = small(4, 8);
        for k in 0..20 {
            *table.add_elt(k).unwrap() = k as u32;
        }
        assert!(table.rm_elt(&7));
        assert!(table.get_elt(&7).is_none());
        assert!(!table.rm_elt(&7));
        assert_eq!(table.len(), 19);

        // 同じバケットの他の要素は残る
        for k in (0..20).filter(|&k| k != 7) {
            assert_eq!(table.get_elt(&k), Some(&(k as u32)));
        }

        // 再追加すれば見える
        *table.add_elt(7).unwrap() = 700;
        assert_eq!(table.get_elt(&7), Some(&700));
    }

    #[test]
    fn test_table_remove_missing() {
        let mut table = small(4, 8);
        assert!(!table.rm_elt(&1));
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_table_duplicate_key_newest_wins() {
        let mut table = small(16, 8);
        *table.add_elt(5).unwrap() = 1;
        *table.add_elt(5).unwrap() = 2;
        assert_eq!(table.len(), 2);
        assert_eq!(table.get_elt(&5), Some(&2));

        // 新しい方を消すと古い方が見える
        assert!(table.rm_elt(&5));
        assert_eq!(table.get_elt(&5), Some(&1));
    }

    #[test]
    fn test_table_single_bucket_chain() {
        // バケット1つ: 全要素が同じチェーンに入る
        let mut table = small(1, 4);
        for k in 0..10 {
            *table.add_elt(k).unwrap() = k as u32 * 10;
        }
        assert_eq!(table.stats().longest_chain, 10);
        // 先頭・中間・末尾を削除
        assert!(table.rm_elt(&9));
        assert!(table.rm_elt(&4));
        assert!(table.rm_elt(&0));
        assert_eq!(table.iter().count(), 7);
        assert_eq!(table.get_elt(&5), Some(&50));
    }

    #[test]
    fn test_table_init_hook() {
        let config = HashConfig {
            bucket_count: 8,
            block_size: 4,
            max_blocks: None,
        };
        let init = |v: &mut u32, k: &u64| *v = *k as u32 * 2;
        let mut table = GrowHash::with_config(config, FoldHasher, init).unwrap();
        assert_eq!(*table.add_elt(21u64).unwrap(), 42);

        // 再利用スロットにもフックが走る
        *table.get_elt_mut(&21).unwrap() = 0;
        assert!(table.rm_elt(&21));
        assert_eq!(*table.add_elt(5).unwrap(), 10);
    }

    #[test]
    fn test_table_reused_slot_keeps_stale_value_without_hook() {
        let mut table = small(8, 4);
        *table.add_elt(1).unwrap() = 99;
        assert!(table.rm_elt(&1));
        assert_eq!(*table.add_elt(2).unwrap(), 99);
    }

    #[test]
    fn test_table_custom_hasher() {
        let config = HashConfig {
            bucket_count: 10,
            block_size: 4,
            max_blocks: None,
        };
        let mut table: GrowHash<u64, u32, _> =
            GrowHash::with_config(config, |k: &u64| *k, NoInit).unwrap();
        *table.add_elt(3).unwrap() = 1;
        *table.add_elt(13).unwrap() = 2;
        *table.add_elt(23).unwrap() = 3;
        assert_eq!(table.stats().longest_chain, 3);
        assert_eq!(table.get_elt(&13), Some(&2));
    }

    #[test]
    fn test_table_clear() {
        let mut table = small(8, 4);
        for k in 0..10 {
            table.add_elt(k).unwrap();
        }
        assert_eq!(table.clear(), 3);
        assert!(table.is_empty());
        assert!(table.get_elt(&3).is_none());
        assert_eq!(table.blocks_allocated(), 0);

        table.add_elt(3).unwrap();
        assert!(table.contains(&3));
    }

    #[test]
    fn test_table_exhaustion_propagates() {
        let config = HashConfig {
            bucket_count: 8,
            block_size: 2,
            max_blocks: Some(1),
        };
        let mut table: GrowHash<u64, u32> =
            GrowHash::with_config(config, FoldHasher, NoInit).unwrap();
        table.add_elt(1).unwrap();
        table.add_elt(2).unwrap();
        assert!(matches!(table.add_elt(3), Err(CacheError::ArenaExhausted { .. })));
        // 失敗しても既存の要素は壊れない
        assert_eq!(table.len(), 2);
        assert!(table.contains(&1));
        assert!(!table.contains(&3));
    }

    #[test]
    fn test_table_invalid_config() {
        let config = HashConfig {
            bucket_count: 0,
            ..Default::default()
        };
        assert!(GrowHash::<u64, u32>::with_config(config, FoldHasher, NoInit).is_err());
    }
}
