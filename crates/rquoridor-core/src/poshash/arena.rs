//! 要素アリーナ（EltHeap）
//!
//! ハッシュ表の要素をブロック単位で確保するプール。
//!
//! - 確保: フリーリスト → 現在のブロックの残り → 新しいブロック の順
//! - 解放（`elt_free`）: フリーリストに積むだけ。縮小もコンパクションもしない
//! - 破棄: 全ブロックを一括で解放する
//!
//! 個別解放はほとんど起きない前提なので、どのブロックから来た要素でも
//! 1本のフリーリストで再利用する。
//!
//! # 一括解放のコスト
//!
//! `Elt<K, V>` がドロップ処理を持たない場合（`requires_cleanup() == false`）、
//! 破棄のコストはブロック数に比例し、要素数には依存しない。
//! ドロップ処理を持つ場合は、ブロック解放時に一度でも払い出したスロット
//! （フリーリスト上のものも含む）をそれぞれちょうど1回ドロップする。

use super::config::validate_arena;
use crate::error::{CacheError, CacheResult};

/// 要素への参照（ブロック番号, スロット番号）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EltRef {
    block: u32,
    slot: u32,
}

impl EltRef {
    #[inline]
    pub fn block(self) -> usize {
        self.block as usize
    }

    #[inline]
    pub fn slot(self) -> usize {
        self.slot as usize
    }
}

/// 要素（キー, 値, チェーンの次要素）
#[derive(Debug)]
pub struct Elt<K, V> {
    pub key: K,
    pub value: V,
    pub(crate) next: Option<EltRef>,
}

/// 要素アリーナ
pub struct EltHeap<K, V> {
    /// 確保済みブロック。末尾が現在のブロック、それ以外は解放待ち
    ///
    /// 各ブロックは `block_size` の容量で確保し、それを超えて伸ばさないため
    /// 要素のアドレスはブロックの寿命の間変わらない。
    blocks: Vec<Vec<Elt<K, V>>>,
    /// 再利用可能なスロット
    free: Vec<EltRef>,
    block_size: usize,
    max_blocks: Option<usize>,
}

impl<K, V: Default> EltHeap<K, V> {
    /// 新しいアリーナを作成（ブロックは最初の確保時まで取らない）
    ///
    /// `block_size` は 1..=u32::MAX、`max_blocks` は 1 以上でなければならない。
    pub fn new(block_size: usize, max_blocks: Option<usize>) -> CacheResult<Self> {
        validate_arena(block_size, max_blocks)?;
        Ok(Self::from_validated(block_size, max_blocks))
    }

    /// 検証済みの設定から作成
    pub(crate) fn from_validated(block_size: usize, max_blocks: Option<usize>) -> Self {
        Self {
            blocks: Vec::new(),
            free: Vec::new(),
            block_size,
            max_blocks,
        }
    }

    /// 要素を1つ確保してキーを書き込む
    ///
    /// フリーリストから再利用したスロットの値は前の内容のまま残る。
    /// 新しいスロットの値は `V::default()`。
    pub fn elt_alloc(&mut self, key: K) -> CacheResult<EltRef> {
        if let Some(r) = self.free.pop() {
            let elt = &mut self.blocks[r.block()][r.slot()];
            elt.key = key;
            elt.next = None;
            return Ok(r);
        }

        let need_block = self.blocks.last().is_none_or(|b| b.len() == self.block_size);
        if need_block {
            self.grow()?;
        }

        let block_index = self.blocks.len() - 1;
        let block = &mut self.blocks[block_index];
        block.push(Elt {
            key,
            value: V::default(),
            next: None,
        });

        Ok(EltRef {
            block: block_index as u32,
            slot: (block.len() - 1) as u32,
        })
    }

    /// 新しいブロックを確保して現在のブロックにする
    fn grow(&mut self) -> CacheResult<()> {
        if let Some(max) = self.max_blocks {
            if self.blocks.len() >= max {
                return Err(CacheError::ArenaExhausted { blocks: max });
            }
        }
        if self.blocks.len() >= u32::MAX as usize {
            return Err(CacheError::ArenaExhausted {
                blocks: self.blocks.len(),
            });
        }

        let mut block = Vec::new();
        block.try_reserve_exact(self.block_size)?;
        self.blocks.try_reserve(1)?;
        self.blocks.push(block);

        log::trace!(
            "arena: allocated block #{} ({} elts)",
            self.blocks.len(),
            self.block_size
        );
        Ok(())
    }
}

impl<K, V> EltHeap<K, V> {
    /// 要素をフリーリストに返す
    ///
    /// 中身はそのまま残る。次に `elt_alloc` で払い出されるまで触らない。
    #[inline]
    pub fn elt_free(&mut self, r: EltRef) {
        debug_assert!(r.block() < self.blocks.len());
        self.free.push(r);
    }

    #[inline]
    pub fn get(&self, r: EltRef) -> &Elt<K, V> {
        &self.blocks[r.block()][r.slot()]
    }

    #[inline]
    pub fn get_mut(&mut self, r: EltRef) -> &mut Elt<K, V> {
        &mut self.blocks[r.block()][r.slot()]
    }

    /// これまでに確保したブロック数
    #[inline]
    pub fn blocks_allocated(&self) -> usize {
        self.blocks.len()
    }

    /// フリーリストの長さ
    #[inline]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// 確保済みスロットの総数
    #[inline]
    pub fn capacity(&self) -> usize {
        self.blocks.len() * self.block_size
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// 使用中のメモリ量の概算（バイト）
    pub fn memory_bytes(&self) -> usize {
        self.capacity() * std::mem::size_of::<Elt<K, V>>()
            + self.free.capacity() * std::mem::size_of::<EltRef>()
            + self.blocks.capacity() * std::mem::size_of::<Vec<Elt<K, V>>>()
    }

    /// 一括解放時に要素ごとの後始末が走るか
    #[inline]
    pub const fn requires_cleanup() -> bool {
        std::mem::needs_drop::<Elt<K, V>>()
    }

    /// 全ブロックを一括で解放して空に戻す。解放したブロック数を返す
    pub fn release(&mut self) -> usize {
        let released = self.blocks.len();
        self.blocks = Vec::new();
        self.free = Vec::new();
        released
    }
}
