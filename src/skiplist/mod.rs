//! ## Skip List
//!
//! #### 算法说明
//! - 多层有序链表，上层是下层的稀疏子集，读写效率与AVL、红黑树等相当；
//! - 无需旋转、重平衡，节点高度由抛硬币决定；
//! - 所有节点存放于 arena 中，前向链接只保存槽位下标，删除时不存在悬垂指针。
//!
//! #### 应用场景
//! - 进程内有序 key-value 存储，全量快照落盘。
//!
//! #### 实现属性
//! - <font color=Green>√</font> 多线程安全
//! - <font color=Green>√</font> 无 unsafe 代码
//!
//! #### Example
//!```
//!    use skipkv::{InsertOutcome, SkipList};
//!
//!    let sl = SkipList::new(6);
//!    assert_eq!(InsertOutcome::Inserted, sl.insert(1, "a".to_owned()).unwrap());
//!    assert_eq!(InsertOutcome::Inserted, sl.insert(3, "c".to_owned()).unwrap());
//!    assert_eq!(InsertOutcome::Inserted, sl.insert(2, "b".to_owned()).unwrap());
//!
//!    //insert 不会覆盖已有的值
//!    assert_eq!(InsertOutcome::AlreadyExists, sl.insert(2, "x".to_owned()).unwrap());
//!    assert_eq!(Some("b".to_owned()), sl.search(&2));
//!
//!    assert_eq!(Some("a".to_owned()), sl.delete(&1));
//!    assert_eq!(2, sl.size());
//!```

pub mod error;
pub mod level;
mod node;
mod persist;
pub mod traits;

use crate::config::{Config, MAX_LEVEL_LIMIT, STORE_FILE};
use error::Result;
use level::{CoinFlip, LevelGenerator};
use node::{Arena, Cursor, Link, Node};

use parking_lot::RwLock;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

///#### insert 的结果
///- Inserted: 新节点已插入
///- AlreadyExists: key 已存在，原值保持不变
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

//- @inner: 每个实例独享一把读写锁，写操作独占，读操作共享
//- @store_file: dump_file/load_file 使用的快照路径
pub struct SkipList<K, V, G = CoinFlip> {
    inner: RwLock<Inner<K, V, G>>,
    store_file: PathBuf,
}

//- @max_level: 任一节点高度的上限，构造后不变
//- @level: 当前含有节点的最高层，空表为0
//- @count: 元素数量
//- @head: 头节点的前向链接，长度为 max_level + 1
//- @arena: 所有节点的唯一所有者
//- @gen: 新节点高度生成器
struct Inner<K, V, G> {
    max_level: usize,
    level: usize,
    count: usize,
    head: Vec<Link>,
    arena: Arena<K, V>,
    gen: G,
}

impl<K: Ord, V> SkipList<K, V, CoinFlip> {
    ///#### 创建跳表
    ///- @max_level[in]: 节点高度上限，最大为 MAX_LEVEL_LIMIT
    pub fn new(max_level: usize) -> SkipList<K, V, CoinFlip> {
        SkipList::with_generator(max_level, CoinFlip::new())
    }

    ///#### 按配置创建跳表
    pub fn with_config(cfg: &Config) -> SkipList<K, V, CoinFlip> {
        let mut sl = SkipList::new(cfg.max_level);
        sl.store_file = cfg.store_file.clone();
        sl
    }
}

impl<K: Ord, V> Default for SkipList<K, V, CoinFlip> {
    fn default() -> Self {
        SkipList::with_config(&Config::default())
    }
}

impl<K: Ord, V, G: LevelGenerator> SkipList<K, V, G> {
    ///#### 以指定的高度生成器创建跳表
    ///- max_level 超过 MAX_LEVEL_LIMIT 时按 MAX_LEVEL_LIMIT 处理
    pub fn with_generator(max_level: usize, gen: G) -> SkipList<K, V, G> {
        let max_level = max_level.min(MAX_LEVEL_LIMIT);
        SkipList {
            inner: RwLock::new(Inner {
                max_level,
                level: 0,
                count: 0,
                head: vec![None; max_level + 1],
                arena: Arena::new(),
                gen,
            }),
            store_file: STORE_FILE.clone(),
        }
    }

    ///#### 插入数据
    ///- key 已存在时返回 AlreadyExists，不覆盖原值(需要覆盖时使用 upsert)
    ///- 内存分配失败返回 OutOfMemory，跳表保持原状
    pub fn insert(&self, key: K, value: V) -> Result<InsertOutcome> {
        let mut inner = self.inner.write();
        let outcome = inner.insert(key, value)?;
        match outcome {
            InsertOutcome::Inserted => debug!(size = inner.count, height = inner.level, "inserted"),
            InsertOutcome::AlreadyExists => debug!("key exists, insert rejected"),
        }
        Ok(outcome)
    }

    ///#### 插入或覆盖
    ///- #: key 已存在时返回被替换的旧值
    pub fn upsert(&self, key: K, value: V) -> Result<Option<V>> {
        let mut inner = self.inner.write();
        let old = inner.upsert(key, value)?;
        debug!(replaced = old.is_some(), size = inner.count, "upserted");
        Ok(old)
    }

    ///#### 查询数据
    pub fn search(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let inner = self.inner.read();
        let res = inner.find(key).map(|id| inner.arena[id].value().clone());
        trace!(found = res.is_some(), "search");
        res
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().find(key).is_some()
    }

    ///#### 删除数据
    ///- #: 被删除的值，key 不存在时什么也不做并返回 None
    pub fn delete(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.write();
        let res = inner.delete(key);
        if res.is_some() {
            debug!(size = inner.count, height = inner.level, "deleted");
        }
        res
    }

    ///- #: 元素数量
    pub fn size(&self) -> usize {
        self.inner.read().count
    }

    pub fn is_empty(&self) -> bool {
        0 == self.size()
    }

    ///- #: 当前含有节点的最高层
    pub fn level(&self) -> usize {
        self.inner.read().level
    }

    pub fn max_level(&self) -> usize {
        self.inner.read().max_level
    }

    pub fn store_file(&self) -> &Path {
        &self.store_file
    }

    ///#### 按 key 升序导出全部数据
    pub fn traverse(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        let inner = self.inner.read();
        let mut res = Vec::with_capacity(inner.count);
        inner.walk(0, |n| res.push((n.key().clone(), n.value().clone())));
        res
    }

    ///#### 第 level 层上的全部 key，用于诊断
    pub fn level_keys(&self, level: usize) -> Vec<K>
    where
        K: Clone,
    {
        let inner = self.inner.read();
        let mut res = vec![];
        inner.walk(level, |n| res.push(n.key().clone()));
        res
    }
}

impl<K: Ord, V, G> Inner<K, V, G> {
    #[inline(always)]
    fn next(&self, at: Cursor, level: usize) -> Link {
        match at {
            Cursor::Head => self.head[level],
            Cursor::Node(id) => self.arena[id].forward()[level],
        }
    }

    #[inline(always)]
    fn set_next(&mut self, at: Cursor, level: usize, to: Link) {
        match at {
            Cursor::Head => self.head[level] = to,
            Cursor::Node(id) => self.arena[id].forward_mut()[level] = to,
        }
    }

    //#### 从 cur 出发，在第 level 层前进到 key 严格小于目标的最右节点
    fn advance(&self, mut cur: Cursor, level: usize, key: &K) -> Cursor {
        while let Some(next) = self.next(cur, level) {
            if self.arena[next].key() < key {
                cur = Cursor::Node(next);
            } else {
                break;
            }
        }
        cur
    }

    //#### 自顶向下记录每层插入/删除位置的前驱
    //- 高于当前高度的层保持指向头节点
    fn predecessors(&self, key: &K) -> Vec<Cursor> {
        let mut update = vec![Cursor::Head; self.max_level + 1];
        let mut cur = Cursor::Head;
        for i in (0..=self.level).rev() {
            cur = self.advance(cur, i, key);
            update[i] = cur;
        }
        update
    }

    //- #: prev 在底层的后继恰好是 key 时，返回其槽位
    #[inline(always)]
    fn successor_eq(&self, prev: Cursor, key: &K) -> Option<usize> {
        self.next(prev, 0)
            .filter(|&id| self.arena[id].key() == key)
    }

    fn find(&self, key: &K) -> Option<usize> {
        let mut cur = Cursor::Head;
        for i in (0..=self.level).rev() {
            cur = self.advance(cur, i, key);
        }
        self.successor_eq(cur, key)
    }

    //#### 沿第 level 层依次访问每个节点
    fn walk<F: FnMut(&Node<K, V>)>(&self, level: usize, mut f: F) {
        if level > self.max_level {
            return;
        }
        let mut link = self.head[level];
        while let Some(id) = link {
            let n = &self.arena[id];
            f(n);
            link = n.forward()[level];
        }
    }

    fn delete(&mut self, key: &K) -> Option<V> {
        let update = self.predecessors(key);
        let target = self.successor_eq(update[0], key)?;

        //自底向上摘除，某层前驱不再指向目标时，更高层必然也不含目标
        for i in 0..=self.level {
            if self.next(update[i], i) != Some(target) {
                break;
            }
            let succ = self.arena[target].forward()[i];
            self.set_next(update[i], i, succ);
        }

        while self.level > 0 && self.head[self.level].is_none() {
            self.level -= 1;
        }

        self.count -= 1;
        self.arena.release(target).map(Node::into_value)
    }
}

impl<K: Ord, V, G: LevelGenerator> Inner<K, V, G> {
    fn insert(&mut self, key: K, value: V) -> Result<InsertOutcome> {
        let update = self.predecessors(&key);
        if self.successor_eq(update[0], &key).is_some() {
            return Ok(InsertOutcome::AlreadyExists);
        }

        self.link(&update, key, value)?;
        Ok(InsertOutcome::Inserted)
    }

    fn upsert(&mut self, key: K, value: V) -> Result<Option<V>> {
        let update = self.predecessors(&key);
        if let Some(id) = self.successor_eq(update[0], &key) {
            return Ok(Some(self.arena[id].set_value(value)));
        }

        self.link(&update, key, value)?;
        Ok(None)
    }

    //#### 生成新节点并逐层接入 update 所记录的前驱之后
    fn link(&mut self, update: &[Cursor], key: K, value: V) -> Result<usize> {
        let level = self.gen.next_level(self.max_level).min(self.max_level);
        let id = self.arena.alloc(Node::new(key, value, level)?)?;

        //新增的层在 update 中已锚定于头节点
        if level > self.level {
            self.level = level;
        }

        for i in 0..=self.arena[id].level() {
            let succ = self.next(update[i], i);
            self.arena[id].forward_mut()[i] = succ;
            self.set_next(update[i], i, Some(id));
        }

        self.count += 1;
        Ok(id)
    }
}

impl<K, V, G> fmt::Display for SkipList<K, V, G>
where
    K: Ord + fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let inner = self.inner.read();
        writeln!(f, "*****Skip List*****")?;
        for i in 0..=inner.level {
            write!(f, "Level {}: ", i)?;
            let mut link = inner.head[i];
            while let Some(id) = link {
                let n = &inner.arena[id];
                write!(f, "{}:{};", n.key(), n.value())?;
                link = n.forward()[i];
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
