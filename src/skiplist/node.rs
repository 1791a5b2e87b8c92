use super::error::{ErrorKind, Result};
use std::ops::{Index, IndexMut};

//- 指向 Arena 中某个槽位的前向链接，None 表示本层链表到此结束
pub(crate) type Link = Option<usize>;

///#### 遍历游标
///- Head: 头节点(哨兵)，不存储 key-value
///- Node: Arena 中的普通节点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cursor {
    Head,
    Node(usize),
}

//- @key: 创建后不可变
//- @value: 仅 upsert 会原地替换
//- @forward: 长度为 node_level + 1，forward[i] 是第 i 层的后继
pub struct Node<K, V> {
    key: K,
    value: V,
    forward: Vec<Link>,
}

impl<K, V> Node<K, V> {
    //#### 创建高度为 level 的节点，forward 全部置空
    pub(crate) fn new(key: K, value: V, level: usize) -> Result<Node<K, V>> {
        let mut forward = Vec::new();
        forward
            .try_reserve_exact(level + 1)
            .map_err(|_| ErrorKind::OutOfMemory)?;
        forward.resize(level + 1, None);

        Ok(Node {
            key,
            value,
            forward,
        })
    }

    #[inline(always)]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline(always)]
    pub fn value(&self) -> &V {
        &self.value
    }

    ///- #: 被替换掉的旧值
    pub(crate) fn set_value(&mut self, value: V) -> V {
        std::mem::replace(&mut self.value, value)
    }

    ///- #: 节点出现的最高层
    #[inline(always)]
    pub fn level(&self) -> usize {
        self.forward.len() - 1
    }

    #[inline(always)]
    pub(crate) fn forward(&self) -> &[Link] {
        &self.forward
    }

    #[inline(always)]
    pub(crate) fn forward_mut(&mut self) -> &mut [Link] {
        &mut self.forward
    }

    pub(crate) fn into_value(self) -> V {
        self.value
    }
}

//- 所有节点的唯一所有者，链接只保存槽位下标
//- @slots: 已释放的槽位为 None
//- @free: 可复用的空槽位
pub(crate) struct Arena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
}

impl<K, V> Arena<K, V> {
    pub(crate) fn new() -> Arena<K, V> {
        Arena {
            slots: vec![],
            free: vec![],
        }
    }

    //#### 存入节点，优先复用空槽位
    pub(crate) fn alloc(&mut self, node: Node<K, V>) -> Result<usize> {
        if let Some(id) = self.free.pop() {
            self.slots[id] = Some(node);
            return Ok(id);
        }

        self.slots
            .try_reserve(1)
            .map_err(|_| ErrorKind::OutOfMemory)?;
        self.slots.push(Some(node));
        Ok(self.slots.len() - 1)
    }

    //#### 取出节点并回收槽位，调用方须保证该节点已从所有层摘除
    pub(crate) fn release(&mut self, id: usize) -> Option<Node<K, V>> {
        let node = self.slots.get_mut(id)?.take()?;
        self.free.push(id);
        Some(node)
    }

    #[cfg(test)]
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

impl<K, V> Index<usize> for Arena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, id: usize) -> &Node<K, V> {
        match &self.slots[id] {
            Some(n) => n,
            None => unreachable!("link to a released slot {}", id),
        }
    }
}

impl<K, V> IndexMut<usize> for Arena<K, V> {
    fn index_mut(&mut self, id: usize) -> &mut Node<K, V> {
        match &mut self.slots[id] {
            Some(n) => n,
            None => unreachable!("link to a released slot {}", id),
        }
    }
}
