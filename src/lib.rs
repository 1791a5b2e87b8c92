//! ## skipkv
//!
//! 基于跳表的进程内有序 key-value 存储：
//! - 插入、点查询、删除，平均 O(log n)；
//! - 以 `key:value` 文本行的形式全量快照落盘与加载。

#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod skiplist;

pub use config::Config;
pub use skiplist::error::{Error, ErrorKind, Result};
pub use skiplist::level::{CoinFlip, LevelGenerator};
pub use skiplist::traits::Record;
pub use skiplist::{InsertOutcome, SkipList};
