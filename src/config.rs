//! ## 配置
//!
//! - SKIPLIST_MAX_LEVEL: 跳表最大层数，缺省为 DEFAULT_MAX_LEVEL
//! - SKIPLIST_STORE_FILE: 快照文件路径，缺省为 store/dumpFile

use crate::skiplist::error::{ErrorKind, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MAX_LEVEL: usize = 18;
//- 最大层数的上限，超过时构造函数截断、from_env 报错
pub const MAX_LEVEL_LIMIT: usize = 64;
pub const MAX_LEVEL_VAR: &str = "SKIPLIST_MAX_LEVEL";
pub const STORE_FILE_VAR: &str = "SKIPLIST_STORE_FILE";

lazy_static! {
    //进程内只解析一次
    pub static ref STORE_FILE: PathBuf = env::var_os(STORE_FILE_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("store/dumpFile"));
}

//- @max_level: 任一节点高度的上限，构造后不可变
//- @store_file: dump_file/load_file 使用的快照路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub max_level: usize,
    pub store_file: PathBuf,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            max_level: DEFAULT_MAX_LEVEL,
            store_file: STORE_FILE.clone(),
        }
    }
}

impl Config {
    ///#### 以环境变量覆盖缺省值
    ///- SKIPLIST_MAX_LEVEL 每次调用时重新读取，超过 MAX_LEVEL_LIMIT 报 InvalidConfig
    ///- SKIPLIST_STORE_FILE 只在进程内首次使用 STORE_FILE 时读取一次，之后修改不再生效
    pub fn from_env() -> Result<Config> {
        let mut cfg = Config::default();
        if let Ok(v) = env::var(MAX_LEVEL_VAR) {
            cfg.max_level = parse_max_level(&v)?;
        }
        Ok(cfg)
    }

    pub fn max_level(mut self, max_level: usize) -> Config {
        self.max_level = max_level;
        self
    }

    pub fn store_file<P: Into<PathBuf>>(mut self, path: P) -> Config {
        self.store_file = path.into();
        self
    }
}

fn parse_max_level(v: &str) -> Result<usize> {
    match v.trim().parse::<usize>() {
        Ok(n) if n <= MAX_LEVEL_LIMIT => Ok(n),
        _ => bail!(ErrorKind::InvalidConfig(MAX_LEVEL_VAR, v.to_owned())),
    }
}
