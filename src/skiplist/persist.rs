//! 快照：只保存最底层链表，每行一条 `key:value`，按 key 升序排列

use super::error::{ErrorKind, Result, ResultExt};
use super::level::LevelGenerator;
use super::traits::Record;
use super::{InsertOutcome, SkipList};

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::{info, warn};

pub const DELIMITER: char = ':';

impl<K, V, G> SkipList<K, V, G>
where
    K: Ord + Record,
    V: Record,
    G: LevelGenerator,
{
    ///#### 全量导出至 path，已有内容将被清空
    ///- 先在读锁内生成完整快照，再释放锁写文件
    ///- 每个节点写出一行；无法原样读回的记录照常写出，并记录 warn
    ///- #: 写出的记录数
    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let (buf, cnt) = self.render(false)?;
        write_snapshot(path.as_ref(), &buf, cnt)
    }

    ///#### 同 dump，但任一记录无法原样读回时报 Unrepresentable，且不触碰文件
    pub fn dump_strict<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let (buf, cnt) = self.render(true)?;
        write_snapshot(path.as_ref(), &buf, cnt)
    }

    ///#### 从 path 逐行加载
    ///- 空行、不含分隔符的行、key 或 value 为空的行直接跳过
    ///- 重复的 key 按 insert 的规则被拒绝
    ///- 加载期间持有写锁
    ///- #: 实际插入的记录数
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let file = File::open(path).chain_err(|| ErrorKind::FileOpen(path.to_owned()))?;

        let mut inner = self.inner.write();
        let mut cnt = 0;
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.chain_err(|| ErrorKind::FileRead(path.to_owned()))?;
            let (k, v) = match split_record(&line) {
                Some(kv) => kv,
                None => {
                    if !line.is_empty() {
                        warn!(line = idx + 1, "skipped malformed record");
                    }
                    continue;
                }
            };

            let key = K::from_record(k).ok_or(ErrorKind::BadRecord(idx + 1))?;
            let value = V::from_record(v).ok_or(ErrorKind::BadRecord(idx + 1))?;
            if InsertOutcome::Inserted == inner.insert(key, value)? {
                cnt += 1;
            }
        }

        info!(path = %path.display(), records = cnt, size = inner.count, "loaded");
        Ok(cnt)
    }

    ///#### 导出至配置的快照文件
    pub fn dump_file(&self) -> Result<usize> {
        self.dump(&self.store_file)
    }

    ///#### 从配置的快照文件加载
    pub fn load_file(&self) -> Result<usize> {
        self.load(&self.store_file)
    }

    fn render(&self, strict: bool) -> Result<(String, usize)> {
        let inner = self.inner.read();
        let mut buf = String::new();
        let mut link = inner.head[0];
        while let Some(id) = link {
            let n = &inner.arena[id];
            let k = n.key().to_record();
            let v = n.value().to_record();
            if !representable(&k, &v) {
                if strict {
                    bail!(ErrorKind::Unrepresentable(format!("{}{}{}", k, DELIMITER, v)));
                }
                warn!(key = %k, "record will not load back as written");
            }

            buf.push_str(&k);
            buf.push(DELIMITER);
            buf.push_str(&v);
            buf.push('\n');
            link = n.forward()[0];
        }
        Ok((buf, inner.count))
    }
}

fn write_snapshot(path: &Path, buf: &str, cnt: usize) -> Result<usize> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).chain_err(|| ErrorKind::FileOpen(path.to_owned()))?;
    }
    let mut file = File::create(path).chain_err(|| ErrorKind::FileOpen(path.to_owned()))?;
    file.write_all(buf.as_bytes())
        .and_then(|_| file.flush())
        .chain_err(|| ErrorKind::FileWrite(path.to_owned()))?;

    info!(path = %path.display(), records = cnt, "dumped");
    Ok(cnt)
}

//- #: 该记录写出后能否被 load 原样读回
fn representable(k: &str, v: &str) -> bool {
    let breaks = |s: &str| s.contains('\n') || s.contains('\r');
    !(k.is_empty() || v.is_empty() || k.contains(DELIMITER) || breaks(k) || breaks(v))
}

//- #: 按第一个分隔符切分，无分隔符或任一侧为空时返回 None
fn split_record(line: &str) -> Option<(&str, &str)> {
    let (k, v) = line.split_once(DELIMITER)?;
    if k.is_empty() || v.is_empty() {
        return None;
    }
    Some((k, v))
}
