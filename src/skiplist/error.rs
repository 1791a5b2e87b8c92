//! 跳表与快照读写的错误类型
//!
//! - @FileOpen: 快照文件无法打开(含父目录无法创建)
//! - @FileWrite: 快照写入失败
//! - @FileRead: 快照读取失败
//! - @OutOfMemory: 节点内存分配失败，跳表保持原状
//! - @BadRecord: 快照中某行无法解析为目标类型，行号从1开始
//! - @Unrepresentable: 记录无法以 `key:value` 形式无损落盘
//! - @InvalidConfig: 环境变量中的配置不合法

use std::path::PathBuf;

error_chain! {
    foreign_links {
        Io(::std::io::Error);
    }

    errors {
        FileOpen(path: PathBuf) {
            description("failed to open snapshot file")
            display("failed to open snapshot file '{}'", path.display())
        }

        FileWrite(path: PathBuf) {
            description("failed to write snapshot file")
            display("failed to write snapshot file '{}'", path.display())
        }

        FileRead(path: PathBuf) {
            description("failed to read snapshot file")
            display("failed to read snapshot file '{}'", path.display())
        }

        OutOfMemory {
            description("out of memory")
            display("out of memory while allocating a skip list node")
        }

        BadRecord(line: usize) {
            description("malformed snapshot record")
            display("malformed snapshot record at line {}", line)
        }

        Unrepresentable(record: String) {
            description("record cannot be persisted")
            display("record '{}' cannot be persisted as key:value", record)
        }

        InvalidConfig(var: &'static str, value: String) {
            description("invalid configuration")
            display("invalid value '{}' for {}", value, var)
        }
    }
}
