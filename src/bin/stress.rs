//! ## 压力测试
//!
//! 用法: `stress [N] [THREADS]`
//! - 以 THREADS 个线程并发插入 N 个随机 key，再并发查询 N 次，分别输出耗时。

use rand::random;
use rayon::prelude::*;
use skipkv::{Config, SkipList};
use std::env;
use std::process;
use std::time::Instant;

const DEFAULT_N: usize = 100_000;
const DEFAULT_THREADS: usize = 4;

fn arg(idx: usize, default: usize) -> usize {
    match env::args().nth(idx) {
        Some(v) => match v.parse() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("invalid argument '{}'", v);
                process::exit(2);
            }
        },
        None => default,
    }
}

fn main() {
    let n = arg(1, DEFAULT_N);
    let threads = arg(2, DEFAULT_THREADS);

    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };

    let pool = match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let sl = SkipList::<i64, String>::with_config(&cfg);
    let range = n as i64;

    let start = Instant::now();
    pool.install(|| {
        (0..n).into_par_iter().for_each(|_| {
            let k = random::<i64>().rem_euclid(range.max(1));
            if let Err(e) = sl.insert(k, "a".to_owned()) {
                eprintln!("{}", e);
                process::exit(1);
            }
        })
    });
    println!(
        "insert elapsed: {:?} ({} ops, {} threads, {} distinct)",
        start.elapsed(),
        n,
        threads,
        sl.size()
    );

    let start = Instant::now();
    let hits = pool.install(|| {
        (0..n)
            .into_par_iter()
            .filter(|_| sl.contains(&random::<i64>().rem_euclid(range.max(1))))
            .count()
    });
    println!(
        "search elapsed: {:?} ({} ops, {} hits)",
        start.elapsed(),
        n,
        hits
    );
}
