use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

///#### 新节点高度的生成策略
pub trait LevelGenerator {
    ///- #: [0, max_level] 之间的高度
    fn next_level(&mut self, max_level: usize) -> usize;
}

///#### 抛硬币法
///- 从 1 开始，每次以 1/2 的概率加一，首次失败即停止；
///- 结果截断至 max_level，不重新抽样，故 max_level 处的概率会偏高。
pub struct CoinFlip<R: Rng = StdRng> {
    rng: R,
}

impl CoinFlip<StdRng> {
    pub fn new() -> CoinFlip<StdRng> {
        CoinFlip {
            rng: StdRng::from_entropy(),
        }
    }

    ///#### 固定种子，用于可复现的运行
    pub fn seeded(seed: u64) -> CoinFlip<StdRng> {
        CoinFlip {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for CoinFlip<StdRng> {
    fn default() -> Self {
        CoinFlip::new()
    }
}

impl<R: Rng> CoinFlip<R> {
    pub fn with_rng(rng: R) -> CoinFlip<R> {
        CoinFlip { rng }
    }
}

impl<R: Rng> LevelGenerator for CoinFlip<R> {
    fn next_level(&mut self, max_level: usize) -> usize {
        let mut k: usize = 1;
        // 超过 max_level 的抛掷不影响截断后的结果
        while k < max_level && self.rng.gen::<bool>() {
            k += 1;
        }
        k.min(max_level)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn level_within_bounds() {
        let mut g = CoinFlip::seeded(7);
        for max in 0..20 {
            for _ in 0..1000 {
                let l = g.next_level(max);
                assert!(l <= max);
                if max > 0 {
                    assert!(l >= 1);
                }
            }
        }
    }

    #[test]
    fn zero_max_level() {
        let mut g = CoinFlip::new();
        assert_eq!(0, g.next_level(0));
    }

    #[test]
    fn max_level_is_overweighted() {
        // max = 3: P(1) = 1/2, P(2) = 1/4, P(3) = 1/4
        let mut g = CoinFlip::seeded(42);
        let mut hist = [0usize; 4];
        let n = 100_000;
        for _ in 0..n {
            hist[g.next_level(3)] += 1;
        }

        assert_eq!(0, hist[0]);
        let p = |c: usize| c as f64 / n as f64;
        assert!((p(hist[1]) - 0.5).abs() < 0.02);
        assert!((p(hist[2]) - 0.25).abs() < 0.02);
        assert!((p(hist[3]) - 0.25).abs() < 0.02);
    }

    #[test]
    fn seeded_is_reproducible() {
        let mut a = CoinFlip::seeded(2019);
        let mut b = CoinFlip::seeded(2019);
        for _ in 0..100 {
            assert_eq!(a.next_level(16), b.next_level(16));
        }
    }
}
