use crate::algebra::FloatT;

// 64 bit LCG with Knuth's MMIX constants.  Reproducible start
// vectors only, no statistical quality is needed.
#[derive(Debug, Clone)]
pub(crate) struct LcgRng(u64);

impl LcgRng {
    pub(crate) fn new(seed: u64) -> Self {
        Self(seed.wrapping_add(1))
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0
    }

    /// uniform on [-0.5, 0.5)
    pub(crate) fn centered<T: FloatT>(&mut self) -> T {
        let u = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        T::from_f64(u - 0.5).unwrap_or_else(T::zero)
    }

    pub(crate) fn fill<T: FloatT>(&mut self, v: &mut [T]) {
        v.iter_mut().for_each(|x| *x = self.centered());
    }
}

#[test]
fn test_lcg_reproducible() {
    let mut a = LcgRng::new(42);
    let mut b = LcgRng::new(42);
    let mut c = LcgRng::new(43);

    let mut va = vec![0.0f64; 16];
    let mut vb = vec![0.0f64; 16];
    let mut vc = vec![0.0f64; 16];
    a.fill(&mut va);
    b.fill(&mut vb);
    c.fill(&mut vc);

    assert_eq!(va, vb);
    assert_ne!(va, vc);
    assert!(va.iter().all(|&x| (-0.5..0.5).contains(&x)));
}
