// Copyright (c) 2026 rezky_nightky

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{rngs::StdRng, Rng as _, RngCore, SeedableRng};

/// Seedable generator shared by the simulation.
///
/// Not `Sync`-shared: every stream owns its own instance, forked from the
/// cloud's generator, so the parallel advance never contends on one state.
#[derive(Clone, Debug)]
pub struct Rng {
    inner: StdRng,
}

impl Rng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E37_79B9_7F4A_7C15);
        Self::seeded(nanos)
    }

    /// Independent generator seeded from this one's output.
    pub fn fork(&mut self) -> Self {
        Self::seeded(self.inner.next_u64())
    }

    #[allow(dead_code)]
    pub fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.inner.random::<f64>()
    }

    /// Uniform in `[min, max]`; a reversed or empty range yields `min`.
    pub fn int_in_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.inner.random_range(min..=max)
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform in `[-1, 1)`.
    pub fn spread(&mut self) -> f64 {
        self.next_f64() * 2.0 - 1.0
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.int_in_range(0, items.len() as i64 - 1) as usize;
        items.get(idx)
    }
}
