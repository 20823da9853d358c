// Copyright (c) 2026 rezky_nightky

use std::collections::VecDeque;

use crate::charset::Charset;
use crate::config::{Params, Settings};
use crate::rng::Rng;

/// Slowest fall rate a stream may be created with.
pub const MIN_SPEED: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub alpha: f64,
    pub tier: usize,
}

/// One falling column. `glyphs` is head-first and never longer than
/// `max_len`.
#[derive(Clone, Debug)]
pub struct Stream {
    pub column: u16,
    pub head: f64,
    pub speed: f64,
    pub max_len: usize,
    glyphs: VecDeque<Glyph>,
    rng: Rng,
}

impl Stream {
    pub fn new(column: u16, head: f64, speed: f64, max_len: usize, rng: Rng) -> Self {
        let max_len = max_len.max(1);
        Self {
            column,
            head,
            speed,
            max_len,
            glyphs: VecDeque::with_capacity(max_len + 1),
            rng,
        }
    }

    /// Draws speed and trail length around the configured base values.
    pub fn spawn(column: u16, head: f64, params: &Params, mut rng: Rng) -> Self {
        let speed = (params.base_speed + rng.spread() * params.speed_var).max(MIN_SPEED);
        let var = (rng.spread() * params.rain_length_var as f64).trunc() as i64;
        let max_len = (params.max_rain_length + var).max(1) as usize;
        Self::new(column, head, speed, max_len, rng)
    }

    pub fn glyphs(&self) -> &VecDeque<Glyph> {
        &self.glyphs
    }

    pub fn advance(&mut self, settings: &Settings, height: u16) {
        let params = &settings.params;
        let table = &settings.appearance;

        self.head += self.speed * (1.0 + params.bias);

        let pool = table.tier(0).charset.resolve(params.chars).chars();
        let mut ch = self.rng.pick(pool).copied().unwrap_or('0');
        if self.rng.chance(params.head_char_freq) {
            ch = self.rng.pick(Charset::Basic.chars()).copied().unwrap_or(ch);
        }
        self.glyphs.push_front(Glyph {
            ch,
            alpha: 1.0,
            tier: 0,
        });
        if self.glyphs.len() > self.max_len {
            self.glyphs.pop_back();
        }

        let last_tier = table.last_index();
        for (i, g) in self.glyphs.iter_mut().enumerate().skip(1) {
            g.tier = i.min(last_tier);
            if self.rng.chance(params.flicker) {
                g.alpha = if g.alpha > 0.0 { 0.0 } else { 1.0 };
            } else {
                g.alpha = (g.alpha - params.fade).max(0.0);
            }
        }

        if self.head > height as f64 + self.glyphs.len() as f64 {
            self.head = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::rng::Rng;

    fn still_settings() -> Settings {
        let mut s = Settings::default();
        s.params.flicker = 0.0;
        s.params.fade = 0.25;
        s.params.bias = 0.0;
        s
    }

    #[test]
    fn full_buffer_drops_oldest_glyph() {
        let settings = still_settings();
        let mut st = Stream::new(3, 0.0, 0.5, 5, Rng::seeded(1));
        for _ in 0..5 {
            st.advance(&settings, 1000);
        }
        assert_eq!(st.glyphs().len(), 5);
        let before: Vec<char> = st.glyphs().iter().map(|g| g.ch).collect();

        st.advance(&settings, 1000);
        assert_eq!(st.glyphs().len(), 5);
        let after: Vec<char> = st.glyphs().iter().map(|g| g.ch).collect();
        assert_eq!(&after[1..], &before[..4]);
    }

    #[test]
    fn tiers_follow_distance_from_head_and_clamp() {
        let settings = still_settings();
        let mut st = Stream::new(0, 0.0, 0.1, 30, Rng::seeded(2));
        for _ in 0..30 {
            st.advance(&settings, 1000);
        }
        let last = settings.appearance.last_index();
        for (i, g) in st.glyphs().iter().enumerate() {
            assert_eq!(g.tier, i.min(last));
        }
    }

    #[test]
    fn fade_decays_without_flicker() {
        let settings = still_settings();
        let mut st = Stream::new(0, 0.0, 0.1, 10, Rng::seeded(3));
        for _ in 0..3 {
            st.advance(&settings, 1000);
        }
        let alphas: Vec<f64> = st.glyphs().iter().map(|g| g.alpha).collect();
        assert_eq!(alphas, vec![1.0, 0.75, 0.5]);
    }

    #[test]
    fn full_flicker_toggles_alpha() {
        let mut settings = still_settings();
        settings.params.flicker = 1.0;
        let mut st = Stream::new(0, 0.0, 0.1, 10, Rng::seeded(4));
        st.advance(&settings, 1000);
        st.advance(&settings, 1000);
        assert_eq!(st.glyphs()[1].alpha, 0.0);
        st.advance(&settings, 1000);
        assert_eq!(st.glyphs()[2].alpha, 1.0);
    }

    #[test]
    fn head_wraps_on_first_tick_past_bottom() {
        let settings = still_settings();
        let height = 10u16;
        let mut st = Stream::new(0, 0.0, 1.0, 3, Rng::seeded(5));
        let mut prev = st.head;
        loop {
            st.advance(&settings, height);
            if st.head == 0.0 {
                let would_be = prev + st.speed;
                assert!(would_be > height as f64 + st.glyphs().len() as f64);
                break;
            }
            assert!(st.head <= height as f64 + st.glyphs().len() as f64);
            assert!(st.head > prev);
            prev = st.head;
        }
        assert_eq!(prev, 13.0);
    }

    #[test]
    fn head_char_freq_one_forces_basic_head() {
        let mut settings = still_settings();
        settings.params.chars = Charset::Katakana;
        settings.params.head_char_freq = 1.0;
        let mut st = Stream::new(0, 0.0, 0.1, 4, Rng::seeded(6));
        for _ in 0..20 {
            st.advance(&settings, 1000);
            assert!(Charset::Basic.chars().contains(&st.glyphs()[0].ch));
        }
    }

    #[test]
    fn head_draws_from_active_set() {
        let mut settings = still_settings();
        settings.params.chars = Charset::Katakana;
        settings.params.head_char_freq = 0.0;
        let mut st = Stream::new(0, 0.0, 0.1, 4, Rng::seeded(7));
        for _ in 0..20 {
            st.advance(&settings, 1000);
            assert!(Charset::Katakana.chars().contains(&st.glyphs()[0].ch));
        }
    }

    #[test]
    fn spawn_clamps_length_and_speed() {
        let mut params = Params::default();
        params.base_speed = 0.0;
        params.speed_var = 0.0;
        params.max_rain_length = 1;
        params.rain_length_var = 0;
        let st = Stream::spawn(2, 0.0, &params, Rng::seeded(8));
        assert_eq!(st.max_len, 1);
        assert_eq!(st.speed, MIN_SPEED);
    }

    proptest! {
        #[test]
        fn buffer_and_alpha_stay_bounded(
            seed in any::<u64>(),
            max_len in 1usize..40,
            fade in 0.0f64..=1.0,
            flicker in 0.0f64..=1.0,
            ticks in 1usize..120,
        ) {
            let mut settings = Settings::default();
            settings.params.fade = fade;
            settings.params.flicker = flicker;
            let mut st = Stream::new(1, 0.0, 1.3, max_len, Rng::seeded(seed));
            for _ in 0..ticks {
                st.advance(&settings, 24);
                prop_assert!(st.glyphs().len() <= st.max_len);
                for g in st.glyphs() {
                    prop_assert!((0.0..=1.0).contains(&g.alpha));
                }
            }
        }
    }
}
