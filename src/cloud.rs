// Copyright (c) 2026 rezky_nightky

use std::num::NonZeroUsize;
use std::thread;

use tracing::debug;

use crate::config::{Params, Settings, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::rng::Rng;
use crate::stream::Stream;

/// Below this many streams the advance runs on the calling thread.
const PARALLEL_MIN_STREAMS: usize = 64;

/// All streams on one viewport.
pub struct Cloud {
    pub cols: u16,
    pub lines: u16,
    streams: Vec<Stream>,
    rng: Rng,
    workers: usize,
}

impl Cloud {
    pub fn new(cols: u16, lines: u16, rng: Rng) -> Self {
        let workers = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self {
            cols,
            lines,
            streams: Vec::new(),
            rng,
            workers,
        }
    }

    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    #[cfg(test)]
    pub(crate) fn push_for_test(&mut self, stream: Stream) {
        self.streams.push(stream);
    }

    fn gap_ok(&self, col: u16, min_gap: u16) -> bool {
        self.streams
            .iter()
            .all(|s| s.column.abs_diff(col) >= min_gap)
    }

    /// Places a stream at `col` unless another stream sits within `min_gap`.
    fn try_place(&mut self, col: u16, head: f64, params: &Params) -> bool {
        if col >= self.cols || !self.gap_ok(col, params.min_gap) {
            return false;
        }
        let rng = self.rng.fork();
        self.streams.push(Stream::spawn(col, head, params, rng));
        true
    }

    fn random_head(&mut self) -> f64 {
        self.rng.int_in_range(0, self.lines as i64) as f64
    }

    /// Adds fresh streams, counting attempts from `start`, until the density
    /// target or `max_rains` is reached. A rejected candidate is not retried.
    fn top_up(&mut self, start: usize, params: &Params) {
        let target = params.target_streams(self.cols);
        let mut i = start;
        while i < target && self.streams.len() < params.max_rains {
            let col = self.rng.int_in_range(0, self.cols as i64 - 1) as u16;
            let head = self.random_head();
            self.try_place(col, head, params);
            i += 1;
        }
    }

    /// Drops every stream and places a new population.
    pub fn regenerate(&mut self, params: &Params) {
        self.streams.clear();
        if self.cols == 0 {
            return;
        }
        self.top_up(0, params);
        debug!(
            cols = self.cols,
            lines = self.lines,
            streams = self.streams.len(),
            "regenerated streams"
        );
    }

    /// Forces the default viewport and regenerates on it.
    pub fn reset_viewport(&mut self, params: &Params) {
        self.cols = DEFAULT_WIDTH;
        self.lines = DEFAULT_HEIGHT;
        self.regenerate(params);
    }

    /// Re-homes existing streams onto a new viewport, keeping each stream's
    /// column and relative height. Returns false when nothing changed.
    pub fn resize(&mut self, cols: u16, lines: u16, params: &Params) -> bool {
        if cols == self.cols && lines == self.lines {
            return false;
        }

        let old_lines = self.lines.max(1) as f64;
        let captured: Vec<(u16, f64)> = self
            .streams
            .iter()
            .map(|s| (s.column, s.head / old_lines))
            .collect();

        self.streams.clear();
        self.cols = cols;
        self.lines = lines;
        if cols == 0 {
            return true;
        }

        for &(col, frac) in &captured {
            let head = frac * lines as f64;
            self.try_place(col, head, params);
        }
        self.top_up(captured.len(), params);

        debug!(
            cols,
            lines,
            kept = captured.len(),
            streams = self.streams.len(),
            "resized viewport"
        );
        true
    }

    /// Advances every stream one tick. Each stream carries its own generator
    /// and only reads `settings`, so the chunks run independently.
    pub fn advance(&mut self, settings: &Settings) {
        let lines = self.lines;
        if self.workers <= 1 || self.streams.len() < PARALLEL_MIN_STREAMS {
            for s in &mut self.streams {
                s.advance(settings, lines);
            }
            return;
        }

        let chunk = self.streams.len().div_ceil(self.workers).max(1);
        thread::scope(|scope| {
            for part in self.streams.chunks_mut(chunk) {
                scope.spawn(move || {
                    for s in part {
                        s.advance(settings, lines);
                    }
                });
            }
        });
    }
}
