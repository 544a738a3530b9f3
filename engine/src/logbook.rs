use std::collections::VecDeque;

use crate::{Log, Rules};

/// Ordered record of a session's logs. Rendering only ever shows the most
/// recent `window` entries; storage is kept in full unless a retention cap
/// is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logbook {
    entries: VecDeque<Log>,
    window: usize,
    retention: Option<usize>,
}

impl Logbook {
    pub fn new(rules: &Rules) -> Self {
        Self::with_window(rules.num_logs).with_retention(rules.retention)
    }

    pub fn with_window(window: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            window: window.max(1),
            retention: None,
        }
    }

    /// Keep at most `cap` entries (never fewer than the window), dropping
    /// the oldest first.
    pub fn with_retention(mut self, cap: Option<usize>) -> Self {
        self.retention = cap.map(|c| c.max(self.window));
        self.trim();
        self
    }

    pub fn add(&mut self, log: Log) {
        self.entries.push_back(log);
        self.trim();
    }

    pub fn extend(&mut self, logs: impl IntoIterator<Item = Log>) {
        for log in logs {
            self.add(log);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn window_size(&self) -> usize {
        self.window
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &Log> + ExactSizeIterator {
        self.entries.iter()
    }

    /// The displayed slice, oldest first.
    pub fn window(&self) -> impl DoubleEndedIterator<Item = &Log> + ExactSizeIterator {
        let skip = self.entries.len().saturating_sub(self.window);
        self.entries.iter().skip(skip)
    }

    /// Window as text, one entry per line, each line newline-terminated.
    /// `reverse` puts the newest entry first.
    pub fn render(&self, reverse: bool) -> String {
        let mut out = String::new();
        let mut push = |log: &Log| {
            out.push_str(log.as_str());
            out.push('\n');
        };
        if reverse {
            self.window().rev().for_each(&mut push);
        } else {
            self.window().for_each(&mut push);
        }
        out
    }

    fn trim(&mut self) {
        if let Some(cap) = self.retention {
            while self.entries.len() > cap {
                self.entries.pop_front();
            }
        }
    }
}
