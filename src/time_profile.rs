//! Per-pass wall-clock timing.
//!
//! Grounded on `original_source/src/utils/time_profile.h`/`.cpp`, whose
//! `add_time_c`/`get_times_str_c` stash a process-global
//! `map<string, vector<milliseconds>>` of timestamps per call site and
//! diff consecutive entries on demand. That utility is never actually
//! wired into `main.cpp`'s pipeline in the original. This crate keeps
//! the underlying idea -- millisecond timings keyed by pass name -- but
//! owns them on a struct threaded through the driver instead of a
//! global, and records one duration per pass rather than an open-ended
//! timestamp log.

use std::collections::BTreeMap;
use std::time::Instant;

#[derive(Debug, Default)]
pub struct TimeProfile {
    durations: BTreeMap<&'static str, std::time::Duration>,
}

impl TimeProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f`, recording how long it took under `pass_name`. Logged at
    /// `debugl2` immediately, and also kept for [`TimeProfile::summary`].
    pub fn time<R>(&mut self, pass_name: &'static str, f: impl FnOnce() -> R) -> R {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();
        crate::debugl2!("{pass_name} took {elapsed:?}");
        self.durations.insert(pass_name, elapsed);
        result
    }

    pub fn get(&self, pass_name: &str) -> Option<std::time::Duration> {
        self.durations.get(pass_name).copied()
    }

    /// A one-line `pass_name=123ms ...` summary in key order, suitable
    /// for a single `debug!` call at the end of a run.
    pub fn summary(&self) -> String {
        self.durations
            .iter()
            .map(|(name, d)| format!("{name}={}ms", d.as_millis()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_records_a_duration_for_the_pass() {
        let mut profile = TimeProfile::new();
        let result = profile.time("sleep", || 2 + 2);
        assert_eq!(result, 4);
        assert!(profile.get("sleep").is_some());
        assert!(profile.get("unknown_pass").is_none());
    }

    #[test]
    fn summary_includes_every_timed_pass() {
        let mut profile = TimeProfile::new();
        profile.time("a", || ());
        profile.time("b", || ());
        let summary = profile.summary();
        assert!(summary.contains("a="));
        assert!(summary.contains("b="));
    }
}
