//! Named self-test scenarios for [`RingBuffer`] and the runner that executes them.
//!
//! Each scenario builds its own capacity-4 buffer and checks it with
//! `anyhow::ensure!`, so a failure reads as a message rather than a panic.

use crate::ring_buffer::RingBuffer;
use anyhow::{bail, ensure, Result};
use serde::Serialize;
use std::time::Instant;

type Buf = RingBuffer<i32, 4>;

pub struct Scenario {
    pub name:        &'static str,
    pub description: &'static str,
    pub run:         fn() -> Result<()>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub name:        &'static str,
    pub description: &'static str,
    pub passed:      bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message:     Option<String>,
    pub elapsed_us:  u64,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub results: Vec<ScenarioResult>,
    /// Set when the run stopped early on a failure.
    pub stopped_early: bool,
}

impl RunSummary {
    pub fn passed(&self) -> usize { self.results.iter().filter(|r| r.passed).count() }
    pub fn failed(&self) -> usize { self.results.len() - self.passed() }
    pub fn all_passed(&self) -> bool { self.failed() == 0 }
}

const SCENARIOS: &[Scenario] = &[
    Scenario { name: "write_read_order",   description: "reads return values in write order",             run: write_read_order },
    Scenario { name: "overwrite_behavior", description: "a write to a full buffer evicts the oldest",     run: overwrite_behavior },
    Scenario { name: "clear",              description: "clear empties a full buffer",                    run: clear },
    Scenario { name: "stream_output",      description: "rendering lists elements oldest to newest",      run: stream_output },
    Scenario { name: "empty_read_is_noop", description: "reading an empty buffer yields nothing",         run: empty_read_is_noop },
    Scenario { name: "clear_on_empty",     description: "clearing an empty buffer changes nothing",       run: clear_on_empty },
    Scenario { name: "long_wraparound",    description: "after many writes only the last N are retained", run: long_wraparound },
    Scenario { name: "peek_and_iter",      description: "peek and iter agree with what read returns",     run: peek_and_iter },
];

pub fn scenarios() -> &'static [Scenario] {
    SCENARIOS
}

/// Scenarios whose name contains any of `filters`; all of them when `filters` is empty.
pub fn select<'a>(all: &'a [Scenario], filters: &[String]) -> Vec<&'a Scenario> {
    all.iter()
        .filter(|s| filters.is_empty() || filters.iter().any(|f| s.name.contains(f.as_str())))
        .collect()
}

pub fn run(selected: &[&Scenario], stop_on_failure: bool) -> RunSummary {
    log::info!("running {} scenario(s)", selected.len());
    let mut summary = RunSummary::default();

    for scenario in selected {
        let start = Instant::now();
        let outcome = (scenario.run)();
        let elapsed_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);

        let result = match outcome {
            Ok(()) => {
                log::debug!("{} passed in {}µs", scenario.name, elapsed_us);
                ScenarioResult {
                    name: scenario.name, description: scenario.description,
                    passed: true, message: None, elapsed_us,
                }
            }
            Err(e) => {
                log::warn!("{} failed: {:#}", scenario.name, e);
                ScenarioResult {
                    name: scenario.name, description: scenario.description,
                    passed: false, message: Some(format!("{:#}", e)), elapsed_us,
                }
            }
        };
        let failed = !result.passed;
        summary.results.push(result);

        if failed && stop_on_failure {
            summary.stopped_early = summary.results.len() < selected.len();
            break;
        }
    }

    log::info!("{} passed, {} failed", summary.passed(), summary.failed());
    summary
}

// ── Scenarios ────────────────────────────────────────────────────────

fn expect_read(buf: &mut Buf, want: i32) -> Result<()> {
    match buf.read() {
        Some(got) if got == want => Ok(()),
        Some(got) => bail!("read returned {}, expected {}", got, want),
        None      => bail!("read returned nothing, expected {}", want),
    }
}

fn write_read_order() -> Result<()> {
    let mut buf = Buf::new();
    buf.extend([10, 20, 30]);
    expect_read(&mut buf, 10)?;
    expect_read(&mut buf, 20)?;
    ensure!(buf.len() == 1, "len is {}, expected 1", buf.len());
    ensure!(!buf.is_full(), "buffer reports full with one element");
    Ok(())
}

fn overwrite_behavior() -> Result<()> {
    let mut buf = Buf::new();
    buf.extend(1..=5);
    ensure!(buf.len() == 4, "len is {}, expected 4", buf.len());
    ensure!(buf.is_full(), "buffer not full after 5 writes");
    for want in 2..=5 {
        expect_read(&mut buf, want)?;
    }
    ensure!(buf.read().is_none(), "buffer should be empty after draining");
    Ok(())
}

fn clear() -> Result<()> {
    let mut buf = Buf::new();
    buf.extend(0..4);
    buf.clear();
    ensure!(buf.len() == 0, "len is {} after clear", buf.len());
    ensure!(!buf.is_full(), "buffer reports full after clear");
    ensure!(buf.read().is_none(), "read after clear returned a value");
    Ok(())
}

fn stream_output() -> Result<()> {
    let mut buf = Buf::new();
    buf.extend([7, 8, 9]);
    let first = buf.render();
    ensure!(first == "7 8 9", "rendered {:?}, expected \"7 8 9\"", first);

    buf.write(10);
    buf.write(11);
    let second = buf.render();
    ensure!(second == "8 9 10 11", "rendered {:?}, expected \"8 9 10 11\"", second);
    Ok(())
}

fn empty_read_is_noop() -> Result<()> {
    let mut buf = Buf::new();
    ensure!(buf.read().is_none(), "read on a new buffer returned a value");
    ensure!(buf.is_empty() && buf.render().is_empty(), "empty read changed the buffer");
    buf.write(1);
    expect_read(&mut buf, 1)?;
    ensure!(buf.read().is_none(), "second read returned a value");
    ensure!(buf.len() == 0, "len is {} after draining", buf.len());
    Ok(())
}

fn clear_on_empty() -> Result<()> {
    let mut buf = Buf::new();
    buf.clear();
    buf.clear();
    ensure!(buf.len() == 0 && !buf.is_full(), "clear on empty changed the size");
    buf.extend([3, 4]);
    ensure!(buf.render() == "3 4", "buffer unusable after clear, rendered {:?}", buf.render());
    Ok(())
}

fn long_wraparound() -> Result<()> {
    let mut buf = Buf::new();
    let total = 1_003;
    buf.extend(0..total);
    ensure!(buf.is_full(), "buffer not full after {} writes", total);
    for want in total - 4..total {
        expect_read(&mut buf, want)?;
    }
    ensure!(buf.is_empty(), "values left over after reading the window");
    Ok(())
}

fn peek_and_iter() -> Result<()> {
    let mut buf = Buf::new();
    buf.extend(1..=6);
    let seen: Vec<i32> = buf.iter().copied().collect();
    ensure!(seen == [3, 4, 5, 6], "iter yielded {:?}", seen);
    ensure!(buf.peek_newest() == Some(&6), "newest is {:?}", buf.peek_newest());

    let tokens = buf.render().split(' ').count();
    ensure!(tokens == buf.len(), "rendered {} tokens for {} elements", tokens, buf.len());

    for want in seen {
        ensure!(buf.peek_oldest() == Some(&want), "peek {:?} before read of {}", buf.peek_oldest(), want);
        expect_read(&mut buf, want)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing() -> Result<()> {
        bail!("boom")
    }

    #[test]
    fn every_builtin_scenario_passes() {
        let all = scenarios();
        let summary = run(&select(all, &[]), false);
        for r in &summary.results {
            assert!(r.passed, "{}: {:?}", r.name, r.message);
        }
        assert_eq!(summary.passed(), all.len());
        assert!(summary.all_passed());
    }

    #[test]
    fn scenario_names_are_unique() {
        let mut names: Vec<_> = scenarios().iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), scenarios().len());
    }

    #[test]
    fn select_matches_substrings() {
        let picked = select(scenarios(), &["clear".to_string()]);
        let names: Vec<_> = picked.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["clear", "clear_on_empty"]);

        assert!(select(scenarios(), &["no_such".to_string()]).is_empty());
    }

    #[test]
    fn failures_are_reported_with_message() {
        let bad = Scenario { name: "bad", description: "always fails", run: failing };
        let good = &scenarios()[0];
        let summary = run(&[&bad, good], false);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.passed(), 1);
        assert_eq!(summary.results[0].message.as_deref(), Some("boom"));
        assert!(!summary.stopped_early);
    }

    #[test]
    fn stop_on_failure_skips_the_rest() {
        let bad = Scenario { name: "bad", description: "always fails", run: failing };
        let good = &scenarios()[0];
        let summary = run(&[&bad, good], true);
        assert_eq!(summary.results.len(), 1);
        assert!(summary.stopped_early);
    }
}
