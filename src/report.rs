use crate::selftest::RunSummary;
use serde_json::{json, Value};

pub const SUCCESS_LINE: &str = "All tests passed successfully!";

fn now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Human-readable report, one line per scenario.
pub fn text(summary: &RunSummary, timestamp: bool) -> String {
    let mut out = String::new();

    if timestamp {
        out.push_str(&format!("── circbuf self-test ── {}\n", now()));
    }
    for r in &summary.results {
        if r.passed {
            out.push_str(&format!("PASS {} ({}µs)\n", r.name, r.elapsed_us));
        } else {
            let msg = r.message.as_deref().unwrap_or("failed");
            out.push_str(&format!("FAIL {}: {}\n", r.name, msg));
        }
    }
    out.push('\n');
    out.push_str(&format!("{} passed, {} failed", summary.passed(), summary.failed()));
    if summary.stopped_early {
        out.push_str(" (stopped at first failure)");
    }
    out.push('\n');
    if summary.all_passed() {
        out.push_str(SUCCESS_LINE);
        out.push('\n');
    }
    out
}

pub fn json(summary: &RunSummary, timestamp: bool) -> Value {
    let mut report = json!({
        "circbuf_version": env!("CARGO_PKG_VERSION"),
        "passed":          summary.passed(),
        "failed":          summary.failed(),
        "stopped_early":   summary.stopped_early,
        "scenarios":       summary.results,
    });
    if timestamp {
        report["timestamp"] = Value::String(chrono::Local::now().to_rfc3339());
    }
    report
}
