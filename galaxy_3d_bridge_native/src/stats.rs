/// Native call statistics with a colored console report.

use std::sync::atomic::{AtomicU64, Ordering};
use colored::*;

/// Snapshot of native traffic counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallStats {
    pub resolutions: u64,
    pub failed_resolutions: u64,
    pub invocations: u64,
    pub failed_invocations: u64,
    pub singleton_lookups: u64,
    pub releases: u64,
}

impl CallStats {
    pub fn total(&self) -> u64 {
        self.resolutions + self.invocations + self.singleton_lookups + self.releases
    }
}

/// Thread-safe counters
#[derive(Default)]
pub(crate) struct CallStatsTracker {
    resolutions: AtomicU64,
    failed_resolutions: AtomicU64,
    invocations: AtomicU64,
    failed_invocations: AtomicU64,
    singleton_lookups: AtomicU64,
    releases: AtomicU64,
}

impl CallStatsTracker {
    pub(crate) fn record_resolution(&self, found: bool) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        if !found {
            self.failed_resolutions.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_invocation(&self, ok: bool) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.failed_invocations.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_singleton_lookup(&self) {
        self.singleton_lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_release(&self) {
        self.releases.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CallStats {
        CallStats {
            resolutions: self.resolutions.load(Ordering::Relaxed),
            failed_resolutions: self.failed_resolutions.load(Ordering::Relaxed),
            invocations: self.invocations.load(Ordering::Relaxed),
            failed_invocations: self.failed_invocations.load(Ordering::Relaxed),
            singleton_lookups: self.singleton_lookups.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
        }
    }
}

/// Print a native traffic report
pub fn print_call_stats_report(stats: &CallStats) {
    if stats.total() == 0 {
        println!("\n{}", "✓ No native calls".green().bold());
        return;
    }

    println!("\n{}", "=== Native Bridge Call Report ===".bright_blue().bold());

    println!("  {} {}", "Resolutions:".cyan(), stats.resolutions);
    if stats.failed_resolutions > 0 {
        println!("    {} {}", "failed:".yellow().bold(), stats.failed_resolutions);
    }
    println!("  {} {}", "Invocations:".cyan(), stats.invocations);
    if stats.failed_invocations > 0 {
        println!("    {} {}", "failed:".red().bold(), stats.failed_invocations);
    }
    if stats.singleton_lookups > 0 {
        println!("  {} {}", "Singleton lookups:".bright_black(), stats.singleton_lookups);
    }
    if stats.releases > 0 {
        println!("  {} {}", "Releases:".bright_black(), stats.releases);
    }

    println!("  {} {}", "Total:".white().bold(), stats.total());
    println!("{}\n", "=================================".bright_blue().bold());
}
