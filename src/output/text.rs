//! Text output formatter for human-readable display
//!
//! This module provides:
//! - A table of accepted upgrades in discovery order
//! - Summary with stopping rule, mean and median lag
//! - The slowest updates ranked by lag
//! - Discarded updates in verbose mode

use crate::domain::{AnalysisSummary, LagSample};
use crate::output::{OutputFormatter, Verbosity};
use crate::report::{slowest, LagStatistics};
use colored::Colorize;
use std::io::Write;

/// Minimum width of the dependency column
const MIN_NAME_WIDTH: usize = 20;

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbosity: Verbosity,
    top: usize,
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, top: usize) -> Self {
        Self::with_color(verbosity, top, true)
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, top: usize, color: bool) -> Self {
        Self {
            verbosity,
            top,
            color,
        }
    }

    fn name_width(samples: &[&LagSample]) -> usize {
        samples
            .iter()
            .map(|s| s.event.dependency.len())
            .max()
            .unwrap_or(0)
            .max(MIN_NAME_WIDTH)
    }

    fn header(&self, summary: &AnalysisSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let title = format!("{} dependency update lag", summary.ecosystem);
        let detail = format!(
            "({} commits walked, {})",
            summary.commits_walked, summary.stopping_rule
        );
        if self.color {
            writeln!(writer, "{} {}", title.bold(), detail.dimmed())?;
        } else {
            writeln!(writer, "{} {}", title, detail)?;
        }
        writeln!(writer)
    }

    fn format_table(&self, samples: &[LagSample], writer: &mut dyn Write) -> std::io::Result<()> {
        let all: Vec<&LagSample> = samples.iter().collect();
        let width = Self::name_width(&all);

        let heading = format!(
            "  {:width$}  {:<12} {:<12} {:>10}  {:<10}  {}",
            "Dependency",
            "Old",
            "New",
            "Lag (days)",
            "Date",
            "Commit",
            width = width
        );
        if self.color {
            writeln!(writer, "{}", heading.bold())?;
        } else {
            writeln!(writer, "{}", heading)?;
        }

        for sample in samples {
            let event = &sample.event;
            let lag = format!("{:>10.1}", sample.lag_days);
            writeln!(
                writer,
                "  {:width$}  {:<12} {:<12} {}  {}  {}",
                event.dependency,
                event.old_version,
                event.new_version,
                if self.color {
                    lag.yellow().to_string()
                } else {
                    lag
                },
                event.committed_at.format("%Y-%m-%d"),
                event.short_hash(),
                width = width
            )?;
        }
        writeln!(writer)
    }

    fn format_statistics(
        &self,
        summary: &AnalysisSummary,
        stats: &LagStatistics,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.color {
            writeln!(writer, "{}", "Summary".bold())?;
        } else {
            writeln!(writer, "Summary")?;
        }
        writeln!(writer, "  Stopping rule:  {}", summary.stopping_rule)?;
        writeln!(
            writer,
            "  Updates:        {} ({} discarded, {} skipped)",
            stats.count,
            summary.discarded.len(),
            summary.skips.total()
        )?;
        writeln!(writer, "  Mean lag:       {:.1} days", stats.mean)?;
        writeln!(writer, "  Median lag:     {:.1} days", stats.median)?;
        writeln!(
            writer,
            "  Range:          {:.1} to {:.1} days",
            stats.min, stats.max
        )?;
        if summary.halted {
            writeln!(writer, "  Halted after reaching the change limit")?;
        }
        writeln!(writer)
    }

    fn format_slowest(
        &self,
        summary: &AnalysisSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let ranked = slowest(&summary.samples, self.top);
        if ranked.is_empty() {
            return Ok(());
        }

        let title = format!("Slowest {} updates", ranked.len());
        if self.color {
            writeln!(writer, "{}", title.bold())?;
        } else {
            writeln!(writer, "{}", title)?;
        }

        let width = Self::name_width(&ranked);
        for (rank, sample) in ranked.iter().enumerate() {
            let event = &sample.event;
            let arrow = if self.color {
                "→".dimmed().to_string()
            } else {
                "->".to_string()
            };
            writeln!(
                writer,
                "  {:>2}. {:width$}  {} {} {}  {:.1} days  ({} {})",
                rank + 1,
                event.dependency,
                event.old_version,
                arrow,
                event.new_version,
                sample.lag_days,
                event.committed_at.format("%Y-%m-%d"),
                event.short_hash(),
                width = width
            )?;
        }
        writeln!(writer)
    }

    fn format_discarded(
        &self,
        summary: &AnalysisSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if summary.discarded.is_empty() {
            return Ok(());
        }

        if self.color {
            writeln!(writer, "  {}", "Discarded (implausible lag):".dimmed())?;
        } else {
            writeln!(writer, "  Discarded (implausible lag):")?;
        }
        for discarded in &summary.discarded {
            let line = format!("{}  {:.1} days", discarded.event, discarded.lag_days);
            if self.color {
                writeln!(writer, "    {}", line.dimmed())?;
            } else {
                writeln!(writer, "    {}", line)?;
            }
        }
        writeln!(writer)
    }

    fn format_quiet(
        &self,
        stats: Option<&LagStatistics>,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        match stats {
            Some(stats) => writeln!(
                writer,
                "{} updates, mean lag {:.1} days, median {:.1} days",
                stats.count, stats.mean, stats.median
            ),
            None => writeln!(writer, "No updates detected"),
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, summary: &AnalysisSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let stats = LagStatistics::from_samples(&summary.samples);

        if self.verbosity == Verbosity::Quiet {
            return self.format_quiet(stats.as_ref(), writer);
        }

        self.header(summary, writer)?;

        let Some(stats) = stats else {
            if self.color {
                writeln!(writer, "{}", "No updates detected".dimmed())?;
            } else {
                writeln!(writer, "No updates detected")?;
            }
            if self.verbosity == Verbosity::Verbose {
                self.format_discarded(summary, writer)?;
            }
            return Ok(());
        };

        self.format_table(&summary.samples, writer)?;
        if self.verbosity == Verbosity::Verbose {
            self.format_discarded(summary, writer)?;
        }
        self.format_statistics(summary, &stats, writer)?;
        self.format_slowest(summary, writer)
    }
}
