//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Dependency tables grouped into production, development and extraneous
//! - Semantic version change type indication (major/minor/patch)
//! - Summary with outdated/missing/extraneous breakdown

use crate::domain::{DependencyStatus, DependencyType, SimpleDependency};
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use semver::Version;
use std::io::Write;

/// Minimum width of the package name column
const MIN_NAME_WIDTH: usize = 20;

/// Semantic version distance between an installed and a newer version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch version change (fixes)
    Patch,
    /// Same version
    UpToDate,
    /// Unknown or unparseable
    Unknown,
}

impl UpdateKind {
    /// Determine the change type between two versions
    pub fn between(installed: &str, target: &str) -> Self {
        let parse = |v: &str| Version::parse(v.trim().trim_start_matches('v')).ok();

        match (parse(installed), parse(target)) {
            (Some(old), Some(new)) if old == new => UpdateKind::UpToDate,
            (Some(old), Some(new)) => {
                if new.major != old.major {
                    UpdateKind::Major
                } else if new.minor != old.minor {
                    UpdateKind::Minor
                } else {
                    UpdateKind::Patch
                }
            }
            _ if installed == target => UpdateKind::UpToDate,
            _ => UpdateKind::Unknown,
        }
    }

    /// Change type of a status record, from installed to latest
    pub fn of(status: &DependencyStatus) -> Self {
        match (&status.installed, &status.latest) {
            (Some(installed), Some(latest)) => Self::between(installed, latest),
            _ => UpdateKind::Unknown,
        }
    }

    /// Get the display label with color
    pub fn colored_label(&self) -> String {
        match self {
            UpdateKind::Major => "major".red().bold().to_string(),
            UpdateKind::Minor => "minor".yellow().to_string(),
            UpdateKind::Patch => "patch".green().to_string(),
            UpdateKind::UpToDate => "current".dimmed().to_string(),
            UpdateKind::Unknown => "?".dimmed().to_string(),
        }
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            UpdateKind::Major => "major",
            UpdateKind::Minor => "minor",
            UpdateKind::Patch => "patch",
            UpdateKind::UpToDate => "current",
            UpdateKind::Unknown => "?",
        }
    }
}

/// Counts shown in the summary
#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    total: usize,
    major: usize,
    minor: usize,
    patch: usize,
    other: usize,
    missing: usize,
    extraneous: usize,
}

impl Tally {
    fn of(statuses: &[DependencyStatus]) -> Self {
        let mut tally = Tally {
            total: statuses.len(),
            ..Tally::default()
        };

        for status in statuses {
            if status.kind == DependencyType::Extraneous {
                tally.extraneous += 1;
            }
            if status.is_missing() {
                tally.missing += 1;
            }
            if status.has_update() {
                match UpdateKind::of(status) {
                    UpdateKind::Major => tally.major += 1,
                    UpdateKind::Minor => tally.minor += 1,
                    UpdateKind::Patch => tally.patch += 1,
                    UpdateKind::UpToDate | UpdateKind::Unknown => tally.other += 1,
                }
            }
        }

        tally
    }

    fn outdated(&self) -> usize {
        self.major + self.minor + self.patch + self.other
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn section_title(kind: DependencyType) -> &'static str {
        match kind {
            DependencyType::Prod => "dependencies",
            DependencyType::Dev => "devDependencies",
            DependencyType::Extraneous => "extraneous",
        }
    }

    fn write_section_header(
        &self,
        kind: DependencyType,
        count: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let title = Self::section_title(kind);
        if self.color {
            writeln!(writer, "{} {}", title.bold(), format!("({})", count).dimmed())
        } else {
            writeln!(writer, "{} ({})", title, count)
        }
    }

    /// Format a single status line
    fn format_status_line(
        &self,
        status: &DependencyStatus,
        name_width: usize,
        required_width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let name = format!("{:width$}", status.name, width = name_width);
        let required = format!(
            "{:width$}",
            status.required.as_deref().unwrap_or("-"),
            width = required_width
        );

        let Some(installed) = status.installed.as_deref() else {
            return if self.color {
                writeln!(writer, "  {} {} {}", name, required.dimmed(), "not installed".red())
            } else {
                writeln!(writer, "  {} {} (not installed)", name, required)
            };
        };

        let latest = status.latest.as_deref().filter(|_| status.has_update());
        // wanted differs from both installed and latest
        let wanted = status.wanted.as_deref().filter(|w| {
            self.verbosity == Verbosity::Verbose && Some(*w) != latest && *w != installed
        });

        match (latest, self.color) {
            (None, true) => writeln!(writer, "  {} {} {}", name, required.dimmed(), installed)?,
            (None, false) => writeln!(writer, "  {} {} {}", name, required, installed)?,
            (Some(latest), true) => writeln!(
                writer,
                "  {} {} {} {} {} [{}]",
                name,
                required.dimmed(),
                installed.dimmed(),
                "→".dimmed(),
                latest.bright_white().bold(),
                UpdateKind::of(status).colored_label()
            )?,
            (Some(latest), false) => writeln!(
                writer,
                "  {} {} {} -> {} [{}]",
                name,
                required,
                installed,
                latest,
                UpdateKind::of(status).label()
            )?,
        }

        if let Some(wanted) = wanted {
            let note = format!("wanted {}", wanted);
            if self.color {
                writeln!(writer, "  {:width$} {}", "", note.dimmed(), width = name_width)?;
            } else {
                writeln!(writer, "  {:width$} {}", "", note, width = name_width)?;
            }
        }

        Ok(())
    }

    fn format_summary(&self, tally: &Tally, writer: &mut dyn Write) -> std::io::Result<()> {
        let outdated = tally.outdated();

        if self.verbosity == Verbosity::Quiet {
            return if outdated > 0 {
                if self.color {
                    writeln!(writer, "{} outdated", outdated.to_string().yellow())
                } else {
                    writeln!(writer, "{} outdated", outdated)
                }
            } else if self.color {
                writeln!(writer, "{}", "All up to date".dimmed())
            } else {
                writeln!(writer, "All up to date")
            };
        }

        let mut breakdown = Vec::new();
        for (count, label) in [
            (tally.major, "major"),
            (tally.minor, "minor"),
            (tally.patch, "patch"),
            (tally.other, "other"),
        ] {
            if count > 0 {
                breakdown.push(format!("{} {}", count, label));
            }
        }

        if self.color {
            writeln!(writer, "{}:", "Summary".bold())?;
            writeln!(writer, "  {} package(s)", tally.total)?;
            if outdated > 0 {
                writeln!(
                    writer,
                    "  {} outdated ({})",
                    outdated.to_string().yellow(),
                    breakdown.join(", ")
                )?;
            } else {
                writeln!(writer, "  {}", "All up to date".dimmed())?;
            }
            if tally.missing > 0 {
                writeln!(writer, "  {} not installed", tally.missing.to_string().red())?;
            }
            if tally.extraneous > 0 {
                writeln!(writer, "  {} extraneous", tally.extraneous.to_string().dimmed())?;
            }
        } else {
            writeln!(writer, "Summary:")?;
            writeln!(writer, "  {} package(s)", tally.total)?;
            if outdated > 0 {
                writeln!(writer, "  {} outdated ({})", outdated, breakdown.join(", "))?;
            } else {
                writeln!(writer, "  All up to date")?;
            }
            if tally.missing > 0 {
                writeln!(writer, "  {} not installed", tally.missing)?;
            }
            if tally.extraneous > 0 {
                writeln!(writer, "  {} extraneous", tally.extraneous)?;
            }
        }

        Ok(())
    }
}

impl OutputFormatter for TextFormatter {
    fn format_statuses(
        &self,
        statuses: &[DependencyStatus],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let tally = Tally::of(statuses);

        // In quiet mode, only show summary
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(&tally, writer);
        }

        if self.verbosity == Verbosity::Verbose {
            if let Some(first) = statuses.first() {
                writeln!(writer, "Package manager: {}", first.repo.display_name())?;
                writeln!(writer)?;
            }
        }

        let name_width = statuses
            .iter()
            .map(|s| s.name.len())
            .max()
            .unwrap_or(0)
            .max(MIN_NAME_WIDTH);
        let required_width = statuses
            .iter()
            .map(|s| s.required.as_deref().map_or(1, str::len))
            .max()
            .unwrap_or(0);

        for kind in [DependencyType::Prod, DependencyType::Dev, DependencyType::Extraneous] {
            let section: Vec<&DependencyStatus> =
                statuses.iter().filter(|s| s.kind == kind).collect();
            if section.is_empty() {
                continue;
            }

            self.write_section_header(kind, section.len(), writer)?;
            for status in section {
                self.format_status_line(status, name_width, required_width, writer)?;
            }
            writeln!(writer)?;
        }

        self.format_summary(&tally, writer)
    }

    fn format_simple(
        &self,
        dependencies: &[SimpleDependency],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return writeln!(writer, "{} declared", dependencies.len());
        }

        if dependencies.is_empty() {
            return if self.color {
                writeln!(writer, "{}", "No dependencies declared".dimmed())
            } else {
                writeln!(writer, "No dependencies declared")
            };
        }

        let name_width = dependencies
            .iter()
            .map(|d| d.name.len())
            .max()
            .unwrap_or(0)
            .max(MIN_NAME_WIDTH);

        for kind in [DependencyType::Prod, DependencyType::Dev] {
            let section: Vec<&SimpleDependency> =
                dependencies.iter().filter(|d| d.kind == kind).collect();
            if section.is_empty() {
                continue;
            }

            self.write_section_header(kind, section.len(), writer)?;
            for dependency in section {
                if self.color {
                    writeln!(
                        writer,
                        "  {:width$} {}",
                        dependency.name,
                        dependency.required.dimmed(),
                        width = name_width
                    )?;
                } else {
                    writeln!(
                        writer,
                        "  {:width$} {}",
                        dependency.name,
                        dependency.required,
                        width = name_width
                    )?;
                }
            }
            writeln!(writer)?;
        }

        if self.verbosity == Verbosity::Verbose {
            writeln!(writer, "{} declared", dependencies.len())?;
        }

        Ok(())
    }
}
