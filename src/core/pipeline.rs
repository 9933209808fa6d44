//! Title update pipeline.
//!
//! Walks a library's items in server order, one at a time:
//! - items without files or with a locked title are skipped outright
//! - every other item gets a title generated from its relative path
//! - the title is then previewed (dry run) or written back to the server
//!
//! A failing item is recorded and the batch moves on.

use crate::core::generator::TitleGenerator;
use crate::models::media::{Library, MediaItem};
use crate::services::LibraryService;
use crate::utils::path::relative_path;
use crate::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Whether titles are written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Show candidate titles only.
    DryRun,
    /// Write candidate titles to the server.
    Apply,
}

/// Why an item was not sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Locked,
    NoFile,
}

/// Terminal state of one item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Skipped(SkipReason),
    Previewed { relative_path: String, title: String },
    Applied { relative_path: String, title: String },
    Failed { relative_path: String, error: String },
}

/// Outcome of one item, with the title it had before processing.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemReport {
    pub current_title: String,
    pub outcome: ItemOutcome,
}

impl ItemReport {
    /// Plain-text report line.
    pub fn line(&self) -> String {
        match &self.outcome {
            ItemOutcome::Skipped(SkipReason::Locked) => {
                format!("SKIP (locked): {}", self.current_title)
            }
            ItemOutcome::Skipped(SkipReason::NoFile) => {
                format!("SKIP (no file): {}", self.current_title)
            }
            ItemOutcome::Previewed {
                relative_path,
                title,
            } => format!(
                "DRY RUN: '{}' -> '{}'\n  Path: {}",
                self.current_title, title, relative_path
            ),
            ItemOutcome::Applied {
                relative_path,
                title,
            } => format!(
                "UPDATE: '{}' -> '{}'\n  Path: {}",
                self.current_title, title, relative_path
            ),
            ItemOutcome::Failed {
                relative_path,
                error,
            } => format!(
                "ERROR: {}: {}\n  Path: {}",
                self.current_title, error, relative_path
            ),
        }
    }

    fn styled_line(&self) -> String {
        let line = self.line();
        let (prefix, rest) = line.split_once(':').unwrap_or((line.as_str(), ""));
        let prefix = match self.outcome {
            ItemOutcome::Skipped(_) => prefix.dimmed(),
            ItemOutcome::Previewed { .. } => prefix.yellow(),
            ItemOutcome::Applied { .. } => prefix.green(),
            ItemOutcome::Failed { .. } => prefix.red(),
        };
        format!("{}:{}", prefix, rest)
    }
}

/// Results of a whole batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn applied(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Applied { .. }))
    }

    pub fn previewed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Previewed { .. }))
    }

    pub fn skipped_locked(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped(SkipReason::Locked)))
    }

    pub fn skipped_no_file(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped(SkipReason::NoFile)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed { .. }))
    }

    /// Items that reached title generation.
    pub fn attempted(&self) -> usize {
        self.applied() + self.previewed() + self.failed()
    }

    /// Whether items were attempted and none of them succeeded.
    pub fn all_failed(&self) -> bool {
        self.attempted() > 0 && self.failed() == self.attempted()
    }

    /// Error messages in enumeration order.
    pub fn errors(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|r| match &r.outcome {
                ItemOutcome::Failed { error, .. } => Some(format!("{}: {}", r.current_title, error)),
                _ => None,
            })
            .collect()
    }

    /// Print summary.
    pub fn print_summary(&self, mode: RunMode) {
        println!("{}", "Summary".bold().green());
        match mode {
            RunMode::DryRun => println!("  {} {}", "Previewed:".bold(), self.previewed()),
            RunMode::Apply => println!("  {} {}", "Updated:".bold(), self.applied()),
        }
        println!("  {} {}", "Skipped (locked):".bold(), self.skipped_locked());
        println!("  {} {}", "Skipped (no file):".bold(), self.skipped_no_file());
        println!("  {} {}", "Failed:".bold(), self.failed());

        let errors = self.errors();
        if !errors.is_empty() {
            println!();
            println!("{}", "Errors:".bold().red());
            for error in &errors {
                println!("  - {}", error);
            }
        }

        if mode == RunMode::DryRun {
            println!();
            println!("{}", "This was a DRY RUN. No changes were made.".yellow());
        }
    }
}

/// Drives title generation and updates over one library.
pub struct UpdatePipeline<'a> {
    server: &'a dyn LibraryService,
    generator: &'a TitleGenerator,
    mode: RunMode,
}

impl<'a> UpdatePipeline<'a> {
    pub fn new(server: &'a dyn LibraryService, generator: &'a TitleGenerator, mode: RunMode) -> Self {
        Self {
            server,
            generator,
            mode,
        }
    }

    /// Process every item of `library`.
    ///
    /// Only listing the items can fail the batch as a whole.
    pub async fn run(&self, library: &Library) -> Result<BatchReport> {
        tracing::info!("Scanning library: {}...", library.title);
        let items = self.server.items(library).await?;
        tracing::info!("Found {} items in '{}'", items.len(), library.title);

        let pb = ProgressBar::new(items.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        let mut report = BatchReport::default();
        for item in &items {
            pb.set_message(item.title.clone());

            let outcome = self.process_item(library, item).await;
            let item_report = ItemReport {
                current_title: item.title.clone(),
                outcome,
            };
            pb.suspend(|| println!("{}", item_report.styled_line()));
            report.items.push(item_report);

            pb.inc(1);
        }
        pb.finish_and_clear();

        Ok(report)
    }

    /// Take one item to its terminal state.
    pub async fn process_item(&self, library: &Library, item: &MediaItem) -> ItemOutcome {
        let Some(file) = item.primary_file() else {
            return ItemOutcome::Skipped(SkipReason::NoFile);
        };
        if item.title_locked {
            tracing::debug!("Title locked, skipping {}", item.rating_key);
            return ItemOutcome::Skipped(SkipReason::Locked);
        }

        let relative_path = relative_path(file, &library.locations);

        let title = match self.generator.generate(&relative_path).await {
            Ok(title) => title,
            Err(e) => {
                tracing::error!("Generation failed for {}: {}", relative_path, e);
                return ItemOutcome::Failed {
                    relative_path,
                    error: e.to_string(),
                };
            }
        };

        match self.mode {
            RunMode::DryRun => ItemOutcome::Previewed {
                relative_path,
                title,
            },
            RunMode::Apply => match self.server.update_title(item, &title).await {
                Ok(()) => ItemOutcome::Applied {
                    relative_path,
                    title,
                },
                Err(e) => {
                    tracing::error!("Update failed for {}: {}", item.rating_key, e);
                    ItemOutcome::Failed {
                        relative_path,
                        error: e.to_string(),
                    }
                }
            },
        }
    }
}
