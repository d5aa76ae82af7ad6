//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use spesa_core::{GroceryItem, HistoryEntry, ListCode};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a freshly created list code
    pub fn print_code(&self, code: &ListCode) {
        match self.format {
            OutputFormat::Human => {
                println!("Created list {}", code);
                println!("Share this code to let others join.");
            }
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "code": code }));
            }
            OutputFormat::Quiet => {
                println!("{}", code);
            }
        }
    }

    /// Print a list's items
    pub fn print_items(&self, items: &[GroceryItem]) {
        match self.format {
            OutputFormat::Human => {
                if items.is_empty() {
                    println!("The list is empty.");
                    return;
                }
                for item in items {
                    let check = if item.checked { "x" } else { " " };
                    let quantity = item
                        .quantity
                        .as_deref()
                        .map(|q| format!(" ({})", q))
                        .unwrap_or_default();
                    println!(
                        "[{}] {} {}{} | {}",
                        check,
                        item.category.emoji(),
                        item.name,
                        quantity,
                        &item.id.to_string()[..8]
                    );
                }
                println!("\n{} item(s)", items.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(items).unwrap());
            }
            OutputFormat::Quiet => {
                for item in items {
                    println!("{}", item.id);
                }
            }
        }
    }

    /// Print the outcome of an add: only the newly created items
    pub fn print_created(&self, created: &[GroceryItem]) {
        match self.format {
            OutputFormat::Human => {
                if created.is_empty() {
                    println!("Nothing new added; existing items were updated.");
                    return;
                }
                for item in created {
                    println!("Added: {}", item.name);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(created).unwrap());
            }
            OutputFormat::Quiet => {
                for item in created {
                    println!("{}", item.id);
                }
            }
        }
    }

    /// Print a list's purchase-frequency history
    pub fn print_history(&self, history: &[HistoryEntry]) {
        match self.format {
            OutputFormat::Human => {
                if history.is_empty() {
                    println!("No history yet.");
                    return;
                }
                for entry in history {
                    println!("{:>4}  {}", entry.count, entry.name);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(history).unwrap());
            }
            OutputFormat::Quiet => {
                for entry in history {
                    println!("{}", entry.name);
                }
            }
        }
    }

    /// Print an informational message (suppressed in quiet mode)
    pub fn print_message(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", message),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "message": message }));
            }
            OutputFormat::Quiet => {}
        }
    }
}
