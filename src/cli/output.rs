//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the research CLI,
//! including the rendering of plans and research bundles.

use crate::types::{Origin, ResearchBundle, ResearchPlan, ScrapeStatus};
use owo_colors::OwoColorize;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a file creation message
    pub fn created(&self, file_type: &str, path: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "✓".green().bold(),
                file_type.dimmed(),
                path.bright_white()
            );
        } else {
            println!("  [CREATED] {} {}", file_type, path);
        }
    }

    /// Print a file skipped message
    pub fn skipped(&self, path: &str, reason: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "○".yellow(),
                path.dimmed(),
                format!("({})", reason).yellow()
            );
        } else {
            println!("  [SKIPPED] {} ({})", path, reason);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a subheader
    pub fn subheader(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.cyan().bold());
        } else {
            println!("\n  --- {} ---", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a command suggestion
    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            println!("     $ {}", cmd);
        }
    }

    /// Print completion message with next steps
    pub fn complete(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "🚀".green(), message.bright_green().bold());
        } else {
            println!("\n  [DONE] {}", message);
        }
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }

    /// Print where a stage result came from, warning on heuristics
    pub fn origin(&self, stage: &str, origin: &Origin) {
        match origin {
            Origin::Model => self.kv(stage, "model"),
            Origin::Heuristic { reason } => {
                self.warning(&format!("{} used heuristic fallback ({})", stage, reason))
            }
        }
    }

    /// Print a research plan
    pub fn plan(&self, plan: &ResearchPlan) {
        self.header(&format!("Research plan: {}", plan.query));
        self.kv("Intent", &plan.analysis.intent.label());
        if !plan.analysis.keywords.is_empty() {
            self.kv("Keywords", &plan.analysis.keywords.join(", "));
        }
        if let Some(context) = &plan.analysis.context {
            self.kv("Context", context);
        }

        self.subheader("Target sites");
        for site in &plan.target_sites {
            self.list_item(&format!("{} ({}, {:?})", site.name, site.url, site.search_type));
        }

        self.subheader("Search queries");
        for query in &plan.search_queries {
            self.list_item(query);
        }

        self.subheader("Strategy");
        for step in &plan.search_strategy {
            self.list_item(step);
        }
    }

    /// Print a complete research bundle as a report
    pub fn bundle(&self, bundle: &ResearchBundle) {
        self.plan(&bundle.plan);
        self.origin("Plan", &bundle.plan_origin);

        self.header("Search");
        self.kv("Raw results", &bundle.raw_result_count.to_string());
        self.kv("Kept after filtering", &bundle.search_results.len().to_string());
        for result in &bundle.search_results {
            self.list_item(&format!(
                "[{:.1}] {} - {}",
                result.relevance_score, result.title, result.url
            ));
        }

        self.header("Scraped pages");
        for page in &bundle.scraped_pages {
            let line = format!("{} ({} words) {}", page.title, page.word_count, page.url);
            match page.status {
                ScrapeStatus::Success => self.success(&line),
                ScrapeStatus::Timeout => self.warning(&format!("timeout: {}", page.url)),
                ScrapeStatus::Error => {
                    self.warning(&format!("error: {} {}", page.url, page.content))
                }
            }
        }

        let synthesis = &bundle.synthesis;
        self.header("Synthesis");
        self.origin("Synthesis", &bundle.synthesis_origin);
        println!("\n    {}", synthesis.summary);

        if !synthesis.key_points.is_empty() {
            self.subheader("Key points");
            for point in &synthesis.key_points {
                self.list_item(point);
            }
        }
        if !synthesis.recommendations.is_empty() {
            self.subheader("Recommendations");
            for rec in &synthesis.recommendations {
                self.list_item(rec);
            }
        }

        self.newline();
        self.kv("Confidence", &format!("{:.0}%", synthesis.confidence * 100.0));
        self.kv("Sources", &synthesis.sources_summary);
        self.kv("Duration", &format!("{} ms", bundle.duration_ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::plan::fallback_plan;
    use crate::types::FallbackReason;

    #[test]
    fn test_output_no_color() {
        let output = Output::no_color();
        assert!(!output.colored);
        assert!(Output::default().colored);
    }

    #[test]
    fn test_output_methods_no_panic() {
        let output = Output::no_color();

        output.success("test success");
        output.info("test info");
        output.warning("test warning");
        output.error("test error");
        output.created("file", "path/to/file");
        output.skipped("path", "reason");
        output.header("Test Header");
        output.subheader("Test Subheader");
        output.kv("key", "value");
        output.list_item("item");
        output.hint("hint message");
        output.command("some command");
        output.complete("complete message");
        output.newline();
    }

    #[test]
    fn test_plan_rendering_no_panic() {
        let plan = fallback_plan("comment apprendre Rust", 2025);
        Output::new().plan(&plan);
        Output::no_color().plan(&plan);
        Output::no_color().origin(
            "Plan",
            &Origin::Heuristic {
                reason: FallbackReason::NoContent,
            },
        );
    }
}
