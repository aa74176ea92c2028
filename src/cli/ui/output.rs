use console::style;

use crate::types::RiskLevel;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Aligned `label: value` line
    pub fn field(&self, label: &str, value: impl std::fmt::Display) {
        println!("  {:<18} {}", style(format!("{}:", label)).dim(), value);
    }

    /// One bar of the content chart, four cells wide
    pub fn bar(&self, label: &str, level: RiskLevel) {
        let filled = level.ordinal() as usize;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(4 - filled));
        println!("  {:<20} {} {}", label, bar, self.level(level));
    }

    /// Risk level colored by severity
    pub fn level(&self, level: RiskLevel) -> String {
        let styled = match level {
            RiskLevel::None => style(level.as_str()).dim(),
            RiskLevel::Low => style(level.as_str()).green(),
            RiskLevel::Medium => style(level.as_str()).yellow(),
            RiskLevel::High => style(level.as_str()).red(),
            RiskLevel::Critical => style(level.as_str()).red().bold(),
        };
        styled.to_string()
    }

    /// 0-100 score colored by band
    pub fn score(&self, score: u8) -> String {
        let text = format!("{}/100", score);
        match score {
            0..=29 => style(text).green().to_string(),
            30..=69 => style(text).yellow().to_string(),
            _ => style(text).red().bold().to_string(),
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
