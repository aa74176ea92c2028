//! Audit Command
//!
//! Run the five-stage risk audit for one user and render the outcome.
//!
//! Usage:
//!   riskaudit audit <USER_ID> [--data-dir D] [--policies P] [--format text|json]
//!                   [--export DIR] [--model M] [--sequential]

use std::fs;
use std::path::{Path, PathBuf};

use tokio::runtime::Runtime;
use tracing::info;

use crate::ai::{StructuredReasoningClient, create_provider};
use crate::audit::{AuditOutcome, AuditPipeline, AxisLevels, SafetyReport};
use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, ConfigOverrides, OutputFormat};
use crate::storage::{Dataset, load_policies};
use crate::types::{AuditError, Result, RiskLevel, UserProfile, truncate_chars};

/// Audit command options
#[derive(Debug, Clone, Default)]
pub struct AuditOptions {
    pub user_id: String,
    pub format: OutputFormat,
    /// Directory for the plain-text report export
    pub export: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

pub fn run(options: AuditOptions) -> Result<()> {
    let ctx = CommandContext::load(&options.overrides)?;
    let config = &ctx.config;

    let dataset = Dataset::load(&config.data.dir)?;
    let subject = dataset.subject(&options.user_id)?;
    let policy_text = load_policies(&config.data.policies)?;

    // Credential problems surface here, before any data is sent anywhere
    let provider = create_provider(&config.llm.to_provider_config())?;
    let pipeline = AuditPipeline::new(
        StructuredReasoningClient::new(provider),
        config.audit.clone(),
    );
    info!(
        "Using LLM provider: {} ({})",
        pipeline.client().provider_name(),
        config.llm.model
    );

    let rt = Runtime::new()?;
    let outcome = rt.block_on(pipeline.run(subject.request(dataset.users(), &policy_text)))?;

    match options.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => render_text(&subject.user, &outcome),
    }

    if let Some(dir) = &options.export {
        let path = export_report(dir, &outcome)?;
        if options.format == OutputFormat::Text {
            Output::new().success(&format!("Report exported to {}", path.display()));
        }
    }

    Ok(())
}

/// Write `safety_report_<user>.txt` into `dir`
fn export_report(dir: &Path, outcome: &AuditOutcome) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(SafetyReport::export_file_name(&outcome.user_id));
    fs::write(&path, outcome.safety_report().to_text_export()).map_err(|e| {
        AuditError::Data(format!("Failed to write {}: {}", path.display(), e))
    })?;
    Ok(path)
}

const EVIDENCE_WIDTH: usize = 80;

fn render_text(user: &UserProfile, outcome: &AuditOutcome) {
    let out = Output::new();
    out.header(&format!("Risk audit: {}", user.user_id));
    out.field("Run", outcome.run_id);

    out.section("Profile");
    out.field("Declared age", user.age);
    out.field("Account type", &user.account_type);
    out.field("Created", user.created_at);

    let underage = outcome.underage();
    out.section("Underage risk");
    out.field(
        "Minor suspected",
        if underage.is_minor_suspected { "yes" } else { "no" },
    );
    out.field("Misrepresentation", out.score(underage.misrepresentation_risk));
    if !underage.reason.is_empty() {
        out.field("Reason", &underage.reason);
    }

    let content = outcome.content();
    out.section("Content risk");
    let overall = content.overall_levels();
    for (label, level) in AxisLevels::LABELS.iter().zip(overall.levels()) {
        out.bar(label, level);
    }
    if !content.summary.is_empty() {
        out.field("Summary", &content.summary);
    }
    for post in &content.per_post {
        let flagged: Vec<String> = AxisLevels::LABELS
            .iter()
            .zip(post.levels.levels())
            .filter(|(_, level)| *level > RiskLevel::None)
            .map(|(label, level)| format!("{} {}", label, out.level(level)))
            .collect();
        if !flagged.is_empty() {
            println!("  • {}: {}", post.post_id, flagged.join(", "));
        }
    }

    let interaction = outcome.interaction();
    out.section("Interaction risk");
    out.field("Grooming risk", out.level(interaction.grooming_risk));
    for snippet in &interaction.evidence {
        println!(
            "  • [{}] \"{}\"",
            snippet.interaction_id,
            truncate_chars(&snippet.text_snippet, EVIDENCE_WIDTH)
        );
        if !snippet.comment.is_empty() {
            println!("      {}", snippet.comment);
        }
    }
    if !interaction.summary.is_empty() {
        out.field("Summary", &interaction.summary);
    }

    let decision = outcome.decision();
    out.section("Policy evaluation");
    out.field("Severity", out.level(decision.overall_severity));
    out.field("Action", decision.action_label());
    if !decision.violated_sections.is_empty() {
        out.field("Violated", decision.violated_sections.join("; "));
    }
    if !decision.explanation.is_empty() {
        out.field("Explanation", &decision.explanation);
    }

    let report = outcome.safety_report();
    out.section(&report.title);
    out.field("Overall risk", out.score(report.overall_risk_score));
    if !report.summary.is_empty() {
        out.field("Summary", &report.summary);
    }
    if !report.narrative.is_empty() {
        println!();
        println!("{}", report.narrative);
    }

    let degraded = outcome.degraded_stages();
    if !degraded.is_empty() {
        println!();
        let names: Vec<&str> = degraded.iter().map(|r| r.as_str()).collect();
        out.warning(&format!(
            "Incomplete answers from: {} (treated as no information)",
            names.join(", ")
        ));
    }
}
