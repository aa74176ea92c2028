//! RiskAudit - Multi-Agent Safety Risk Audit
//!
//! Audits one social-platform user by delegating five specialised judgments
//! to a language-model backend and combining the structured answers into a
//! policy decision and an operator-facing report.
//!
//! ## Pipeline
//!
//! - **Detection**: underage, content and interaction agents run concurrently
//! - **Aggregation**: the three findings are bundled without reconciliation
//! - **Policy**: findings are mapped onto the policy corpus, one action chosen
//! - **Report**: everything is synthesised into a titled, scored narrative
//!
//! Backend answers are treated as untrusted documents: an unreadable answer
//! becomes an empty finding and the run continues.
//!
//! ## Quick Start
//!
//! ```ignore
//! use riskaudit::{AuditPipeline, Config, Dataset, StructuredReasoningClient, create_provider};
//!
//! let config = Config::default();
//! let provider = create_provider(&config.llm.to_provider_config())?;
//! let pipeline = AuditPipeline::new(StructuredReasoningClient::new(provider), config.audit);
//!
//! let dataset = Dataset::load("data".as_ref())?;
//! let subject = dataset.subject("u_001")?;
//! let outcome = pipeline.run(subject.request(dataset.users(), "1. ...")).await?;
//! println!("{}", outcome.safety_report().to_text_export());
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: backend abstraction, JSON recovery, structured client
//! - [`audit`]: agent roles, findings, typed views, pipeline
//! - [`storage`]: CSV dataset and policy corpus
//! - [`config`]: layered configuration

pub mod ai;
pub mod audit;
pub mod cli;
pub mod config;
pub mod constants;
pub mod storage;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader};

pub use types::error::{AuditError, ErrorCategory, Result};

pub use storage::{AuditSubject, Dataset, load_policies};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use audit::{
    AgentFinding, AgentRole, AggregatedFindings, AuditOutcome, AuditPipeline, AuditRequest,
    PolicyDecision, SafetyReport, aggregate,
};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{LlmProvider, SharedProvider, StructuredReasoningClient, create_provider};
