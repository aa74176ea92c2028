//! Audit Pipeline
//!
//! Runs the five agents for one user:
//!
//! ```text
//! {underage, content, interaction}  (independent, concurrent)
//!         → aggregate → policy → report
//! ```
//!
//! The pipeline is stateless. Unreadable answers become empty findings and
//! the run continues; a backend call failure aborts the run and is returned
//! tagged with the stage that failed. No report is produced for an aborted run.

pub mod agents;
pub mod aggregate;
pub mod finding;
pub mod roles;

pub use aggregate::{AggregatedFindings, aggregate};
pub use agents::{
    AxisLevels, ContentAssessment, EvidenceSnippet, InteractionAssessment, PolicyDecision,
    PostAssessment, RiskAgent, SafetyReport, UnderageAssessment,
};
pub use finding::AgentFinding;
pub use roles::{AgentRole, RoleSpec};

use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::ai::StructuredReasoningClient;
use crate::config::AuditConfig;
use crate::types::{AgeIndex, Interaction, Post, Result, UserProfile};
use agents::{ContentAgent, InteractionAgent, PolicyAgent, ReportAgent, UnderageAgent};

/// Inputs for one audit, borrowed from the data store
#[derive(Debug, Clone, Copy)]
pub struct AuditRequest<'a> {
    pub user: &'a UserProfile,
    /// Posts owned by `user`
    pub posts: &'a [Post],
    /// Interactions `user` sent or received
    pub interactions: &'a [Interaction],
    /// Full user set, for age lookup
    pub users: &'a [UserProfile],
    pub policy_text: &'a str,
}

/// Everything one completed run produced
#[derive(Debug, Clone, Serialize)]
pub struct AuditOutcome {
    pub run_id: Uuid,
    pub user_id: String,
    #[serde(flatten)]
    pub findings: AggregatedFindings,
    pub policy: AgentFinding,
    pub report: AgentFinding,
}

impl AuditOutcome {
    pub fn underage(&self) -> UnderageAssessment {
        UnderageAssessment::from_finding(&self.findings.underage)
    }

    pub fn content(&self) -> ContentAssessment {
        ContentAssessment::from_finding(&self.findings.content)
    }

    pub fn interaction(&self) -> InteractionAssessment {
        InteractionAssessment::from_finding(&self.findings.interaction)
    }

    pub fn decision(&self) -> PolicyDecision {
        PolicyDecision::from_finding(&self.policy)
    }

    pub fn safety_report(&self) -> SafetyReport {
        SafetyReport::from_finding(&self.report)
    }

    /// Stages whose answer was non-conforming or incomplete
    pub fn degraded_stages(&self) -> Vec<AgentRole> {
        self.findings
            .iter()
            .chain([&self.policy, &self.report])
            .filter(|f| f.is_degraded())
            .map(|f| f.role)
            .collect()
    }
}

/// Orchestrator for one user's audit
pub struct AuditPipeline {
    client: StructuredReasoningClient,
    settings: AuditConfig,
}

impl AuditPipeline {
    pub fn new(client: StructuredReasoningClient, settings: AuditConfig) -> Self {
        Self { client, settings }
    }

    pub fn client(&self) -> &StructuredReasoningClient {
        &self.client
    }

    /// Run all five stages for `request.user`.
    ///
    /// Fails with a configuration error before any backend call when the
    /// client is not ready.
    #[instrument(name = "audit", skip_all, fields(user = %request.user.user_id, run_id = tracing::field::Empty))]
    pub async fn run(&self, request: AuditRequest<'_>) -> Result<AuditOutcome> {
        self.client.ensure_ready()?;

        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));
        info!(
            "Audit: {} posts, {} interactions, model {}",
            request.posts.len(),
            request.interactions.len(),
            self.client.model()
        );

        let annotated = AgeIndex::from_users(request.users).annotate_all(request.interactions);

        let underage_agent = UnderageAgent {
            profile: request.user,
            posts: request.posts,
        };
        let content_agent = ContentAgent {
            posts: request.posts,
        };
        let interaction_agent = InteractionAgent {
            profile: request.user,
            interactions: &annotated,
        };

        let (underage, content, interaction) = if self.settings.concurrent_detection {
            tokio::try_join!(
                self.run_stage(&underage_agent),
                self.run_stage(&content_agent),
                self.run_stage(&interaction_agent),
            )?
        } else {
            (
                self.run_stage(&underage_agent).await?,
                self.run_stage(&content_agent).await?,
                self.run_stage(&interaction_agent).await?,
            )
        };

        let findings = aggregate(underage, content, interaction);
        Self::check_content_rollup(&findings.content);

        let policy = self
            .run_stage(&PolicyAgent {
                policy_text: request.policy_text,
                findings: &findings,
            })
            .await?;

        let report = self
            .run_stage(&ReportAgent {
                profile: request.user,
                findings: &findings,
                policy: &policy,
            })
            .await?;

        let outcome = AuditOutcome {
            run_id,
            user_id: request.user.user_id.clone(),
            findings,
            policy,
            report,
        };

        let decision = outcome.decision();
        info!(
            "Audit: complete, severity {}, action {}, score {}",
            decision.overall_severity,
            decision.action_label(),
            outcome.safety_report().overall_risk_score
        );

        Ok(outcome)
    }

    async fn run_stage(&self, agent: &dyn RiskAgent) -> Result<AgentFinding> {
        let role = agent.role();
        agent
            .run(&self.client, self.settings.max_tokens.for_role(role))
            .await
            .map_err(|e| e.at_stage(role))
    }

    fn check_content_rollup(content: &AgentFinding) {
        let understated = ContentAssessment::from_finding(content).understated_axes();
        if !understated.is_empty() {
            warn!(
                "Audit: content overall level is below a per-post level on {}",
                understated.join(", ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::CompletionRequest;
    use crate::ai::provider::testing::ScriptedProvider;
    use crate::config::TokenBudgets;
    use crate::types::profile::fixtures::{dm, post, user};
    use crate::types::{AuditError, RecommendedAction, RiskLevel};
    use serde_json::{Value, json};
    use std::sync::Arc;

    const POLICIES: &str = "1. Self-harm content\n2. Grooming and exploitation of minors";

    fn role_of(system: &str) -> AgentRole {
        AgentRole::ALL
            .into_iter()
            .find(|r| r.spec().instructions == system)
            .expect("unknown role instructions")
    }

    /// Keyword-driven stand-in for the reasoning backend
    fn triage_backend(req: &CompletionRequest<'_>) -> crate::types::Result<String> {
        let answer = match role_of(req.system) {
            AgentRole::Underage => {
                let minor = req.user.contains("omg my mom");
                let (score, reason) = if minor {
                    (72, "teen slang")
                } else {
                    (4, "consistent with declared age")
                };
                json!({
                    "is_minor_suspected": minor,
                    "underage_misrepresentation_risk": score,
                    "reason": reason
                })
            }
            AgentRole::Content => {
                let posts: Vec<Value> = serde_json::from_str(req.user).unwrap();
                let per_post: Vec<Value> = posts
                    .iter()
                    .map(|p| {
                        let text = p["text"].as_str().unwrap();
                        let self_harm = if text.contains("end it all") { "high" } else { "none" };
                        json!({
                            "post_id": p["post_id"], "text": text,
                            "bullying_risk": "none", "self_harm_risk": self_harm,
                            "sexual_exploitation_risk": "none", "substance_abuse_risk": "none",
                            "notes": ""
                        })
                    })
                    .collect();
                let worst = if per_post.iter().any(|p| p["self_harm_risk"] == "high") {
                    "high"
                } else {
                    "none"
                };
                json!({
                    "per_post": per_post,
                    "overall": {
                        "bullying_risk": "none", "self_harm_risk": worst,
                        "sexual_exploitation_risk": "none", "substance_abuse_risk": "none",
                        "summary": ""
                    }
                })
            }
            AgentRole::Interaction => {
                let payload: Value = serde_json::from_str(req.user).unwrap();
                let flagged: Vec<&Value> = payload["interactions"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .filter(|i| {
                        let from = i["from_age"].as_i64().unwrap();
                        let to = i["to_age"].as_i64().unwrap();
                        from >= 18 && (0..18).contains(&to) && i["text"].as_str().unwrap().contains("secret")
                    })
                    .collect();
                let level = if flagged.is_empty() { "none" } else { "high" };
                let evidence: Vec<Value> = flagged
                    .iter()
                    .map(|i| {
                        json!({
                            "interaction_id": i["interaction_id"],
                            "text_snippet": i["text"],
                            "comment": "secrecy request from adult to minor"
                        })
                    })
                    .collect();
                json!({"grooming_risk": level, "evidence": evidence, "summary": ""})
            }
            AgentRole::Policy => {
                let payload: Value = serde_json::from_str(req.user).unwrap();
                let findings = &payload["findings"];
                let grooming = findings["interaction"]["grooming_risk"] == "high";
                let self_harm = findings["content"]["overall"]["self_harm_risk"] == "high";
                let (sections, severity, action) = match (grooming, self_harm) {
                    (true, _) => (vec!["2"], "critical", "escalate_to_safety_team"),
                    (false, true) => (vec!["1"], "high", "escalate_to_safety_team"),
                    _ => (vec![], "low", "monitor"),
                };
                json!({
                    "violated_sections": sections,
                    "overall_severity": severity,
                    "recommended_action": action,
                    "explanation": ""
                })
            }
            AgentRole::Report => {
                let payload: Value = serde_json::from_str(req.user).unwrap();
                let action = payload["policy_result"]["recommended_action"].as_str().unwrap_or("");
                let title = format!("Audit of {}", payload["user_profile"]["user_id"].as_str().unwrap());
                let score = if action == "monitor" { 5 } else { 85 };
                json!({
                    "risk_title": title,
                    "overall_risk_score": score,
                    "risk_summary": action,
                    "markdown_report": "## Summary"
                })
            }
        };
        Ok(answer.to_string())
    }

    fn pipeline(provider: &Arc<ScriptedProvider>, settings: AuditConfig) -> AuditPipeline {
        AuditPipeline::new(StructuredReasoningClient::new(provider.clone()), settings)
    }

    fn sequential() -> AuditConfig {
        AuditConfig {
            concurrent_detection: false,
            ..AuditConfig::default()
        }
    }

    #[tokio::test]
    async fn test_self_harm_post_raises_content_level() {
        let provider = Arc::new(ScriptedProvider::new(triage_backend));
        let users = vec![user("u1", 22)];
        let posts = vec![
            post("p1", "u1", "great hike today"),
            post("p2", "u1", "I can't do this anymore, I want to end it all tonight"),
        ];

        let outcome = pipeline(&provider, AuditConfig::default())
            .run(AuditRequest {
                user: &users[0],
                posts: &posts,
                interactions: &[],
                users: &users,
                policy_text: POLICIES,
            })
            .await
            .unwrap();

        let self_harm = outcome.content().overall_levels().self_harm;
        assert!(matches!(self_harm, RiskLevel::Medium | RiskLevel::High));
        assert_eq!(
            outcome.decision().recommended_action,
            Some(RecommendedAction::EscalateToSafetyTeam)
        );
        assert_eq!(outcome.decision().violated_sections, vec!["1"]);
    }

    #[tokio::test]
    async fn test_secret_request_from_adult_to_minor_is_grooming() {
        let provider = Arc::new(ScriptedProvider::new(triage_backend));
        let users = vec![user("adult", 30), user("kid", 14)];
        let interactions = vec![
            dm("i1", "adult", "kid", "you're so mature. keep this secret from your parents ok?"),
            dm("i2", "kid", "adult", "ok"),
        ];

        let outcome = pipeline(&provider, AuditConfig::default())
            .run(AuditRequest {
                user: &users[1],
                posts: &[],
                interactions: &interactions,
                users: &users,
                policy_text: POLICIES,
            })
            .await
            .unwrap();

        let interaction = outcome.interaction();
        assert!(matches!(
            interaction.grooming_risk,
            RiskLevel::Medium | RiskLevel::High | RiskLevel::Critical
        ));
        assert_eq!(interaction.evidence[0].interaction_id, "i1");
        assert_eq!(outcome.decision().overall_severity, RiskLevel::Critical);
        assert_eq!(outcome.safety_report().title, "Audit of kid");
    }

    #[tokio::test]
    async fn test_quiet_adult_is_monitor_only() {
        let provider = Arc::new(ScriptedProvider::new(triage_backend));
        let users = vec![user("u1", 25)];

        let outcome = pipeline(&provider, AuditConfig::default())
            .run(AuditRequest {
                user: &users[0],
                posts: &[],
                interactions: &[],
                users: &users,
                policy_text: POLICIES,
            })
            .await
            .unwrap();

        let underage = outcome.underage();
        assert!(!underage.is_minor_suspected);
        assert!(underage.misrepresentation_risk <= 20);
        assert!(
            outcome
                .content()
                .overall_levels()
                .levels()
                .iter()
                .all(|l| *l == RiskLevel::None)
        );
        assert!(matches!(
            outcome.decision().recommended_action,
            None | Some(RecommendedAction::Monitor)
        ));
        assert!(outcome.degraded_stages().is_empty());
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_any_call() {
        let provider = Arc::new(ScriptedProvider::unconfigured());
        let users = vec![user("u1", 25)];

        let err = pipeline(&provider, AuditConfig::default())
            .run(AuditRequest {
                user: &users[0],
                posts: &[],
                interactions: &[],
                users: &users,
                policy_text: POLICIES,
            })
            .await
            .unwrap_err();

        assert!(err.is_configuration());
        assert_eq!(err.stage(), None);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_answers_still_complete_with_full_shape() {
        let provider = Arc::new(ScriptedProvider::fixed("Sorry, I can't help with that."));
        let users = vec![user("u1", 25)];
        let posts = vec![post("p1", "u1", "hello")];

        let outcome = pipeline(&provider, AuditConfig::default())
            .run(AuditRequest {
                user: &users[0],
                posts: &posts,
                interactions: &[],
                users: &users,
                policy_text: POLICIES,
            })
            .await
            .unwrap();

        assert_eq!(provider.call_count(), 5);
        assert_eq!(outcome.degraded_stages(), AgentRole::ALL.to_vec());

        let value = serde_json::to_value(&outcome).unwrap();
        for key in ["underage", "content", "interaction", "policy", "report"] {
            assert_eq!(value[key], json!({}), "{} should be an empty finding", key);
        }
        assert_eq!(value["user_id"], "u1");

        let report = outcome.safety_report();
        assert_eq!(report, SafetyReport::default());
        assert_eq!(outcome.decision().recommended_action, None);
    }

    #[tokio::test]
    async fn test_unknown_interaction_party_gets_sentinel_age() {
        let provider = Arc::new(ScriptedProvider::new(triage_backend));
        let users = vec![user("kid", 14)];
        let interactions = vec![dm("i1", "deleted_account", "kid", "keep this secret")];

        let outcome = pipeline(&provider, sequential())
            .run(AuditRequest {
                user: &users[0],
                posts: &[],
                interactions: &interactions,
                users: &users,
                policy_text: POLICIES,
            })
            .await
            .unwrap();

        // unknown sender age is not an adult, so no grooming flag from the rule above
        assert_eq!(outcome.interaction().grooming_risk, RiskLevel::None);

        let interaction_call = provider
            .calls()
            .into_iter()
            .find(|c| role_of(&c.system) == AgentRole::Interaction)
            .unwrap();
        let payload: Value = serde_json::from_str(&interaction_call.user).unwrap();
        assert_eq!(payload["interactions"][0]["from_age"], -1);
        assert_eq!(payload["interactions"][0]["to_age"], 14);
    }

    #[tokio::test]
    async fn test_detection_agents_run_concurrently() {
        let provider = Arc::new(ScriptedProvider::fixed("{}"));
        let users = vec![user("u1", 25)];
        let request = AuditRequest {
            user: &users[0],
            posts: &[],
            interactions: &[],
            users: &users,
            policy_text: POLICIES,
        };

        pipeline(&provider, AuditConfig::default())
            .run(request)
            .await
            .unwrap();
        assert!(provider.max_in_flight() >= 2);

        let provider = Arc::new(ScriptedProvider::fixed("{}"));
        pipeline(&provider, sequential()).run(request).await.unwrap();
        assert_eq!(provider.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_policy_then_report_after_aggregation() {
        let provider = Arc::new(ScriptedProvider::new(triage_backend));
        let users = vec![user("adult", 30), user("kid", 14)];
        let interactions = vec![dm("i1", "adult", "kid", "our secret")];

        pipeline(&provider, AuditConfig::default())
            .run(AuditRequest {
                user: &users[1],
                posts: &[],
                interactions: &interactions,
                users: &users,
                policy_text: POLICIES,
            })
            .await
            .unwrap();

        let calls = provider.calls();
        let roles: Vec<AgentRole> = calls.iter().map(|c| role_of(&c.system)).collect();
        assert_eq!(roles.len(), 5);
        assert_eq!(&roles[3..], &[AgentRole::Policy, AgentRole::Report]);

        let policy_payload: Value = serde_json::from_str(&calls[3].user).unwrap();
        assert_eq!(policy_payload["policies"], POLICIES);
        assert_eq!(policy_payload["findings"]["interaction"]["grooming_risk"], "high");
        assert!(policy_payload["findings"]["underage"].is_object());
        assert!(policy_payload["findings"]["content"].is_object());

        let report_payload: Value = serde_json::from_str(&calls[4].user).unwrap();
        assert_eq!(
            report_payload["policy_result"]["recommended_action"],
            "escalate_to_safety_team"
        );
        assert_eq!(report_payload["interactions"]["grooming_risk"], "high");
    }

    #[tokio::test]
    async fn test_backend_failure_names_stage_and_stops() {
        let provider = Arc::new(ScriptedProvider::new(|req| {
            if role_of(req.system) == AgentRole::Policy {
                Err(AuditError::LlmApi("quota exceeded".to_string()))
            } else {
                Ok("{}".to_string())
            }
        }));
        let users = vec![user("u1", 25)];

        let err = pipeline(&provider, AuditConfig::default())
            .run(AuditRequest {
                user: &users[0],
                posts: &[],
                interactions: &[],
                users: &users,
                policy_text: POLICIES,
            })
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(AgentRole::Policy));
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(provider.call_count(), 4);
    }

    #[tokio::test]
    async fn test_budgets_are_applied_per_role() {
        let provider = Arc::new(ScriptedProvider::fixed("{}"));
        let users = vec![user("u1", 25)];
        let settings = AuditConfig {
            concurrent_detection: false,
            max_tokens: TokenBudgets {
                underage: 11,
                content: 22,
                interaction: 33,
                policy: 44,
                report: 55,
            },
        };

        pipeline(&provider, settings)
            .run(AuditRequest {
                user: &users[0],
                posts: &[],
                interactions: &[],
                users: &users,
                policy_text: POLICIES,
            })
            .await
            .unwrap();

        let budgets: Vec<u32> = provider.calls().iter().map(|c| c.max_output_tokens).collect();
        assert_eq!(budgets, vec![11, 22, 33, 44, 55]);
    }
}
