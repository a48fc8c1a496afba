//! Typed snapshot of a project and its artifacts.

use serde::Serialize;

use bob_core::artifacts::{
    from_payload, ArtifactKind, BrandKitData, CrossQaData, ValidationReportData, WebsiteData,
};
use bob_core::error::CoreError;
use bob_core::generators::IdeaBrief;
use bob_core::questions::{next_question, REQUIRED_ANSWER_COUNT};
use bob_core::rules::{legal_actions, next_action, GateState};
use bob_core::stage::{Stage, WorkflowAction};
use bob_core::types::DbId;
use bob_db::models::artifact::Artifact;
use bob_db::models::project::Project;

/// A project with its artifacts decoded.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub project: Project,
    pub stage: Stage,
    pub report: Option<ValidationReportData>,
    pub answers: Vec<CrossQaData>,
    /// The brand kit and the id of the artifact row holding it.
    pub brand_kit: Option<(DbId, BrandKitData)>,
    pub website: Option<WebsiteData>,
}

impl ProjectContext {
    /// Decode a project row and its artifacts (in insertion order).
    pub fn assemble(project: Project, artifacts: Vec<Artifact>) -> Result<Self, CoreError> {
        let stage = Stage::from_str_db(&project.stage).map_err(|_| {
            CoreError::Internal(format!(
                "Project {} has unknown stage '{}'",
                project.id, project.stage
            ))
        })?;

        let mut ctx = Self {
            project,
            stage,
            report: None,
            answers: Vec::new(),
            brand_kit: None,
            website: None,
        };

        for artifact in artifacts {
            let kind = ArtifactKind::from_str_db(&artifact.kind)
                .map_err(|e| CoreError::Internal(e.to_string()))?;
            match kind {
                ArtifactKind::ValidationReport => {
                    ctx.report = Some(from_payload(kind, &artifact.payload)?);
                }
                ArtifactKind::CrossQa => ctx.answers.push(from_payload(kind, &artifact.payload)?),
                ArtifactKind::BrandKit => {
                    ctx.brand_kit = Some((artifact.id, from_payload(kind, &artifact.payload)?));
                }
                ArtifactKind::Website => ctx.website = Some(from_payload(kind, &artifact.payload)?),
            }
        }

        Ok(ctx)
    }

    pub fn gate(&self) -> GateState {
        GateState {
            stage: self.stage,
            verdict: self.report.as_ref().map(|r| r.verdict),
            verdict_overridden: self.project.verdict_overridden,
            answer_count: self.answers.len(),
        }
    }

    pub fn brief(&self) -> IdeaBrief {
        IdeaBrief {
            title: self.project.title.clone(),
            pitch: self.project.pitch.clone(),
            problem: self.project.problem.clone(),
            target_user: self.project.target_user.clone(),
        }
    }

    pub fn into_view(self) -> ProjectView {
        let gate = self.gate();
        ProjectView {
            next_question: if self.stage == Stage::Validated && gate.verdict_accepted() {
                next_question(self.answers.len())
            } else {
                None
            },
            next_action: next_action(&gate),
            legal_actions: legal_actions(&gate),
            answers_required: REQUIRED_ANSWER_COUNT,
            project: self.project,
            validation_report: self.report,
            cross_qa: self.answers,
            brand_kit: self.brand_kit.map(|(_, kit)| kit),
            website: self.website,
        }
    }
}

/// Full project view returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub validation_report: Option<ValidationReportData>,
    pub cross_qa: Vec<CrossQaData>,
    pub brand_kit: Option<BrandKitData>,
    pub website: Option<WebsiteData>,
    pub answers_required: usize,
    pub next_question: Option<&'static str>,
    pub next_action: Option<WorkflowAction>,
    /// Every action that is legal right now.
    #[serde(rename = "next_actions")]
    pub legal_actions: Vec<WorkflowAction>,
}

#[cfg(test)]
mod tests {
    use bob_core::artifacts::{to_payload, ScoreBreakdown, Verdict};
    use chrono::Utc;

    use super::*;

    fn project(stage: &str) -> Project {
        Project {
            id: 1,
            owner_id: 1,
            title: "Acme".into(),
            pitch: "widgets".into(),
            problem: None,
            target_user: None,
            channels: None,
            monetization: None,
            stage: stage.into(),
            verdict_overridden: false,
            selected_domain_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn artifact(id: DbId, kind: ArtifactKind, payload: serde_json::Value) -> Artifact {
        Artifact {
            id,
            project_id: 1,
            kind: kind.as_str().into(),
            payload,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn report(verdict: Verdict) -> ValidationReportData {
        ValidationReportData {
            score: 70,
            verdict,
            breakdown: ScoreBreakdown::default(),
            risks: vec![],
            summary: "ok".into(),
            sources: vec![],
        }
    }

    #[test]
    fn answers_keep_insertion_order() {
        let artifacts = vec![
            artifact(1, ArtifactKind::ValidationReport, to_payload(&report(Verdict::Build)).unwrap()),
            artifact(2, ArtifactKind::CrossQa, to_payload(&CrossQaData::new("q1", "a1").unwrap()).unwrap()),
            artifact(3, ArtifactKind::CrossQa, to_payload(&CrossQaData::new("q2", "a2").unwrap()).unwrap()),
        ];
        let ctx = ProjectContext::assemble(project("validated"), artifacts).unwrap();
        let questions: Vec<_> = ctx.answers.iter().map(|a| a.question.as_str()).collect();
        assert_eq!(questions, vec!["q1", "q2"]);

        let view = ctx.into_view();
        assert_eq!(view.next_action, Some(WorkflowAction::RecordAnswer));
        assert_eq!(view.next_question, next_question(2));
    }

    #[test]
    fn bounce_hides_next_question() {
        let artifacts = vec![artifact(
            1,
            ArtifactKind::ValidationReport,
            to_payload(&report(Verdict::Bounce)).unwrap(),
        )];
        let view = ProjectContext::assemble(project("validated"), artifacts)
            .unwrap()
            .into_view();
        assert_eq!(view.next_question, None);
        assert_eq!(view.legal_actions, vec![WorkflowAction::OverrideVerdict]);
    }

    #[test]
    fn unknown_stage_is_internal_error() {
        let err = ProjectContext::assemble(project("launched"), vec![]).unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
    }

    #[test]
    fn view_serializes_project_fields_flat() {
        let view = ProjectContext::assemble(project("idea"), vec![]).unwrap().into_view();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["stage"], "idea");
        assert_eq!(json["title"], "Acme");
        assert_eq!(json["next_action"], "validate");
        assert_eq!(json["answers_required"], 5);
        assert_eq!(json["next_actions"], serde_json::json!(["validate"]));
    }
}
