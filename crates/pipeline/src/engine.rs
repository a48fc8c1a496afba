//! The workflow engine.
//!
//! Every action follows the same shape: load the project fresh from the
//! store, check the action against [`rules::check`], run the generators
//! (each under a timeout), then hand the artifact and the stage change to
//! [`WorkflowStore::commit_transition`], which re-checks the stage under a
//! lock. Nothing is written until all generator output is in hand.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use bob_core::artifacts::{
    to_payload, ArtifactKind, BrandKitData, CrossQaData, LogoRef, ValidationReportData,
    WebsiteData,
};
use bob_core::coach::{validate_message, ChatRole, ChatTurn, DEFAULT_HISTORY_LIMIT};
use bob_core::domain_names::{validate_domain_choice, DomainCandidate, NamingMode};
use bob_core::error::CoreError;
use bob_core::generators::{
    clean_site_markup, research_query, CardInput, CoachInput, GeneratorError, GeneratorResult,
    ResearchContext, SiteInput,
};
use bob_core::rules;
use bob_core::stage::{validate_stage_transition, Stage, WorkflowAction};
use bob_core::types::DbId;
use bob_db::models::artifact::{Artifact, NewArtifact};
use bob_db::models::chat_message::{ChatMessage, CreateChatMessage};
use bob_db::models::offer::{OFFER_KIND_DOMAIN, OFFER_KIND_LOGO};
use bob_db::models::project::{CreateProject, Project, StageTransition, TransitionOutcome};

use crate::credentials::CredentialResolver;
use crate::generators::Generators;
use crate::store::{StoreError, WorkflowStore};
use crate::view::{ProjectContext, ProjectView};

/// Default upper bound on a single generator call.
pub const DEFAULT_GENERATOR_TIMEOUT: Duration = Duration::from_secs(180);

/// Stem of a rendered business card's file name in the project's asset area.
pub const BUSINESS_CARD_STEM: &str = "business-card";

/// Stem of a packaged site's file name in the project's asset area.
pub const WEBSITE_ARCHIVE_STEM: &str = "website";

/// Engine settings.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub generator_timeout: Duration,
    /// Only accept domain names from the most recent candidate batch.
    pub require_offered_domain: bool,
    /// Number of prior coach messages sent as history.
    pub coach_history_limit: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            generator_timeout: DEFAULT_GENERATOR_TIMEOUT,
            require_offered_domain: false,
            coach_history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Intake fields for a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub pitch: String,
    pub problem: Option<String>,
    pub target_user: Option<String>,
    pub channels: Option<String>,
    pub monetization: Option<String>,
}

/// Result of a domain-candidate query.
///
/// An empty `candidates` list is a valid outcome, not a failure. When the
/// normal pass finds nothing, `retry_mode` suggests the creative pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainCandidates {
    pub candidates: Vec<DomainCandidate>,
    pub mode: NamingMode,
    pub retry_mode: Option<NamingMode>,
}

/// Runs workflow actions for authenticated callers.
#[derive(Clone)]
pub struct Workflow {
    store: Arc<dyn WorkflowStore>,
    generators: Generators,
    credentials: CredentialResolver,
    config: WorkflowConfig,
}

impl Workflow {
    pub fn new(
        store: Arc<dyn WorkflowStore>,
        generators: Generators,
        credentials: CredentialResolver,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            store,
            generators,
            credentials,
            config,
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn credentials(&self) -> &CredentialResolver {
        &self.credentials
    }

    // -----------------------------------------------------------------------
    // Intake and reads
    // -----------------------------------------------------------------------

    pub async fn create_project(&self, owner_id: DbId, input: NewProject) -> Result<Project, CoreError> {
        let title = required_field("title", &input.title)?;
        let pitch = required_field("pitch", &input.pitch)?;
        let create = CreateProject {
            title,
            pitch,
            problem: optional_field(input.problem),
            target_user: optional_field(input.target_user),
            channels: optional_field(input.channels),
            monetization: optional_field(input.monetization),
        };

        let project = self
            .store
            .create_project(owner_id, &create)
            .await
            .map_err(|e| persistence("create project", e))?;
        tracing::info!(project_id = project.id, user_id = owner_id, "Project created");
        Ok(project)
    }

    pub async fn list_projects(&self, owner_id: DbId) -> Result<Vec<Project>, CoreError> {
        self.store
            .list_projects(owner_id)
            .await
            .map_err(|e| persistence("list projects", e))
    }

    pub async fn project_view(&self, owner_id: DbId, project_id: DbId) -> Result<ProjectView, CoreError> {
        Ok(self.load(owner_id, project_id).await?.into_view())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Research and assess the idea, then move `idea -> validated`.
    pub async fn validate(&self, owner_id: DbId, project_id: DbId) -> Result<ValidationReportData, CoreError> {
        let action = WorkflowAction::Validate;
        let ctx = self.load(owner_id, project_id).await?;
        rules::check(action, &ctx.gate())?;

        let credentials = self.credentials.resolve(owner_id).await?;
        let brief = ctx.brief();

        let query = research_query(&brief);
        let research = match self
            .run(
                action.as_str(),
                self.generators.researcher.research(&credentials, &query),
            )
            .await
        {
            Ok(research) => research,
            Err(e) => {
                tracing::warn!(project_id, error = %e, "Research unavailable, validating without it");
                ResearchContext::default()
            }
        };

        let report = self
            .run(
                action.as_str(),
                self.generators.validator.assess(&credentials, &brief, &research),
            )
            .await?;
        report
            .validate()
            .map_err(|e| malformed_output(action.as_str(), e))?;

        let transition = StageTransition {
            artifact: Some(new_artifact(ArtifactKind::ValidationReport, &report)?),
            ..advance(&ctx, action)?
        };
        self.commit(action, owner_id, project_id, transition).await?;

        tracing::info!(
            project_id,
            score = report.score,
            verdict = ?report.verdict,
            "Idea validated"
        );
        Ok(report)
    }

    /// Accept a `Bounce` verdict anyway. The stage does not change.
    pub async fn override_verdict(&self, owner_id: DbId, project_id: DbId) -> Result<Project, CoreError> {
        let action = WorkflowAction::OverrideVerdict;
        let ctx = self.load(owner_id, project_id).await?;
        rules::check(action, &ctx.gate())?;

        let transition = StageTransition {
            expect_overridden: Some(false),
            set_verdict_overridden: Some(true),
            ..StageTransition::expecting(ctx.stage.as_str())
        };
        let (project, _) = self.commit(action, owner_id, project_id, transition).await?;
        tracing::info!(project_id, user_id = owner_id, "Verdict overridden");
        Ok(project)
    }

    // -----------------------------------------------------------------------
    // Guided questions
    // -----------------------------------------------------------------------

    pub async fn record_answer(
        &self,
        owner_id: DbId,
        project_id: DbId,
        question: &str,
        answer: &str,
    ) -> Result<CrossQaData, CoreError> {
        let action = WorkflowAction::RecordAnswer;
        let ctx = self.load(owner_id, project_id).await?;
        let entry =
            CrossQaData::new(question, answer).map_err(|e| invalid_input(action.as_str(), e))?;
        rules::check(action, &ctx.gate())?;

        let transition = StageTransition {
            artifact: Some(new_artifact(ArtifactKind::CrossQa, &entry)?),
            ..StageTransition::expecting(ctx.stage.as_str())
        };
        self.commit(action, owner_id, project_id, transition).await?;
        tracing::debug!(project_id, answers = ctx.answers.len() + 1, "Answer recorded");
        Ok(entry)
    }

    // -----------------------------------------------------------------------
    // Domains
    // -----------------------------------------------------------------------

    /// Generate name candidates and return those available under at least
    /// one TLD. Does not change the project.
    pub async fn domain_candidates(
        &self,
        owner_id: DbId,
        project_id: DbId,
        mode: NamingMode,
    ) -> Result<DomainCandidates, CoreError> {
        const ACTION: &str = "domain_candidates";
        let ctx = self.load(owner_id, project_id).await?;
        let credentials = self.credentials.resolve(owner_id).await?;

        let all = self
            .run(
                ACTION,
                self.generators.domains.candidates(&credentials, &ctx.brief(), mode),
            )
            .await?;
        let candidates: Vec<_> = all.into_iter().filter(|c| c.availability.any()).collect();

        let names: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();
        self.store
            .replace_offers(project_id, OFFER_KIND_DOMAIN, &names)
            .await
            .map_err(|e| persistence(ACTION, e))?;

        let retry_mode = if candidates.is_empty() && mode == NamingMode::Normal {
            tracing::warn!(project_id, "No available domain names, creative pass suggested");
            Some(NamingMode::Creative)
        } else {
            None
        };

        Ok(DomainCandidates {
            candidates,
            mode,
            retry_mode,
        })
    }

    /// Choose the project's domain name: `validated -> domain_selected`.
    pub async fn select_domain(
        &self,
        owner_id: DbId,
        project_id: DbId,
        domain_name: &str,
    ) -> Result<Project, CoreError> {
        let action = WorkflowAction::SelectDomain;
        let ctx = self.load(owner_id, project_id).await?;
        let name =
            validate_domain_choice(domain_name).map_err(|e| invalid_input(action.as_str(), e))?;
        rules::check(action, &ctx.gate())?;

        if self.config.require_offered_domain {
            let offered = self
                .store
                .list_offers(project_id, OFFER_KIND_DOMAIN)
                .await
                .map_err(|e| persistence(action.as_str(), e))?;
            if !offered.contains(&name) {
                return Err(CoreError::InvalidInput {
                    action: action.as_str(),
                    message: format!("'{name}' was not among the most recently offered domain names"),
                });
            }
        }

        let transition = StageTransition {
            selected_domain_name: Some(name.clone()),
            ..advance(&ctx, action)?
        };
        let (project, _) = self.commit(action, owner_id, project_id, transition).await?;
        tracing::info!(project_id, domain = %name, "Domain selected");
        Ok(project)
    }

    // -----------------------------------------------------------------------
    // Brand kit
    // -----------------------------------------------------------------------

    /// Generate logo options. Does not change the project.
    pub async fn logo_options(&self, owner_id: DbId, project_id: DbId) -> Result<Vec<LogoRef>, CoreError> {
        const ACTION: &str = "logo_options";
        let ctx = self.load(owner_id, project_id).await?;
        let credentials = self.credentials.resolve(owner_id).await?;

        let logos = self
            .run(
                ACTION,
                self.generators.logos.logo_options(&credentials, &ctx.brief()),
            )
            .await?;
        if logos.is_empty() {
            return Err(CoreError::Generator {
                action: ACTION,
                message: "no logo options were produced".to_string(),
            });
        }

        let refs: Vec<String> = logos.iter().map(|l| l.as_str().to_string()).collect();
        self.store
            .replace_offers(project_id, OFFER_KIND_LOGO, &refs)
            .await
            .map_err(|e| persistence(ACTION, e))?;
        Ok(logos)
    }

    /// Build the brand kit around a chosen logo:
    /// `domain_selected -> brand_kit_generated`.
    ///
    /// A business card that fails to render does not fail the action; the
    /// kit is committed without one and [`attach_business_card`](Self::attach_business_card)
    /// can fill it in later.
    pub async fn generate_brand_kit(
        &self,
        owner_id: DbId,
        project_id: DbId,
        logo: &str,
    ) -> Result<BrandKitData, CoreError> {
        let action = WorkflowAction::GenerateBrandKit;
        let ctx = self.load(owner_id, project_id).await?;
        let logo_ref = LogoRef::new(logo).map_err(|e| invalid_input(action.as_str(), e))?;
        rules::check(action, &ctx.gate())?;

        let offered = self
            .store
            .list_offers(project_id, OFFER_KIND_LOGO)
            .await
            .map_err(|e| persistence(action.as_str(), e))?;
        if !offered.is_empty() && !offered.iter().any(|o| o == logo_ref.as_str()) {
            return Err(CoreError::InvalidInput {
                action: action.as_str(),
                message: "The chosen logo was not among the most recently offered options".to_string(),
            });
        }

        let credentials = self.credentials.resolve(owner_id).await?;
        let brand = self
            .run(
                action.as_str(),
                self.generators.brand.brand_data(&credentials, &logo_ref),
            )
            .await?;
        brand
            .validate()
            .map_err(|e| malformed_output(action.as_str(), e))?;

        let mut kit = BrandKitData {
            palette: brand.palette,
            fonts: brand.fonts,
            logo_ref,
            business_card_ref: None,
        };

        match self.render_business_card(owner_id, &ctx, &kit).await {
            Ok(card_ref) => kit.business_card_ref = Some(card_ref),
            Err(e) => {
                tracing::warn!(project_id, error = %e, "Business card unavailable, committing kit without it");
            }
        }

        let committed = async {
            let transition = StageTransition {
                artifact: Some(new_artifact(ArtifactKind::BrandKit, &kit)?),
                ..advance(&ctx, action)?
            };
            self.commit(action, owner_id, project_id, transition).await
        }
        .await;
        if let Err(e) = committed {
            if let Some(card_ref) = &kit.business_card_ref {
                self.discard_file(project_id, card_ref).await;
            }
            return Err(e);
        }
        tracing::info!(project_id, has_card = kit.business_card_ref.is_some(), "Brand kit generated");
        Ok(kit)
    }

    /// Render the business card for a kit that was committed without one.
    /// A kit that already has a card is returned unchanged.
    pub async fn attach_business_card(&self, owner_id: DbId, project_id: DbId) -> Result<BrandKitData, CoreError> {
        const ACTION: &str = "attach_business_card";
        let ctx = self.load(owner_id, project_id).await?;
        let Some((artifact_id, kit)) = ctx.brand_kit.clone() else {
            return Err(CoreError::Conflict(
                "This project has no brand kit yet; generate one first".to_string(),
            ));
        };
        if kit.business_card_ref.is_some() {
            return Ok(kit);
        }

        let card_ref = self.render_business_card(owner_id, &ctx, &kit).await?;
        let updated = BrandKitData {
            business_card_ref: Some(card_ref),
            ..kit
        };
        let saved = async {
            let payload = to_payload(&updated)?;
            self.store
                .update_artifact_payload(artifact_id, &payload)
                .await
                .map_err(|e| persistence(ACTION, e))?
                .ok_or(CoreError::NotFound {
                    entity: "BrandKit",
                    id: artifact_id,
                })
        }
        .await;
        if let Err(e) = saved {
            if let Some(card_ref) = &updated.business_card_ref {
                self.discard_file(project_id, card_ref).await;
            }
            return Err(e);
        }

        tracing::info!(project_id, "Business card attached to brand kit");
        Ok(updated)
    }

    async fn render_business_card(
        &self,
        owner_id: DbId,
        ctx: &ProjectContext,
        kit: &BrandKitData,
    ) -> Result<String, CoreError> {
        const ACTION: &str = "render_business_card";
        let user = self
            .store
            .find_user(owner_id)
            .await
            .map_err(|e| persistence(ACTION, e))?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: owner_id,
            })?;

        let input = CardInput {
            palette: kit.palette.clone(),
            fonts: kit.fonts.clone(),
            logo_ref: kit.logo_ref.clone(),
            display_name: user.display_name(),
            email: user.email.clone(),
            domain_name: ctx.project.selected_domain_name.clone().unwrap_or_default(),
        };
        let bytes = self
            .run(ACTION, self.generators.cards.render_card(&input))
            .await?;
        self.run(
            ACTION,
            self.generators
                .assets
                .store_file(ctx.project.id, &attempt_file_name(BUSINESS_CARD_STEM, "pdf"), bytes),
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Website
    // -----------------------------------------------------------------------

    /// Generate and package the site: `brand_kit_generated -> website_generated`.
    pub async fn generate_website(&self, owner_id: DbId, project_id: DbId) -> Result<WebsiteData, CoreError> {
        let action = WorkflowAction::GenerateWebsite;
        let ctx = self.load(owner_id, project_id).await?;
        rules::check(action, &ctx.gate())?;

        let Some((_, brand_kit)) = ctx.brand_kit.clone() else {
            return Err(CoreError::Internal(format!(
                "Project {project_id} is at stage '{}' without a brand kit",
                ctx.stage
            )));
        };

        let credentials = self.credentials.resolve(owner_id).await?;
        let brief = ctx.brief();

        let images = match self
            .run(
                action.as_str(),
                self.generators.images.images(&credentials, &brief),
            )
            .await
        {
            Ok(images) => images,
            Err(e) => {
                tracing::warn!(project_id, error = %e, "No stock images, generating site without them");
                Vec::new()
            }
        };

        let logo_ref = brand_kit.logo_ref.clone();
        let mut input = SiteInput {
            brief,
            domain_name: ctx.project.selected_domain_name.clone(),
            brand_kit,
            transcript: ctx.answers.clone(),
            hero_image: None,
            feature_images: Vec::new(),
        };
        input.assign_images(images);

        let raw = self
            .run(
                action.as_str(),
                self.generators.sites.site_markup(&credentials, &input),
            )
            .await?;
        let markup = clean_site_markup(&raw).map_err(|e| generator_failure(action.as_str(), e))?;

        let archive_ref = self
            .run(
                action.as_str(),
                self.generators.packager.package_site(
                    project_id,
                    &attempt_file_name(WEBSITE_ARCHIVE_STEM, "zip"),
                    &markup,
                ),
            )
            .await?;

        let website = WebsiteData {
            archive_ref,
            logo_ref,
        };
        let committed = async {
            let transition = StageTransition {
                artifact: Some(new_artifact(ArtifactKind::Website, &website)?),
                ..advance(&ctx, action)?
            };
            self.commit(action, owner_id, project_id, transition).await
        }
        .await;
        if let Err(e) = committed {
            self.discard_file(project_id, &website.archive_ref).await;
            return Err(e);
        }
        tracing::info!(project_id, archive = %website.archive_ref, "Website generated");
        Ok(website)
    }

    // -----------------------------------------------------------------------
    // Coach
    // -----------------------------------------------------------------------

    /// Log the caller's message, ask the coach, and log its reply.
    ///
    /// Available at every stage. If the coach fails, the user's message
    /// stays in the log.
    pub async fn send_coach_message(
        &self,
        owner_id: DbId,
        project_id: DbId,
        message: &str,
    ) -> Result<ChatMessage, CoreError> {
        const ACTION: &str = "coach_reply";
        let ctx = self.load(owner_id, project_id).await?;
        let message = validate_message(message).map_err(|e| invalid_input(ACTION, e))?;

        let history = self
            .store
            .recent_chat_messages(project_id, owner_id, self.config.coach_history_limit)
            .await
            .map_err(|e| persistence(ACTION, e))?
            .into_iter()
            .filter_map(|m| {
                ChatRole::from_str_db(&m.role)
                    .ok()
                    .map(|role| ChatTurn {
                        role,
                        content: m.content,
                    })
            })
            .collect();

        self.append_chat(project_id, owner_id, ChatRole::User, &message, ACTION)
            .await?;

        let project_context = serde_json::to_value(ctx.into_view())
            .map_err(|e| CoreError::Internal(format!("Failed to encode project context: {e}")))?;
        let input = CoachInput {
            project_context,
            history,
            message,
        };

        let credentials = self.credentials.resolve(owner_id).await?;
        let reply = self
            .run(ACTION, self.generators.coach.reply(&credentials, &input))
            .await?;

        self.append_chat(project_id, owner_id, ChatRole::Assistant, &reply, ACTION)
            .await
    }

    pub async fn chat_history(&self, owner_id: DbId, project_id: DbId) -> Result<Vec<ChatMessage>, CoreError> {
        self.owned_project(owner_id, project_id).await?;
        self.store
            .chat_messages(project_id, owner_id)
            .await
            .map_err(|e| persistence("chat_history", e))
    }

    async fn append_chat(
        &self,
        project_id: DbId,
        user_id: DbId,
        role: ChatRole,
        content: &str,
        action: &'static str,
    ) -> Result<ChatMessage, CoreError> {
        self.store
            .append_chat_message(&CreateChatMessage {
                project_id,
                user_id,
                role: role.as_str().to_string(),
                content: content.to_string(),
            })
            .await
            .map_err(|e| persistence(action, e))
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn owned_project(&self, owner_id: DbId, project_id: DbId) -> Result<Project, CoreError> {
        self.store
            .find_project(project_id, owner_id)
            .await
            .map_err(|e| persistence("load project", e))?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            })
    }

    /// Read the project and its artifacts from the store.
    async fn load(&self, owner_id: DbId, project_id: DbId) -> Result<ProjectContext, CoreError> {
        let project = self.owned_project(owner_id, project_id).await?;
        self.assemble(project).await
    }

    async fn assemble(&self, project: Project) -> Result<ProjectContext, CoreError> {
        let artifacts = self
            .store
            .project_artifacts(project.id)
            .await
            .map_err(|e| persistence("load project", e))?;
        ProjectContext::assemble(project, artifacts)
    }

    /// Remove a file written by an attempt that did not commit. Failure is
    /// logged and otherwise ignored; the caller's own error wins.
    async fn discard_file(&self, project_id: DbId, reference: &str) {
        let removed = self
            .run("discard_file", self.generators.assets.remove_file(reference))
            .await;
        match removed {
            Ok(()) => tracing::debug!(project_id, reference, "Discarded uncommitted file"),
            Err(e) => {
                tracing::warn!(project_id, reference, error = %e, "Failed to discard uncommitted file")
            }
        }
    }

    /// Await a generator call under the configured timeout.
    async fn run<T>(
        &self,
        action: &'static str,
        call: impl Future<Output = GeneratorResult<T>>,
    ) -> Result<T, CoreError> {
        let timeout = self.config.generator_timeout;
        match tokio::time::timeout(timeout, call).await {
            Ok(result) => result.map_err(|e| generator_failure(action, e)),
            Err(_) => Err(generator_failure(
                action,
                GeneratorError::TimedOut(timeout.as_secs()),
            )),
        }
    }

    /// Commit a transition, turning a lost race into a precondition error
    /// computed from the state that won.
    async fn commit(
        &self,
        action: WorkflowAction,
        owner_id: DbId,
        project_id: DbId,
        transition: StageTransition,
    ) -> Result<(Project, Option<Artifact>), CoreError> {
        let outcome = self
            .store
            .commit_transition(project_id, &transition)
            .await
            .map_err(|e| persistence(action.as_str(), e))?;

        match outcome {
            TransitionOutcome::Committed { project, artifact } => {
                if let Some(next) = &transition.next_stage {
                    tracing::info!(
                        project_id,
                        user_id = owner_id,
                        action = action.as_str(),
                        from = %transition.expect_stage,
                        to = %next,
                        "Stage advanced"
                    );
                }
                Ok((project, artifact))
            }
            TransitionOutcome::Rejected { current } => {
                let ctx = self.assemble(current).await?;
                let gate = ctx.gate();
                rules::check(action, &gate)?;
                Err(CoreError::PreconditionViolation {
                    action,
                    stage: gate.stage,
                    message: "the project changed while this action was running".to_string(),
                    next_action: rules::next_action(&gate),
                })
            }
            TransitionOutcome::Missing => Err(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            }),
        }
    }
}

/// A transition moving `ctx` one stage forward for `action`.
fn advance(ctx: &ProjectContext, action: WorkflowAction) -> Result<StageTransition, CoreError> {
    let next: Stage = action.target_stage().ok_or_else(|| {
        CoreError::Internal(format!("{action} does not advance the stage"))
    })?;
    validate_stage_transition(ctx.stage, next)?;
    Ok(StageTransition {
        next_stage: Some(next.as_str().to_string()),
        ..StageTransition::expecting(ctx.stage.as_str())
    })
}

/// A file name no other attempt will use, so a losing attempt never
/// overwrites what the winner committed.
fn attempt_file_name(stem: &str, extension: &str) -> String {
    format!("{stem}-{:016x}.{extension}", rand::random::<u64>())
}

fn new_artifact<T: Serialize>(kind: ArtifactKind, payload: &T) -> Result<NewArtifact, CoreError> {
    Ok(NewArtifact {
        kind: kind.as_str().to_string(),
        payload: to_payload(payload)?,
    })
}

fn required_field(name: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("Project {name} is required")));
    }
    Ok(trimmed.to_string())
}

fn optional_field(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Tie a rejected input to the action it was meant for.
fn invalid_input(action: &'static str, err: CoreError) -> CoreError {
    match err {
        CoreError::Validation(message) => CoreError::InvalidInput { action, message },
        other => other,
    }
}

fn generator_failure(action: &'static str, err: GeneratorError) -> CoreError {
    CoreError::Generator {
        action,
        message: err.to_string(),
    }
}

fn malformed_output(action: &'static str, err: CoreError) -> CoreError {
    let message = match err {
        CoreError::Validation(msg) => msg,
        other => other.to_string(),
    };
    generator_failure(action, GeneratorError::Malformed(message))
}

fn persistence(action: &'static str, err: StoreError) -> CoreError {
    CoreError::Persistence {
        action,
        message: err.to_string(),
    }
}
