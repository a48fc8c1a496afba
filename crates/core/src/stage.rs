//! Project stages and the workflow actions that move between them.
//!
//! Stages form a strict forward-only sequence:
//!
//! ```text
//! idea -> validated -> domain_selected -> brand_kit_generated -> website_generated
//! ```
//!
//! Every committing action names exactly one stage it requires and at most
//! one stage it advances to. The table lives in [`WorkflowAction::required_stage`]
//! and [`WorkflowAction::target_stage`]; everything else derives from it.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Position of a project in the idea-to-website pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idea,
    Validated,
    DomainSelected,
    BrandKitGenerated,
    WebsiteGenerated,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Stage; 5] = [
        Stage::Idea,
        Stage::Validated,
        Stage::DomainSelected,
        Stage::BrandKitGenerated,
        Stage::WebsiteGenerated,
    ];

    /// Parse a stage string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "idea" => Ok(Self::Idea),
            "validated" => Ok(Self::Validated),
            "domain_selected" => Ok(Self::DomainSelected),
            "brand_kit_generated" => Ok(Self::BrandKitGenerated),
            "website_generated" => Ok(Self::WebsiteGenerated),
            _ => Err(CoreError::Validation(format!(
                "Invalid project stage '{s}'. Must be one of: idea, validated, \
                 domain_selected, brand_kit_generated, website_generated"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::Validated => "validated",
            Self::DomainSelected => "domain_selected",
            Self::BrandKitGenerated => "brand_kit_generated",
            Self::WebsiteGenerated => "website_generated",
        }
    }

    /// Zero-based position in the pipeline.
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Idea => 0,
            Self::Validated => 1,
            Self::DomainSelected => 2,
            Self::BrandKitGenerated => 3,
            Self::WebsiteGenerated => 4,
        }
    }

    /// The stage immediately after this one, if any.
    pub fn next(self) -> Option<Stage> {
        match self {
            Self::Idea => Some(Self::Validated),
            Self::Validated => Some(Self::DomainSelected),
            Self::DomainSelected => Some(Self::BrandKitGenerated),
            Self::BrandKitGenerated => Some(Self::WebsiteGenerated),
            Self::WebsiteGenerated => None,
        }
    }

    /// Whether this is the final stage.
    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a stage change.
///
/// A change is valid only if `to` is exactly one step after `from`. Staying
/// put, skipping ahead, and moving backwards are all rejected.
pub fn validate_stage_transition(from: Stage, to: Stage) -> Result<(), CoreError> {
    if from.next() != Some(to) {
        return Err(CoreError::Validation(format!(
            "Cannot move a project from stage '{from}' to '{to}'. \
             Stages advance exactly one step at a time."
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Workflow actions
// ---------------------------------------------------------------------------

/// The named actions a client may invoke against a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    Validate,
    OverrideVerdict,
    RecordAnswer,
    SelectDomain,
    GenerateBrandKit,
    GenerateWebsite,
}

impl WorkflowAction {
    /// All actions, in the order a project normally encounters them.
    pub const ALL: [WorkflowAction; 6] = [
        WorkflowAction::Validate,
        WorkflowAction::OverrideVerdict,
        WorkflowAction::RecordAnswer,
        WorkflowAction::SelectDomain,
        WorkflowAction::GenerateBrandKit,
        WorkflowAction::GenerateWebsite,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::OverrideVerdict => "override_verdict",
            Self::RecordAnswer => "record_answer",
            Self::SelectDomain => "select_domain",
            Self::GenerateBrandKit => "generate_brand_kit",
            Self::GenerateWebsite => "generate_website",
        }
    }

    /// The stage a project must be in for this action to run.
    pub fn required_stage(self) -> Stage {
        match self {
            Self::Validate => Stage::Idea,
            Self::OverrideVerdict | Self::RecordAnswer | Self::SelectDomain => Stage::Validated,
            Self::GenerateBrandKit => Stage::DomainSelected,
            Self::GenerateWebsite => Stage::BrandKitGenerated,
        }
    }

    /// The stage this action advances to, or `None` if the stage is unchanged.
    pub fn target_stage(self) -> Option<Stage> {
        match self {
            Self::Validate => Some(Stage::Validated),
            Self::OverrideVerdict | Self::RecordAnswer => None,
            Self::SelectDomain => Some(Stage::DomainSelected),
            Self::GenerateBrandKit => Some(Stage::BrandKitGenerated),
            Self::GenerateWebsite => Some(Stage::WebsiteGenerated),
        }
    }

    /// Whether the action advances the stage.
    pub fn advances_stage(self) -> bool {
        self.target_stage().is_some()
    }
}

impl std::fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
