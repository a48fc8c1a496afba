//! Artifact payload types.
//!
//! The store keeps every artifact as an opaque JSON payload tagged with an
//! [`ArtifactKind`]. These types are the typed view of those payloads, plus
//! the structural checks applied to generator output before it is committed.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Artifact kinds
// ---------------------------------------------------------------------------

/// The kinds of artifact a project can own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    ValidationReport,
    CrossQa,
    BrandKit,
    Website,
}

impl ArtifactKind {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "validation_report" => Ok(Self::ValidationReport),
            "cross_qa" => Ok(Self::CrossQa),
            "brand_kit" => Ok(Self::BrandKit),
            "website" => Ok(Self::Website),
            _ => Err(CoreError::Validation(format!(
                "Invalid artifact kind '{s}'. Must be one of: validation_report, cross_qa, \
                 brand_kit, website"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValidationReport => "validation_report",
            Self::CrossQa => "cross_qa",
            Self::BrandKit => "brand_kit",
            Self::Website => "website",
        }
    }

    /// Whether a project may own more than one artifact of this kind.
    pub fn is_repeatable(self) -> bool {
        matches!(self, Self::CrossQa)
    }
}

/// Encode a payload for storage.
pub fn to_payload<T: Serialize>(value: &T) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(value)
        .map_err(|e| CoreError::Internal(format!("Failed to encode artifact payload: {e}")))
}

/// Decode a stored payload.
pub fn from_payload<T: serde::de::DeserializeOwned>(
    kind: ArtifactKind,
    payload: &serde_json::Value,
) -> Result<T, CoreError> {
    serde_json::from_value(payload.clone()).map_err(|e| {
        CoreError::Internal(format!("Stored {} payload is malformed: {e}", kind.as_str()))
    })
}

// ---------------------------------------------------------------------------
// Validation report
// ---------------------------------------------------------------------------

/// Lowest possible validation score.
pub const MIN_SCORE: i32 = 0;

/// Highest possible validation score.
pub const MAX_SCORE: i32 = 100;

/// The automated go/no-go outcome of validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Build,
    Bounce,
}

impl Verdict {
    /// Parse a verdict as produced by a generator. Case and surrounding
    /// whitespace are ignored.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "build" => Ok(Self::Build),
            "bounce" => Ok(Self::Bounce),
            other => Err(CoreError::Validation(format!(
                "Invalid verdict '{other}'. Must be 'Build' or 'Bounce'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub market_potential: String,
    #[serde(alias = "uniqueness_and_moat")]
    pub uniqueness: String,
    pub feasibility: String,
}

/// A risk paired with a suggested mitigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskItem {
    pub risk: String,
    pub mitigation: String,
}

/// Payload of a validation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReportData {
    pub score: i32,
    pub verdict: Verdict,
    pub breakdown: ScoreBreakdown,
    pub risks: Vec<RiskItem>,
    pub summary: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

impl ValidationReportData {
    /// Check that generator output is fit to commit.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&self.score) {
            return Err(CoreError::Validation(format!(
                "Score {} is out of range ({MIN_SCORE}..={MAX_SCORE})",
                self.score
            )));
        }
        if self.summary.trim().is_empty() {
            return Err(CoreError::Validation(
                "Validation report summary must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Cross Q&A
// ---------------------------------------------------------------------------

/// One answered guided question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossQaData {
    pub question: String,
    pub answer: String,
}

impl CrossQaData {
    /// Build a trimmed entry, rejecting blank questions or answers.
    pub fn new(question: &str, answer: &str) -> Result<Self, CoreError> {
        let question = question.trim();
        let answer = answer.trim();
        if question.is_empty() || answer.is_empty() {
            return Err(CoreError::Validation(
                "Question and answer are required".to_string(),
            ));
        }
        Ok(Self {
            question: question.to_string(),
            answer: answer.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Logos
// ---------------------------------------------------------------------------

/// Number of logo options offered per request.
pub const LOGO_OPTION_COUNT: usize = 4;

/// Opaque reference to a logo asset (an image URL or asset identifier).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogoRef(String);

impl LogoRef {
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(CoreError::Validation(
                "A chosen logo reference must be provided".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LogoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Brand kit
// ---------------------------------------------------------------------------

/// Five-colour brand palette, each a `#rrggbb` hex code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    #[serde(alias = "neutral_light")]
    pub light: String,
    #[serde(alias = "neutral_dark")]
    pub dark: String,
}

impl Palette {
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, value) in [
            ("primary", &self.primary),
            ("secondary", &self.secondary),
            ("accent", &self.accent),
            ("light", &self.light),
            ("dark", &self.dark),
        ] {
            if !is_hex_colour(value) {
                return Err(CoreError::Validation(format!(
                    "Palette colour '{name}' must be a #rrggbb hex code, got '{value}'"
                )));
            }
        }
        Ok(())
    }
}

fn is_hex_colour(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontPair {
    pub heading: String,
    pub body: String,
}

/// Palette and fonts synthesized to match a chosen logo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandData {
    pub palette: Palette,
    pub fonts: FontPair,
}

impl BrandData {
    pub fn validate(&self) -> Result<(), CoreError> {
        self.palette.validate()?;
        if self.fonts.heading.trim().is_empty() || self.fonts.body.trim().is_empty() {
            return Err(CoreError::Validation(
                "Both a heading and a body font are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Payload of a brand kit.
///
/// Immutable once created except for `business_card_ref`, which may be filled
/// in later if the card could not be rendered alongside the kit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandKitData {
    pub palette: Palette,
    pub fonts: FontPair,
    pub logo_ref: LogoRef,
    pub business_card_ref: Option<String>,
}

// ---------------------------------------------------------------------------
// Website
// ---------------------------------------------------------------------------

/// Payload of a generated website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteData {
    pub archive_ref: String,
    pub logo_ref: LogoRef,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn palette() -> Palette {
        Palette {
            primary: "#1a2b3c".into(),
            secondary: "#445566".into(),
            accent: "#FFAA00".into(),
            light: "#f8f9fa".into(),
            dark: "#212529".into(),
        }
    }

    fn report(score: i32) -> ValidationReportData {
        ValidationReportData {
            score,
            verdict: Verdict::Build,
            breakdown: ScoreBreakdown::default(),
            risks: vec![],
            summary: "Build it.".into(),
            sources: vec![],
        }
    }

    #[test]
    fn artifact_kind_roundtrip() {
        for kind in [
            ArtifactKind::ValidationReport,
            ArtifactKind::CrossQa,
            ArtifactKind::BrandKit,
            ArtifactKind::Website,
        ] {
            assert_eq!(ArtifactKind::from_str_db(kind.as_str()).unwrap(), kind);
        }
        assert!(ArtifactKind::from_str_db("logo").is_err());
    }

    #[test]
    fn only_cross_qa_is_repeatable() {
        assert!(ArtifactKind::CrossQa.is_repeatable());
        assert!(!ArtifactKind::BrandKit.is_repeatable());
    }

    #[test]
    fn verdict_parse_is_lenient_on_case() {
        assert_eq!(Verdict::parse("Build").unwrap(), Verdict::Build);
        assert_eq!(Verdict::parse(" bounce ").unwrap(), Verdict::Bounce);
        assert!(Verdict::parse("maybe").is_err());
    }

    #[test]
    fn report_score_bounds() {
        assert!(report(0).validate().is_ok());
        assert!(report(100).validate().is_ok());
        assert!(report(-1).validate().is_err());
        assert!(report(101).validate().is_err());
    }

    #[test]
    fn report_requires_summary() {
        let mut r = report(50);
        r.summary = "   ".into();
        assert!(r.validate().is_err());
    }

    #[test]
    fn cross_qa_trims_and_rejects_blank() {
        let qa = CrossQaData::new("  Why? ", " Because. ").unwrap();
        assert_eq!(qa.question, "Why?");
        assert_eq!(qa.answer, "Because.");
        assert!(CrossQaData::new("Why?", "  ").is_err());
    }

    #[test]
    fn logo_ref_rejects_blank() {
        assert!(LogoRef::new("").is_err());
        assert_eq!(LogoRef::new(" https://x/1.png ").unwrap().as_str(), "https://x/1.png");
    }

    #[test]
    fn palette_accepts_hex_codes() {
        assert!(palette().validate().is_ok());
    }

    #[test]
    fn palette_rejects_named_colours() {
        let mut p = palette();
        p.accent = "orange".into();
        assert!(p.validate().is_err());
        p.accent = "#ffaa0".into();
        assert!(p.validate().is_err());
    }

    #[test]
    fn palette_accepts_neutral_aliases() {
        let p: Palette = serde_json::from_value(json!({
            "primary": "#000000",
            "secondary": "#111111",
            "accent": "#222222",
            "neutral_light": "#f8f9fa",
            "neutral_dark": "#212529"
        }))
        .unwrap();
        assert_eq!(p.light, "#f8f9fa");
        assert_eq!(p.dark, "#212529");
    }

    #[test]
    fn brand_data_requires_fonts() {
        let data = BrandData {
            palette: palette(),
            fonts: FontPair {
                heading: "Poppins".into(),
                body: "".into(),
            },
        };
        assert!(data.validate().is_err());
    }

    #[test]
    fn payload_roundtrip_through_json() {
        let kit = BrandKitData {
            palette: palette(),
            fonts: FontPair {
                heading: "Poppins".into(),
                body: "Inter".into(),
            },
            logo_ref: LogoRef::new("https://cdn/logo.png").unwrap(),
            business_card_ref: None,
        };
        let payload = to_payload(&kit).unwrap();
        assert_eq!(payload["logo_ref"], "https://cdn/logo.png");
        let back: BrandKitData = from_payload(ArtifactKind::BrandKit, &payload).unwrap();
        assert_eq!(back, kit);
    }
}
