//! In-process generator fakes and a ready-wired [`Workflow`] for tests.
//!
//! A single [`FakeGenerators`] value implements every adapter trait. Its
//! knobs are plain fields behind interior mutability so a test can flip a
//! failure or a delay between calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use bob_core::artifacts::{
    BrandData, FontPair, LogoRef, Palette, RiskItem, ScoreBreakdown, ValidationReportData, Verdict,
    LOGO_OPTION_COUNT,
};
use bob_core::credentials::{Credentials, SystemCredentials};
use bob_core::crypto::SecretCipher;
use bob_core::domain_names::{DomainCandidate, NamingMode, TldAvailability};
use bob_core::generators::{
    AssetStore, BrandSynthesizer, CardInput, CardRenderer, Coach, CoachInput, DomainGenerator,
    GeneratorError, GeneratorResult, IdeaBrief, IdeaResearcher, IdeaValidator, ImageSource,
    LogoGenerator, ResearchContext, SiteGenerator, SiteInput, SitePackager,
};
use bob_core::types::DbId;
use bob_db::models::user::{CreateUser, User};

use crate::credentials::CredentialResolver;
use crate::engine::{Workflow, WorkflowConfig};
use crate::generators::Generators;
use crate::store::{MemoryStore, WorkflowStore};

/// Secret used to encrypt stored keys in tests.
pub const TEST_ENCRYPTION_SECRET: &str = "test-encryption-secret";

/// Knobs and call counters for the fake generators.
#[derive(Default)]
pub struct FakeGenerators {
    pub verdict: Mutex<Option<Verdict>>,
    pub fail_research: AtomicBool,
    pub fail_validator: AtomicBool,
    /// Return a report whose score is out of range.
    pub malformed_report: AtomicBool,
    /// When set, every generated domain name is reported as taken.
    pub no_available_domains: AtomicBool,
    pub fail_domains: AtomicBool,
    pub fail_cards: AtomicBool,
    pub fail_images: AtomicBool,
    pub fail_site: AtomicBool,
    pub fail_coach: AtomicBool,
    /// Delay applied to validator, brand and site calls.
    pub delay: Mutex<Duration>,
    /// Cards for this logo wait out `delay` before rendering.
    pub slow_card_logo: Mutex<Option<String>>,
    pub validator_calls: AtomicUsize,
    pub site_calls: AtomicUsize,
    /// Last input handed to the site generator.
    pub last_site_input: Mutex<Option<SiteInput>>,
    /// Last input handed to the coach.
    pub last_coach_input: Mutex<Option<CoachInput>>,
    /// Files written through the asset store, keyed by reference.
    pub stored_files: Mutex<HashMap<String, Vec<u8>>>,
}

impl FakeGenerators {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_verdict(&self, verdict: Verdict) {
        *self.verdict.lock().unwrap() = Some(verdict);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn set_slow_card_logo(&self, logo: &str) {
        *self.slow_card_logo.lock().unwrap() = Some(logo.to_string());
    }

    /// Wire this fake into every adapter slot.
    pub fn generators(self: &Arc<Self>) -> Generators {
        Generators {
            researcher: self.clone(),
            validator: self.clone(),
            domains: self.clone(),
            logos: self.clone(),
            brand: self.clone(),
            cards: self.clone(),
            images: self.clone(),
            sites: self.clone(),
            assets: self.clone(),
            packager: self.clone(),
            coach: self.clone(),
        }
    }

    /// Flip a failure knob, e.g. `fakes.toggle(&fakes.fail_cards, true)`.
    pub fn toggle(&self, flag: &AtomicBool, on: bool) {
        flag.store(on, Ordering::SeqCst);
    }

    fn is(flag: &AtomicBool) -> bool {
        flag.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// The logo references the fake offers.
pub fn fake_logo_refs() -> Vec<String> {
    (1..=LOGO_OPTION_COUNT)
        .map(|n| format!("https://cdn.test/logos/{n}.png"))
        .collect()
}

#[async_trait]
impl IdeaResearcher for FakeGenerators {
    async fn research(&self, _credentials: &Credentials, query: &str) -> GeneratorResult<ResearchContext> {
        if Self::is(&self.fail_research) {
            return Err(GeneratorError::Request("research service down".into()));
        }
        Ok(ResearchContext {
            text: format!("Findings for {query}"),
            sources: vec!["https://research.test/1".into()],
        })
    }
}

#[async_trait]
impl IdeaValidator for FakeGenerators {
    async fn assess(
        &self,
        _credentials: &Credentials,
        brief: &IdeaBrief,
        research: &ResearchContext,
    ) -> GeneratorResult<ValidationReportData> {
        self.validator_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if Self::is(&self.fail_validator) {
            return Err(GeneratorError::Request("validator unavailable".into()));
        }
        let verdict = self.verdict.lock().unwrap().unwrap_or(Verdict::Build);
        let score = match (Self::is(&self.malformed_report), verdict) {
            (true, _) => 140,
            (false, Verdict::Build) => 78,
            (false, Verdict::Bounce) => 31,
        };
        Ok(ValidationReportData {
            score,
            verdict,
            breakdown: ScoreBreakdown {
                market_potential: "Large".into(),
                uniqueness: "Some".into(),
                feasibility: "High".into(),
            },
            risks: vec![RiskItem {
                risk: "Competition".into(),
                mitigation: "Niche down".into(),
            }],
            summary: format!("Assessment of {}", brief.title),
            sources: research.sources.clone(),
        })
    }
}

#[async_trait]
impl DomainGenerator for FakeGenerators {
    async fn candidates(
        &self,
        _credentials: &Credentials,
        _brief: &IdeaBrief,
        mode: NamingMode,
    ) -> GeneratorResult<Vec<DomainCandidate>> {
        if Self::is(&self.fail_domains) {
            return Err(GeneratorError::Request("name generator unavailable".into()));
        }
        let taken = Self::is(&self.no_available_domains);
        let prefix = match mode {
            NamingMode::Normal => "acme",
            NamingMode::Creative => "getacme",
        };
        Ok((1..=3)
            .map(|n| DomainCandidate {
                name: format!("{prefix}{n}"),
                availability: TldAvailability {
                    com: !taken && n != 2,
                    co: false,
                    io: !taken && n == 1,
                },
            })
            .collect())
    }
}

#[async_trait]
impl LogoGenerator for FakeGenerators {
    async fn logo_options(&self, _credentials: &Credentials, _brief: &IdeaBrief) -> GeneratorResult<Vec<LogoRef>> {
        fake_logo_refs()
            .into_iter()
            .map(|r| LogoRef::new(r).map_err(|e| GeneratorError::Malformed(e.to_string())))
            .collect()
    }
}

#[async_trait]
impl BrandSynthesizer for FakeGenerators {
    async fn brand_data(&self, _credentials: &Credentials, _logo: &LogoRef) -> GeneratorResult<BrandData> {
        self.pause().await;
        Ok(BrandData {
            palette: Palette {
                primary: "#1a73e8".into(),
                secondary: "#34a853".into(),
                accent: "#fbbc05".into(),
                light: "#f8f9fa".into(),
                dark: "#202124".into(),
            },
            fonts: FontPair {
                heading: "Poppins".into(),
                body: "Inter".into(),
            },
        })
    }
}

#[async_trait]
impl CardRenderer for FakeGenerators {
    async fn render_card(&self, input: &CardInput) -> GeneratorResult<Vec<u8>> {
        let slow = self.slow_card_logo.lock().unwrap().as_deref() == Some(input.logo_ref.as_str());
        if slow {
            self.pause().await;
        }
        if Self::is(&self.fail_cards) {
            return Err(GeneratorError::Request("renderer unavailable".into()));
        }
        Ok(format!("%PDF card for {} with {}", input.display_name, input.logo_ref.as_str()).into_bytes())
    }
}

#[async_trait]
impl ImageSource for FakeGenerators {
    async fn images(&self, _credentials: &Credentials, _brief: &IdeaBrief) -> GeneratorResult<Vec<String>> {
        if Self::is(&self.fail_images) {
            return Err(GeneratorError::Request("image search unavailable".into()));
        }
        Ok((1..=5).map(|n| format!("https://img.test/{n}.jpg")).collect())
    }
}

#[async_trait]
impl SiteGenerator for FakeGenerators {
    async fn site_markup(&self, _credentials: &Credentials, input: &SiteInput) -> GeneratorResult<String> {
        self.site_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_site_input.lock().unwrap() = Some(input.clone());
        self.pause().await;
        if Self::is(&self.fail_site) {
            return Err(GeneratorError::Request("site generator unavailable".into()));
        }
        Ok(format!(
            "```html\n<!DOCTYPE html><html><body><h1>{}</h1></body></html>\n```",
            input.brief.title
        ))
    }
}

#[async_trait]
impl AssetStore for FakeGenerators {
    async fn store_file(&self, project_id: DbId, file_name: &str, bytes: Vec<u8>) -> GeneratorResult<String> {
        let reference = format!("/uploads/{project_id}/{file_name}");
        self.stored_files
            .lock()
            .unwrap()
            .insert(reference.clone(), bytes);
        Ok(reference)
    }

    async fn remove_file(&self, reference: &str) -> GeneratorResult<()> {
        self.stored_files.lock().unwrap().remove(reference);
        Ok(())
    }
}

#[async_trait]
impl SitePackager for FakeGenerators {
    async fn package_site(&self, project_id: DbId, archive_name: &str, markup: &str) -> GeneratorResult<String> {
        self.store_file(project_id, archive_name, markup.as_bytes().to_vec())
            .await
    }
}

#[async_trait]
impl Coach for FakeGenerators {
    async fn reply(&self, _credentials: &Credentials, input: &CoachInput) -> GeneratorResult<String> {
        *self.last_coach_input.lock().unwrap() = Some(input.clone());
        if Self::is(&self.fail_coach) {
            return Err(GeneratorError::Request("coach unavailable".into()));
        }
        Ok(format!("Coach says: {}", input.message))
    }
}

/// A workflow over a [`MemoryStore`] and [`FakeGenerators`].
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub fakes: Arc<FakeGenerators>,
    pub workflow: Workflow,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(WorkflowConfig::default())
    }

    pub fn with_config(config: WorkflowConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let fakes = FakeGenerators::new();
        let dyn_store: Arc<dyn WorkflowStore> = store.clone();
        let cipher = SecretCipher::new(TEST_ENCRYPTION_SECRET).expect("test secret is non-empty");
        let credentials = CredentialResolver::new(dyn_store.clone(), cipher, SystemCredentials::default());
        let workflow = Workflow::new(dyn_store, fakes.generators(), credentials, config);
        Self {
            store,
            fakes,
            workflow,
        }
    }

    /// Insert a user directly into the store.
    pub async fn user(&self, email: &str) -> User {
        self.store
            .create_user(&CreateUser {
                email: email.to_string(),
                name: Some("Test Founder".to_string()),
                password_hash: "not-a-real-hash".to_string(),
            })
            .await
            .expect("user insert")
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
