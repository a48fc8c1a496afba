//! The set of external collaborators the workflow runs.

use std::sync::Arc;

use bob_core::generators::{
    AssetStore, BrandSynthesizer, CardRenderer, Coach, DomainGenerator, IdeaResearcher,
    IdeaValidator, ImageSource, LogoGenerator, SiteGenerator, SitePackager,
};

/// One implementation per adapter trait. Cheap to clone.
#[derive(Clone)]
pub struct Generators {
    pub researcher: Arc<dyn IdeaResearcher>,
    pub validator: Arc<dyn IdeaValidator>,
    pub domains: Arc<dyn DomainGenerator>,
    pub logos: Arc<dyn LogoGenerator>,
    pub brand: Arc<dyn BrandSynthesizer>,
    pub cards: Arc<dyn CardRenderer>,
    pub images: Arc<dyn ImageSource>,
    pub sites: Arc<dyn SiteGenerator>,
    pub assets: Arc<dyn AssetStore>,
    pub packager: Arc<dyn SitePackager>,
    pub coach: Arc<dyn Coach>,
}
