//! Candidate offers (domain names, logos) remembered between requests.

use serde::Serialize;
use sqlx::FromRow;
use bob_core::types::{DbId, Timestamp};

pub const OFFER_KIND_DOMAIN: &str = "domain";
pub const OFFER_KIND_LOGO: &str = "logo";

/// One offered value from the most recent batch.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Offer {
    pub id: DbId,
    pub project_id: DbId,
    pub kind: String,
    pub value: String,
    pub position: i32,
    pub created_at: Timestamp,
}
