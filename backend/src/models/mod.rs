//! Domain models for the Withle catalog.
//!
//! This module contains the core data structures produced by the pipeline:
//!
//! - [`FuneralHome`] - One normalized business listing
//! - [`PriceTiers`] - Cremation price by animal size
//! - [`Open24h`] - How the 24-hour flag is derived per data source
//!
//! Records are transient: the whole list is rebuilt on every load and never
//! mutated after creation.

use serde::{Deserialize, Serialize};

// =============================================================================
// Price Tiers
// =============================================================================

/// Cremation price tiers in KRW, by animal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTiers {
    pub small: u32,
    pub medium: u32,
    pub large: u32,
}

impl Default for PriceTiers {
    fn default() -> Self {
        Self {
            small: 200_000,
            medium: 300_000,
            large: 500_000,
        }
    }
}

// =============================================================================
// 24-hour Flag Derivation
// =============================================================================

/// How a profile derives the open-24-hours flag.
///
/// The detail CSV carries an explicit `Y`/`N` column; the government open
/// data has no such column, so listings there get a deterministic draw with
/// roughly 30% odds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Open24h {
    /// True iff the mapped column holds `Y` or `y`.
    Column,
    /// No source column; drawn from the enrichment policy.
    RandomDraw,
}

// =============================================================================
// Funeral Home Record
// =============================================================================

/// A normalized pet funeral home listing.
///
/// Field-by-field provenance: `name`, `address` and `phone` are authoritative
/// (taken from the CSV); everything else may be backfilled by the enrichment
/// stage when the source column is absent or empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuneralHome {
    /// Identifier, `csv-{row index}`. Not stable across reloads if the file
    /// row order changes.
    pub id: String,

    /// Business name. Rows without one are dropped before this type exists.
    pub name: String,

    /// Street address.
    pub address: String,

    /// Contact phone number, empty when unknown.
    pub phone: String,

    /// Whether the business operates around the clock.
    pub open24h: bool,

    /// One-line marketing description.
    pub description: String,

    /// Representative image URL.
    pub image: String,

    /// Facility tags (개인추모실, 납골당, ...).
    pub facilities: Vec<String>,

    /// Funeral director blurb.
    pub director: String,

    /// Representative review quote.
    pub review_highlight: String,

    /// Average rating, serialized as a one-decimal numeric string.
    pub rating: String,

    /// Number of reviews.
    pub review_count: u32,

    /// Price tiers by animal size.
    pub price: PriceTiers,

    /// Always true for this data source: only registered businesses appear.
    pub certified: bool,

    /// Government permit number.
    pub permit_no: String,

    /// Marketing tags; `24시간` is kept first when the 24h flag is set.
    pub tags: Vec<String>,

    /// Mocked distance in km, one decimal. Fresh on every load, not
    /// persisted; real geo-coords are not in the CSV yet.
    pub distance: String,
}

impl FuneralHome {
    /// Keep the `24시간` tag first for 24h businesses: prepend it when
    /// absent, move it to the front when a fallback draw already picked it.
    pub fn ensure_24h_tag(&mut self) {
        if !self.open24h {
            return;
        }
        match self.tags.iter().position(|t| t == "24시간") {
            Some(0) => {}
            Some(pos) => {
                let tag = self.tags.remove(pos);
                self.tags.insert(0, tag);
            }
            None => self.tags.insert(0, "24시간".to_string()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
