//! Column-mapping profiles for the supported CSV sources.
//!
//! Two historical exports feed the catalog: the curated per-business sheet
//! (`detail_information.csv`) and the 농림축산식품부 open-data registry
//! (`동물_동물장묘업.csv`). Both funnel through one ingestion interface;
//! the profile carries the header matching strategy, the status filter and
//! the 24h-flag derivation that differ between them.

use crate::models::Open24h;

// =============================================================================
// Column Map
// =============================================================================

/// Logical attribute → header index lookup, built once per load from the
/// header row and immutable afterward. `None` means the source has no such
/// column and the normalizer falls back per its policy table.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    pub name: Option<usize>,
    pub address: Option<usize>,
    pub phone: Option<usize>,
    pub open24h: Option<usize>,
    pub description: Option<usize>,
    pub image: Option<usize>,
    pub facilities: Option<usize>,
    pub director: Option<usize>,
    pub review_highlight: Option<usize>,
    pub price_small: Option<usize>,
    pub price_medium: Option<usize>,
    pub price_large: Option<usize>,
    pub rating: Option<usize>,
    pub review_count: Option<usize>,
    pub tags: Option<usize>,
    pub permit_no: Option<usize>,
    /// Business status column (public profile only); used to drop closed
    /// businesses before normalization.
    pub status: Option<usize>,
}

// =============================================================================
// Profiles
// =============================================================================

/// Which CSV source layout to expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Curated per-business sheet with exact Korean labels.
    Detail,
    /// Government open-data registry; labels vary between exports, so
    /// matching is by substring, and a status column marks closed entries.
    Public,
}

impl Profile {
    pub fn name(&self) -> &'static str {
        match self {
            Profile::Detail => "detail",
            Profile::Public => "public",
        }
    }

    /// Parse a profile name from CLI/env configuration.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "detail" => Some(Profile::Detail),
            "public" | "gov" | "open-data" => Some(Profile::Public),
            _ => None,
        }
    }

    /// How the open-24h flag is derived for this source.
    pub fn open24h(&self) -> Open24h {
        match self {
            // Explicit Y/N column.
            Profile::Detail => Open24h::Column,
            // The open data has no such column.
            Profile::Public => Open24h::RandomDraw,
        }
    }

    /// Build the column map from the parsed header row.
    pub fn build_column_map(&self, headers: &[String]) -> ColumnMap {
        match self {
            Profile::Detail => ColumnMap {
                name: find_exact(headers, "업체명"),
                address: find_exact(headers, "주소"),
                phone: find_exact(headers, "전화번호"),
                open24h: find_exact(headers, "24시간 운영여부"),
                description: find_exact(headers, "한줄소개"),
                image: find_exact(headers, "대표이미지URL"),
                facilities: find_exact(headers, "보유시설"),
                director: find_exact(headers, "장례지도사"),
                review_highlight: find_exact(headers, "대표후기"),
                price_small: find_exact(headers, "소형_비용"),
                price_medium: find_exact(headers, "중형_비용"),
                price_large: find_exact(headers, "대형_비용"),
                rating: find_exact(headers, "평점"),
                review_count: find_exact(headers, "후기수"),
                tags: find_exact(headers, "태그"),
                permit_no: find_exact(headers, "허가번호"),
                status: None,
            },
            Profile::Public => ColumnMap {
                name: find_any(headers, &["사업장명", "업체명"]),
                // Road address beats lot-number address when both exist;
                // the bare "주소" candidate is last on purpose since it is
                // a substring of both.
                address: find_any(headers, &["도로명전체주소", "소재지전체주소", "주소"]),
                phone: find_any(headers, &["소재지전화", "전화번호"]),
                permit_no: find_any(headers, &["관리번호"]),
                status: find_any(headers, &["영업상태명", "상세영업상태명", "영업상태"]),
                ..ColumnMap::default()
            },
        }
    }

    /// Whether a row with the given status value is an active business.
    ///
    /// The detail sheet has no status column and everything it lists is
    /// live. The open data mixes active, suspended and closed entries.
    pub fn is_active(&self, status: &str) -> bool {
        match self {
            Profile::Detail => true,
            Profile::Public => !status.contains("폐업") && !status.contains("휴업"),
        }
    }
}

/// Exact label match.
fn find_exact(headers: &[String], label: &str) -> Option<usize> {
    headers.iter().position(|h| h == label)
}

/// Substring match: the first candidate that appears inside any header wins,
/// and for a given candidate the first (leftmost) matching header wins.
fn find_any(headers: &[String], candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|label| headers.iter().position(|h| h.contains(label)))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detail_profile_exact_labels() {
        let h = headers(&["업체명", "주소", "전화번호", "24시간 운영여부", "평점"]);
        let map = Profile::Detail.build_column_map(&h);
        assert_eq!(map.name, Some(0));
        assert_eq!(map.address, Some(1));
        assert_eq!(map.phone, Some(2));
        assert_eq!(map.open24h, Some(3));
        assert_eq!(map.rating, Some(4));
        assert_eq!(map.image, None);
    }

    #[test]
    fn test_detail_profile_does_not_substring_match() {
        // "도로명주소" is not "주소": the detail sheet uses exact labels.
        let h = headers(&["업체명", "도로명주소"]);
        let map = Profile::Detail.build_column_map(&h);
        assert_eq!(map.address, None);
    }

    #[test]
    fn test_public_profile_prefers_road_address() {
        let h = headers(&["사업장명", "소재지전체주소", "도로명전체주소"]);
        let map = Profile::Public.build_column_map(&h);
        assert_eq!(map.name, Some(0));
        assert_eq!(map.address, Some(2));
    }

    #[test]
    fn test_public_profile_tolerates_label_variants() {
        let h = headers(&["사업장명", "소재지주소", "영업상태명"]);
        let map = Profile::Public.build_column_map(&h);
        // Neither full-address variant is present; the bare 주소 candidate
        // still lands on 소재지주소.
        assert_eq!(map.address, Some(1));
        assert_eq!(map.status, Some(2));
    }

    #[test]
    fn test_public_status_filter() {
        assert!(Profile::Public.is_active("영업/정상"));
        assert!(Profile::Public.is_active(""));
        assert!(!Profile::Public.is_active("폐업"));
        assert!(!Profile::Public.is_active("휴업"));
        // The detail sheet never filters.
        assert!(Profile::Detail.is_active("폐업"));
    }

    #[test]
    fn test_profile_from_name() {
        assert_eq!(Profile::from_name("detail"), Some(Profile::Detail));
        assert_eq!(Profile::from_name("PUBLIC"), Some(Profile::Public));
        assert_eq!(Profile::from_name("gov"), Some(Profile::Public));
        assert_eq!(Profile::from_name("nope"), None);
    }
}
