//! Row normalization: one parsed CSV row in, one [`FuneralHome`] out.
//!
//! The name is the only required field; rows without one produce `None`
//! and are filtered out upstream. Short rows are tolerated by treating
//! missing fields as empty. Optional attributes follow a fixed fallback
//! table: use the column value when present, otherwise defer to the
//! [`Enrichment`] policy or a fixed default.

use crate::catalog::enrich::Enrichment;
use crate::catalog::profile::{ColumnMap, Profile};
use crate::models::{FuneralHome, Open24h, PriceTiers};

// Fixed Korean defaults, verbatim from the curated sheet era.
const DEFAULT_ADDRESS: &str = "주소 미표기";
const DEFAULT_DESCRIPTION: &str = "반려동물과의 소중한 이별, 저희가 함께하겠습니다. \
     따뜻하고 편안한 분위기에서 아이를 배웅할 수 있도록 최선을 다하겠습니다.";
const DEFAULT_DIRECTOR: &str = "전문 장례지도사 상주";
const DEFAULT_REVIEW: &str = "정식 허가된 업체라 믿고 맡길 수 있었습니다.";
const DEFAULT_PERMIT: &str = "정식허가업체";

/// Normalize one data row.
///
/// `index` is the zero-based position among data rows; it feeds the record
/// identifier and the deterministic fallback selection. Returns `None` when
/// the row has no name, or when the profile's status column marks the
/// business as closed.
pub fn normalize_row(
    fields: &[String],
    map: &ColumnMap,
    index: usize,
    profile: Profile,
    enrich: &Enrichment,
) -> Option<FuneralHome> {
    let get = |col: Option<usize>| field_at(fields, col);

    let name = get(map.name);
    if name.is_empty() {
        return None;
    }
    if !profile.is_active(get(map.status)) {
        return None;
    }

    let image = match get(map.image) {
        "" => enrich.image(index),
        url => url.to_string(),
    };

    let facilities = match split_list(get(map.facilities)) {
        list if list.is_empty() => enrich.facilities(index, name),
        list => list,
    };

    let tags = match split_list(get(map.tags)) {
        list if list.is_empty() => enrich.tags(index, name),
        list => list,
    };

    let open24h = match profile.open24h() {
        Open24h::Column => matches!(get(map.open24h), "Y" | "y"),
        Open24h::RandomDraw => enrich.open24h_draw(index, name),
    };

    let rating = match get(map.rating) {
        "" => enrich.rating(index, name),
        value => value.to_string(),
    };

    let review_count = get(map.review_count)
        .parse()
        .unwrap_or_else(|_| enrich.review_count(index, name));

    let defaults = PriceTiers::default();
    let price = PriceTiers {
        small: parse_price(get(map.price_small), defaults.small),
        medium: parse_price(get(map.price_medium), defaults.medium),
        large: parse_price(get(map.price_large), defaults.large),
    };

    let mut home = FuneralHome {
        id: format!("csv-{index}"),
        name: name.to_string(),
        address: or_default(get(map.address), DEFAULT_ADDRESS),
        phone: get(map.phone).to_string(),
        open24h,
        description: or_default(get(map.description), DEFAULT_DESCRIPTION),
        image,
        facilities,
        director: or_default(get(map.director), DEFAULT_DIRECTOR),
        review_highlight: or_default(get(map.review_highlight), DEFAULT_REVIEW),
        rating,
        review_count,
        price,
        // Only registered businesses make it into either source.
        certified: true,
        permit_no: or_default(get(map.permit_no), DEFAULT_PERMIT),
        tags,
        distance: enrich.distance(index, name),
    };
    home.ensure_24h_tag();

    Some(home)
}

/// Cell value at a mapped column; unmapped columns and short rows read as
/// empty.
fn field_at<'a>(fields: &'a [String], col: Option<usize>) -> &'a str {
    col.and_then(|i| fields.get(i))
        .map(|s| s.as_str())
        .unwrap_or("")
}

/// Split a comma-separated cell into trimmed, non-empty items.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse an integer price, falling back to the fixed tier default when the
/// cell is absent or non-numeric.
fn parse_price(value: &str, default: u32) -> u32 {
    value.trim().parse().unwrap_or(default)
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
