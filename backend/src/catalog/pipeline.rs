//! Catalog load pipeline: read → decode → split → map columns → normalize.
//!
//! The whole list is recomputed on every call: no caching, no incremental
//! update, and with the default per-load seed the enriched fields jitter
//! between runs while the authoritative fields stay put.
//!
//! # Example
//!
//! ```rust,ignore
//! use withle::catalog::{load_catalog, LoadOptions};
//! use std::path::Path;
//!
//! let catalog = load_catalog(Path::new("data/detail_information.csv"), &LoadOptions::default())?;
//! println!("{} listings", catalog.homes.len());
//! ```

use serde::Serialize;
use std::path::Path;

use crate::api::logs::{log_info, log_success, log_warning};
use crate::catalog::enrich::Enrichment;
use crate::catalog::normalize::normalize_row;
use crate::catalog::profile::Profile;
use crate::error::{CatalogError, CatalogResult, CsvError};
use crate::models::FuneralHome;
use crate::parser::{parse_line, resolve_encoding, split_rows};

/// Options for one catalog load.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Column-mapping profile for the source file.
    pub profile: Profile,
    /// Fixed enrichment seed; `None` draws fresh entropy per load.
    pub seed: Option<u64>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            profile: Profile::Detail,
            seed: None,
        }
    }
}

/// Load metadata returned alongside the records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogInfo {
    /// Encoding actually used for decoding.
    pub encoding: String,
    /// True when the UTF-8 decode was discarded for EUC-KR.
    pub encoding_fallback: bool,
    /// Profile the columns were mapped with.
    pub profile: String,
    /// Parsed header labels.
    pub headers: Vec<String>,
    /// Data rows seen (header excluded).
    pub row_count: usize,
    /// Rows dropped for a missing name or an inactive status.
    pub dropped_rows: usize,
}

/// A successfully loaded catalog.
///
/// An empty `homes` here really means the file had no usable data rows;
/// load failures are a [`CatalogError`], not an empty list.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub homes: Vec<FuneralHome>,
    pub info: CatalogInfo,
}

/// Load and normalize the catalog from a CSV file.
pub fn load_catalog(path: &Path, options: &LoadOptions) -> CatalogResult<Catalog> {
    log_info(format!("📖 Reading catalog CSV: {}", path.display()));
    let bytes = std::fs::read(path).map_err(CsvError::from)?;
    load_catalog_bytes(&bytes, options)
}

/// Load and normalize the catalog from raw CSV bytes.
pub fn load_catalog_bytes(bytes: &[u8], options: &LoadOptions) -> CatalogResult<Catalog> {
    let decoded = resolve_encoding(bytes);
    if decoded.fell_back {
        log_warning(format!(
            "Invalid UTF-8 (replacement character found), re-decoding as EUC-KR (chardet guess: {})",
            decoded.detected
        ));
    }

    let rows = split_rows(&decoded.text);
    log_success(format!("Read {} rows", rows.len()));

    if rows.is_empty() {
        return Ok(Catalog {
            homes: Vec::new(),
            info: CatalogInfo {
                encoding: decoded.encoding,
                encoding_fallback: decoded.fell_back,
                profile: options.profile.name().to_string(),
                headers: Vec::new(),
                row_count: 0,
                dropped_rows: 0,
            },
        });
    }

    let headers = parse_line(rows[0]);
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders.into());
    }
    log_info(format!("Detected headers: {}", headers.join(", ")));

    let map = options.profile.build_column_map(&headers);
    if map.name.is_none() {
        return Err(CatalogError::UnmappedHeader {
            profile: options.profile.name().to_string(),
        });
    }

    let enrich = match options.seed {
        Some(seed) => Enrichment::seeded(seed),
        None => Enrichment::per_load(),
    };

    let mut homes = Vec::new();
    let mut dropped = 0usize;
    for (index, row) in rows[1..].iter().enumerate() {
        let fields = parse_line(row);
        match normalize_row(&fields, &map, index, options.profile, &enrich) {
            Some(home) => homes.push(home),
            None => dropped += 1,
        }
    }

    let row_count = rows.len() - 1;
    log_success(format!(
        "Normalized {} listings ({} rows dropped)",
        homes.len(),
        dropped
    ));

    Ok(Catalog {
        homes,
        info: CatalogInfo {
            encoding: decoded.encoding,
            encoding_fallback: decoded.fell_back,
            profile: options.profile.name().to_string(),
            headers,
            row_count,
            dropped_rows: dropped,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn detail_options(seed: u64) -> LoadOptions {
        LoadOptions {
            profile: Profile::Detail,
            seed: Some(seed),
        }
    }

    #[test]
    fn test_happy_path_scenario() {
        let csv = "업체명,주소,전화번호,24시간 운영여부\n\
                   행복동물장례식장,서울시 강남구,02-1234-5678,Y\n";
        let catalog = load_catalog_bytes(csv.as_bytes(), &detail_options(1)).unwrap();

        assert_eq!(catalog.homes.len(), 1);
        let home = &catalog.homes[0];
        assert_eq!(home.name, "행복동물장례식장");
        assert_eq!(home.address, "서울시 강남구");
        assert_eq!(home.phone, "02-1234-5678");
        assert!(home.open24h);
        assert_eq!(home.tags[0], "24시간");
        assert_eq!(catalog.info.encoding, "utf-8");
        assert_eq!(catalog.info.row_count, 1);
        assert_eq!(catalog.info.dropped_rows, 0);
    }

    #[test]
    fn test_empty_file_is_ok_and_empty() {
        let catalog = load_catalog_bytes(b"", &detail_options(1)).unwrap();
        assert!(catalog.homes.is_empty());
        assert_eq!(catalog.info.row_count, 0);
    }

    #[test]
    fn test_header_only_file_is_ok_and_empty() {
        let csv = "업체명,주소,전화번호,24시간 운영여부\n";
        let catalog = load_catalog_bytes(csv.as_bytes(), &detail_options(1)).unwrap();
        assert!(catalog.homes.is_empty());
        assert_eq!(catalog.info.headers.len(), 4);
    }

    #[test]
    fn test_nameless_rows_dropped_order_preserved() {
        let csv = "업체명,주소\n첫째,서울\n,숨김\n둘째,부산\n";
        let catalog = load_catalog_bytes(csv.as_bytes(), &detail_options(1)).unwrap();

        let names: Vec<&str> = catalog.homes.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["첫째", "둘째"]);
        assert_eq!(catalog.info.dropped_rows, 1);
        // Identifiers keep the positional row index, including dropped rows.
        assert_eq!(catalog.homes[1].id, "csv-2");
    }

    #[test]
    fn test_quoted_comma_address() {
        let csv = "업체명,주소\n업체,\"Seoul, Gangnam\"\n";
        let catalog = load_catalog_bytes(csv.as_bytes(), &detail_options(1)).unwrap();
        assert_eq!(catalog.homes[0].address, "Seoul, Gangnam");
    }

    #[test]
    fn test_unmapped_header_is_typed_error() {
        let csv = "foo,bar\nx,y\n";
        let err = load_catalog_bytes(csv.as_bytes(), &detail_options(1)).unwrap_err();
        assert!(matches!(err, CatalogError::UnmappedHeader { .. }));
    }

    #[test]
    fn test_missing_file_is_typed_error() {
        let err = load_catalog(Path::new("/no/such/file.csv"), &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::Csv(CsvError::IoError(_))));
    }

    #[test]
    fn test_deterministic_fields_stable_across_reloads() {
        let csv = "업체명,주소,전화번호\n가게,서울,02-1\n";
        // Different seeds model two independent loads.
        let a = load_catalog_bytes(csv.as_bytes(), &detail_options(1)).unwrap();
        let b = load_catalog_bytes(csv.as_bytes(), &detail_options(2)).unwrap();

        assert_eq!(a.homes[0].name, b.homes[0].name);
        assert_eq!(a.homes[0].address, b.homes[0].address);
        assert_eq!(a.homes[0].phone, b.homes[0].phone);
        assert_eq!(a.homes[0].id, b.homes[0].id);
        assert_eq!(a.homes[0].image, b.homes[0].image);
    }

    #[test]
    fn test_fixed_seed_reproduces_enriched_fields() {
        let csv = "업체명,주소\n가게,서울\n";
        let a = load_catalog_bytes(csv.as_bytes(), &detail_options(7)).unwrap();
        let b = load_catalog_bytes(csv.as_bytes(), &detail_options(7)).unwrap();

        let ja = serde_json::to_string(&a.homes).unwrap();
        let jb = serde_json::to_string(&b.homes).unwrap();
        assert_eq!(ja, jb);
    }

    #[test]
    fn test_euc_kr_file_falls_back() {
        let csv = "업체명,주소\n행복동물장례식장,서울시\n";
        let (encoded, _, _) = encoding_rs::EUC_KR.encode(csv);
        let catalog = load_catalog_bytes(&encoded, &detail_options(1)).unwrap();

        assert_eq!(catalog.info.encoding, "euc-kr");
        assert!(catalog.info.encoding_fallback);
        assert_eq!(catalog.homes[0].name, "행복동물장례식장");
    }

    #[test]
    fn test_load_from_tempfile() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "업체명,주소\n업체,서울\n").unwrap();

        let catalog = load_catalog(file.path(), &detail_options(3)).unwrap();
        assert_eq!(catalog.homes.len(), 1);
    }

    #[test]
    fn test_public_profile_end_to_end() {
        let csv = "번호,사업장명,영업상태명,도로명전체주소,소재지전화\n\
                   1,하늘소풍,영업/정상,세종특별자치시 연동면,044-1\n\
                   2,문닫은곳,폐업,대전광역시,042-2\n";
        let options = LoadOptions {
            profile: Profile::Public,
            seed: Some(5),
        };
        let catalog = load_catalog_bytes(csv.as_bytes(), &options).unwrap();

        assert_eq!(catalog.homes.len(), 1);
        let home = &catalog.homes[0];
        assert_eq!(home.name, "하늘소풍");
        assert_eq!(home.address, "세종특별자치시 연동면");
        assert_eq!(home.phone, "044-1");
        assert_eq!(catalog.info.dropped_rows, 1);
    }
}
