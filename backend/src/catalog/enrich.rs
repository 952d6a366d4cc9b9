//! Enrichment policy: plausible backfill for optional marketing attributes.
//!
//! The source data is incomplete for many optional attributes, so missing
//! values are backfilled from fixed pools to keep listing pages populated.
//! Backfill is kept behind this explicit policy, away from the
//! authoritative fields (name, address, phone), and is a pure function of
//! (load seed, row index, row name): a load with a fixed seed reproduces
//! the exact same output, which is what the tests assert. The default
//! seed is fresh entropy per load, so reloads jitter like the data always
//! has.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::hash::{Hash, Hasher};

/// Stock photo pool for listings without an image URL.
const IMAGE_POOL: [&str; 7] = [
    "https://images.unsplash.com/photo-1596272875729-ed2c21d50c46?auto=format&fit=crop&q=80&w=600",
    "https://images.unsplash.com/photo-1497366216548-37526070297c?auto=format&fit=crop&q=80&w=600",
    "https://images.unsplash.com/photo-1518241353330-0f7941c2d9b5?auto=format&fit=crop&q=80&w=600",
    "https://images.unsplash.com/photo-1535905557558-afc4877a26fc?auto=format&fit=crop&q=80&w=600",
    "https://images.unsplash.com/photo-1516455590571-18256e5bb9ff?auto=format&fit=crop&q=80&w=600",
    "https://images.unsplash.com/photo-1445116572660-236099ec97a0?auto=format&fit=crop&q=80&w=600",
    "https://images.unsplash.com/photo-1519052537078-e6302a77da00?auto=format&fit=crop&q=80&w=600",
];

/// Facility vocabulary for listings without a 보유시설 column value.
const FACILITY_POOL: [&str; 8] = [
    "개인추모실",
    "납골당",
    "수목장",
    "픽업서비스",
    "화장장",
    "스톤제작",
    "야외장례",
    "대기실",
];

/// Tag vocabulary for listings without a 태그 column value.
const TAG_POOL: [&str; 10] = [
    "24시간",
    "프리미엄",
    "단독추모",
    "주차편리",
    "친절한",
    "깨끗한",
    "최신시설",
    "합리적가격",
    "정식허가",
    "따뜻한분위기",
];

// Per-attribute salts so the draws for one row are independent streams.
const SALT_FACILITIES: u64 = 0x01;
const SALT_TAGS: u64 = 0x02;
const SALT_RATING: u64 = 0x03;
const SALT_REVIEWS: u64 = 0x04;
const SALT_DISTANCE: u64 = 0x05;
const SALT_OPEN24H: u64 = 0x06;

/// Deterministic fallback-value generator for one load.
#[derive(Debug, Clone, Copy)]
pub struct Enrichment {
    seed: u64,
}

impl Enrichment {
    /// Policy with an explicit seed; same seed, same output.
    pub fn seeded(seed: u64) -> Self {
        Self { seed }
    }

    /// Policy with a fresh seed, the per-load default.
    pub fn per_load() -> Self {
        Self::seeded(rand::random())
    }

    fn rng(&self, index: usize, name: &str, salt: u64) -> StdRng {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        name.hash(&mut hasher);
        let key = self
            .seed
            .wrapping_add(hasher.finish())
            .wrapping_add((index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
            .wrapping_add(salt);
        StdRng::seed_from_u64(key)
    }

    /// Stock photo by row index. Purely positional, no randomness: the same
    /// row keeps the same fallback photo across reloads.
    pub fn image(&self, index: usize) -> String {
        IMAGE_POOL[index % IMAGE_POOL.len()].to_string()
    }

    /// 3-4 facilities drawn from the fixed vocabulary.
    pub fn facilities(&self, index: usize, name: &str) -> Vec<String> {
        let mut rng = self.rng(index, name, SALT_FACILITIES);
        let count = rng.gen_range(3..=4);
        pick(&FACILITY_POOL, count, &mut rng)
    }

    /// 2-3 tags drawn from the fixed vocabulary.
    pub fn tags(&self, index: usize, name: &str) -> Vec<String> {
        let mut rng = self.rng(index, name, SALT_TAGS);
        let count = rng.gen_range(2..=3);
        pick(&TAG_POOL, count, &mut rng)
    }

    /// Rating uniform in [4.5, 5.0], one decimal.
    pub fn rating(&self, index: usize, name: &str) -> String {
        let mut rng = self.rng(index, name, SALT_RATING);
        format!("{:.1}", 4.5 + rng.gen::<f64>() * 0.5)
    }

    /// Review count uniform in [10, 510).
    pub fn review_count(&self, index: usize, name: &str) -> u32 {
        let mut rng = self.rng(index, name, SALT_REVIEWS);
        rng.gen_range(10..510)
    }

    /// Mocked distance in [0, 50) km, one decimal.
    pub fn distance(&self, index: usize, name: &str) -> String {
        let mut rng = self.rng(index, name, SALT_DISTANCE);
        format!("{:.1}", rng.gen::<f64>() * 50.0)
    }

    /// 24h draw for sources without an explicit column, ~30% odds.
    pub fn open24h_draw(&self, index: usize, name: &str) -> bool {
        let mut rng = self.rng(index, name, SALT_OPEN24H);
        rng.gen_bool(0.3)
    }
}

fn pick(pool: &[&str], count: usize, rng: &mut StdRng) -> Vec<String> {
    let mut shuffled: Vec<&str> = pool.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    shuffled.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_output() {
        let a = Enrichment::seeded(42);
        let b = Enrichment::seeded(42);
        assert_eq!(a.facilities(3, "행복"), b.facilities(3, "행복"));
        assert_eq!(a.tags(3, "행복"), b.tags(3, "행복"));
        assert_eq!(a.rating(3, "행복"), b.rating(3, "행복"));
        assert_eq!(a.review_count(3, "행복"), b.review_count(3, "행복"));
        assert_eq!(a.distance(3, "행복"), b.distance(3, "행복"));
        assert_eq!(a.open24h_draw(3, "행복"), b.open24h_draw(3, "행복"));
    }

    #[test]
    fn test_image_is_positional() {
        let a = Enrichment::seeded(1);
        let b = Enrichment::seeded(2);
        // Seed-independent: index mod pool size.
        assert_eq!(a.image(0), b.image(0));
        assert_eq!(a.image(9), a.image(2));
    }

    #[test]
    fn test_facility_count_in_range() {
        let e = Enrichment::seeded(7);
        for i in 0..50 {
            let f = e.facilities(i, "x");
            assert!((3..=4).contains(&f.len()), "got {} facilities", f.len());
        }
    }

    #[test]
    fn test_tag_count_in_range() {
        let e = Enrichment::seeded(7);
        for i in 0..50 {
            let t = e.tags(i, "x");
            assert!((2..=3).contains(&t.len()), "got {} tags", t.len());
        }
    }

    #[test]
    fn test_rating_bounds() {
        let e = Enrichment::seeded(11);
        for i in 0..100 {
            let r: f64 = e.rating(i, "y").parse().unwrap();
            assert!((4.5..=5.0).contains(&r), "rating {} out of range", r);
        }
    }

    #[test]
    fn test_review_count_bounds() {
        let e = Enrichment::seeded(11);
        for i in 0..100 {
            let c = e.review_count(i, "y");
            assert!((10..510).contains(&c), "review count {} out of range", c);
        }
    }

    #[test]
    fn test_draws_come_from_the_pools() {
        let e = Enrichment::seeded(3);
        for f in e.facilities(0, "z") {
            assert!(FACILITY_POOL.contains(&f.as_str()));
        }
        for t in e.tags(0, "z") {
            assert!(TAG_POOL.contains(&t.as_str()));
        }
    }
}
