//! Node placement
//!
//! Modules sit on a fixed grid. Capability nodes are scattered on an annulus
//! to the right of the grid, at a position derived from a stable hash of
//! their id, so layouts are reproducible across runs and platforms.

use std::f64::consts::TAU;

use super::{NODE_RADIUS, Point};

const GRID_COLUMNS: usize = 3;
const GRID_ORIGIN: f64 = 100.0;
const COLUMN_SPACING: f64 = 200.0;
const ROW_SPACING: f64 = 150.0;

// Innermost point is x = 580, clear of every grid column (x <= 500) by more
// than two node radii.
const CAPABILITY_CENTER: Point = Point { x: 900.0, y: 400.0 };
const CAPABILITY_INNER_RADIUS: f64 = 220.0;
const CAPABILITY_RING_WIDTH: f64 = 100.0;

/// Candidates tried per ring before moving one ring outwards
const ATTEMPTS_PER_RING: u64 = 16;
const MAX_RINGS: u64 = 64;

/// Closest two node centres may be without their circles overlapping
const MIN_SEPARATION: f64 = 2.0 * NODE_RADIUS;

const CAPABILITY_SUFFIX_LEN: usize = 6;

/// Grid position of the `index`-th module
pub fn module_position(index: usize) -> Point {
    let column = index % GRID_COLUMNS;
    let row = index / GRID_COLUMNS;
    Point::new(
        GRID_ORIGIN + column as f64 * COLUMN_SPACING,
        GRID_ORIGIN + row as f64 * ROW_SPACING,
    )
}

/// Deterministic scatter position for a capability node
///
/// Takes the first hashed candidate that keeps two node radii from every
/// point in `occupied`. Candidates move one ring outwards every few misses,
/// so crowded layouts spread out instead of stacking.
pub fn capability_position(id: &str, occupied: &[Point]) -> Point {
    let seed = fnv1a(id.as_bytes());

    let free = (0..ATTEMPTS_PER_RING * MAX_RINGS)
        .map(|attempt| capability_candidate(seed, attempt))
        .find(|&candidate| is_free(candidate, occupied));

    free.unwrap_or_else(|| {
        tracing::warn!("No free position for capability {}, overlapping", id);
        capability_candidate(seed, 0)
    })
}

fn capability_candidate(seed: u64, attempt: u64) -> Point {
    let hash = mix(seed.wrapping_add(attempt.wrapping_mul(GOLDEN_GAMMA)));
    let ring = (attempt / ATTEMPTS_PER_RING) as f64;

    let angle = unit(hash as u32) * TAU;
    let radius = CAPABILITY_INNER_RADIUS
        + (ring + unit((hash >> 32) as u32)) * CAPABILITY_RING_WIDTH;

    Point::new(
        CAPABILITY_CENTER.x + radius * angle.cos(),
        CAPABILITY_CENTER.y + radius * angle.sin(),
    )
}

fn is_free(candidate: Point, occupied: &[Point]) -> bool {
    occupied
        .iter()
        .all(|&p| p.distance(candidate) >= MIN_SEPARATION)
}

/// `"Capability "` followed by the last six characters of the id
pub fn capability_name(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    let start = chars.len().saturating_sub(CAPABILITY_SUFFIX_LEN);
    let suffix: String = chars[start..].iter().collect();
    format!("Capability {}", suffix)
}

/// Map to [0, 1)
fn unit(bits: u32) -> f64 {
    bits as f64 / (u32::MAX as f64 + 1.0)
}

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// splitmix64 finalizer; FNV alone barely moves the high bits when only the
/// last byte differs
fn mix(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// 64-bit FNV-1a
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET_BASIS, |hash, &b| {
        (hash ^ b as u64).wrapping_mul(PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_wraps_every_three() {
        assert_eq!(module_position(0), Point::new(100.0, 100.0));
        assert_eq!(module_position(2), Point::new(500.0, 100.0));
        assert_eq!(module_position(3), Point::new(100.0, 250.0));
        assert_eq!(module_position(7), Point::new(300.0, 400.0));
    }

    #[test]
    fn test_capability_name_suffix() {
        assert_eq!(
            capability_name("5f1c9a2e-0000-4000-8000-00000abc123f"),
            "Capability bc123f"
        );
        assert_eq!(capability_name("abc"), "Capability abc");
        assert_eq!(capability_name(""), "Capability ");
    }

    fn place_all(ids: &[String], occupied: &mut Vec<Point>) -> Vec<Point> {
        ids.iter()
            .map(|id| {
                let p = capability_position(id, occupied);
                occupied.push(p);
                p
            })
            .collect()
    }

    fn assert_separated(points: &[Point]) {
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                assert!(a.distance(*b) >= MIN_SEPARATION, "{:?} and {:?} overlap", a, b);
            }
        }
    }

    #[test]
    fn test_capability_position_is_stable() {
        let a = capability_position("cap-auth-service", &[]);
        let b = capability_position("cap-auth-service", &[]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_last_character_moves_position() {
        let a = capability_position("cap-auth-1", &[]);
        let b = capability_position("cap-auth-2", &[]);
        let c = capability_position("cap-auth-3", &[]);
        assert!(a.distance(b) > 1.0);
        assert!(a.distance(c) > 1.0);
        assert!(b.distance(c) > 1.0);
    }

    #[test]
    fn test_sibling_ids_do_not_overlap() {
        let ids: Vec<String> = (1..=3).map(|i| format!("cap-auth-{}", i)).collect();
        let placed = place_all(&ids, &mut Vec::new());
        assert_separated(&placed);
    }

    #[test]
    fn test_many_capabilities_avoid_modules_and_each_other() {
        let modules: Vec<Point> = (0..9).map(module_position).collect();
        let ids: Vec<String> = (0..200).map(|i| format!("cap-{:04}", i)).collect();

        let mut occupied = modules.clone();
        let placed = place_all(&ids, &mut occupied);

        assert_separated(&occupied);
        assert_eq!(placed.len(), 200);
    }

    #[test]
    fn test_first_candidate_clear_of_module_rows() {
        let modules: Vec<Point> = (0..30).map(module_position).collect();
        for i in 0..200 {
            let p = capability_position(&format!("cap-{:04}", i), &[]);
            for m in &modules {
                assert!(p.distance(*m) >= MIN_SEPARATION, "cap-{:04} on module slot {:?}", i, m);
            }
        }
    }

    #[test]
    fn test_first_candidate_in_annulus() {
        for id in ["x", "cap-1", "cap-2", "a-very-long-capability-identifier", ""] {
            let distance = capability_position(id, &[]).distance(CAPABILITY_CENTER);
            let outer = CAPABILITY_INNER_RADIUS + CAPABILITY_RING_WIDTH;
            assert!(distance >= CAPABILITY_INNER_RADIUS - 1e-9, "{} too close", id);
            assert!(distance < outer + 1e-9, "{} too far", id);
        }
    }

    #[test]
    fn test_crowded_candidate_moves_outwards() {
        let first = capability_position("cap-crowded", &[]);
        let second = capability_position("cap-crowded", &[first]);
        assert!(second.distance(first) >= MIN_SEPARATION);
    }

    #[test]
    fn test_fnv_reference_values() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }
}
