//! Deterministic per-block confidence scoring.

use vanban_core::BoundaryKind;

use crate::classify::Provenance;

/// Boundary-match strength: exact numbering grammar scores highest,
/// header keywords next, special enumerations lowest.
fn boundary_strength(kind: BoundaryKind) -> f32 {
    match kind {
        BoundaryKind::Chapter
        | BoundaryKind::Article
        | BoundaryKind::Clause
        | BoundaryKind::Point => 1.0,
        BoundaryKind::Basis | BoundaryKind::Decision => 0.9,
        BoundaryKind::Special => 0.6,
    }
}

/// Classification-provenance factor. A coerced fallback zeroes the
/// block confidence.
fn provenance_factor(provenance: Provenance) -> f32 {
    match provenance {
        Provenance::Heuristic => 1.0,
        Provenance::External => 0.7,
        Provenance::Fallback => 0.0,
    }
}

/// Pure scoring function: same inputs, same value, always in [0, 1].
pub fn score(kind: BoundaryKind, provenance: Provenance) -> f32 {
    boundary_strength(kind) * provenance_factor(provenance)
}
