//! Documented constants for the graph builder
//!
//! All tunable parameters in one place. Centralizing constants prevents
//! magic numbers scattered across the builder and keeps the UI contract
//! (bucket thresholds, caps) explicit.

// =============================================================================
// CO-OCCURRENCE WEIGHTING
// =============================================================================

/// Co-occurrence count at which an inferred edge reaches full weight (1.0).
///
/// Weight is a saturating-linear curve: `weight = min(count / K, 1.0)`.
/// This drives visual edge thickness only and carries no statistical
/// confidence semantics.
pub const COOCCURRENCE_SATURATION: u32 = 5;

// =============================================================================
// RESULT ASSEMBLY CAPS
// =============================================================================

/// Maximum nodes in an assembled graph (default).
///
/// The impact map is a UI-scale visualization; beyond ~30 nodes the
/// force-directed layout becomes unreadable. Highest mention counts win.
pub const MAX_GRAPH_NODES: usize = 30;

/// Maximum edges in an assembled graph (default).
///
/// Applied after sorting by weight descending so the strongest connections
/// survive the cut.
pub const MAX_GRAPH_EDGES: usize = 50;

// =============================================================================
// STRENGTH BUCKETS (UI CONTRACT)
// =============================================================================

/// Weights at or above this render as "Strong".
///
/// Exact threshold — the entity profile page and map legend depend on it,
/// so tests pin the boundary values.
pub const STRENGTH_STRONG_THRESHOLD: f32 = 0.7;

/// Weights at or above this (and below strong) render as "Moderate".
pub const STRENGTH_MODERATE_THRESHOLD: f32 = 0.4;

// =============================================================================
// FETCH / INPUT CAPS
// =============================================================================

/// Maximum mention rows consumed per build.
///
/// The builder is request-scoped; callers page their data and this cap
/// bounds the C(n,2) pair enumeration on pathological inputs.
pub const MAX_MENTIONS_PER_BUILD: usize = 5_000;

/// Default number of trending entities returned.
pub const DEFAULT_TRENDING_LIMIT: usize = 5;

/// Maximum trending entities a caller may request.
pub const MAX_TRENDING_LIMIT: usize = 100;
