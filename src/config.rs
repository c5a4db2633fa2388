//! Tunable thresholds for the recognition pipeline.
//!
//! Every heuristic constant that depends on the ink's scale or on empirical
//! tuning lives here instead of being inlined at its call site.

use std::f64::consts::FRAC_PI_4;

/// Below this ratio of areas the larger symbol of a pair is treated as the
/// "big" side of a grammar relation; at or above it the pair keeps its
/// left-to-right order.
pub const GRAMMAR_AREA_RATIO: f64 = 0.6;

/// Default maximum number of strokes that may form a single symbol.
pub const DEFAULT_MAX_TRACES_IN_SYMBOL: usize = 3;

// ─── Geometry ─────────────────────────────────────────────────────────────────

/// Proximity test used to decide whether two strokes touch.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapConfig {
    /// Polylines closer than this are considered touching.
    pub tolerance: f64,
    /// A single-point stroke is treated as a disc of this radius.
    pub dot_radius: f64,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            tolerance: 1.5,
            dot_radius: 10.0,
        }
    }
}

// ─── Partitioner ──────────────────────────────────────────────────────────────

/// Geometric and classifier thresholds for detecting the two strokes of `=`.
#[derive(Debug, Clone, PartialEq)]
pub struct EqualsHeuristic {
    /// The classifier must report EQUALS with a confidence above this.
    pub min_confidence: f64,
    /// Each stroke's height must not exceed this fraction of its width.
    pub max_height_ratio: f64,
    /// Absolute slope limit (radians) between a stroke's outer points.
    pub max_slope: f64,
    /// Minimum distance between strokes must stay below `factor * min(width)`.
    pub distance_factor: f64,
    /// Width difference must stay below `factor * min(width)`.
    pub width_difference_factor: f64,
}

impl Default for EqualsHeuristic {
    fn default() -> Self {
        Self {
            min_confidence: 0.50,
            max_height_ratio: 0.40,
            max_slope: FRAC_PI_4,
            distance_factor: 1.0,
            width_difference_factor: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartitionerConfig {
    pub max_traces_in_symbol: usize,
    pub overlap: OverlapConfig,
    pub equals: EqualsHeuristic,
    /// A new stroke only extends a horizontal line into `=` when the line is
    /// at least this fraction of the stroke's width.
    pub append_width_ratio: f64,
    /// Confidence assigned to single-point strokes without consulting the classifier.
    pub dot_confidence: f64,
}

impl Default for PartitionerConfig {
    fn default() -> Self {
        Self {
            max_traces_in_symbol: DEFAULT_MAX_TRACES_IN_SYMBOL,
            overlap: OverlapConfig::default(),
            equals: EqualsHeuristic::default(),
            append_width_ratio: 0.5,
            dot_confidence: 1.0,
        }
    }
}

// ─── Grammar ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct GrammarConfig {
    /// See [`GRAMMAR_AREA_RATIO`].
    pub area_ratio: f64,
    /// Lower bound on fixed-point passes; the effective cap is never below
    /// the number of symbol pairs plus one.
    pub max_passes: usize,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            area_ratio: GRAMMAR_AREA_RATIO,
            max_passes: 64,
        }
    }
}

// ─── Diagnostics ──────────────────────────────────────────────────────────────

/// Controls how chatty the pipeline is through the `log` facade.
///
/// Per-path and per-partition messages are only built when `verbose` is set;
/// recovered failures are always reported at `warn`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosticsConfig {
    pub verbose: bool,
}

// ─── Engine ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub partitioner: PartitionerConfig,
    pub grammar: GrammarConfig,
    pub diagnostics: DiagnosticsConfig,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_traces_in_symbol(mut self, max: usize) -> Self {
        self.partitioner.max_traces_in_symbol = max;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.diagnostics.verbose = verbose;
        self
    }
}
