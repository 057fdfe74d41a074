//! # Biome Module
//!
//! Per-column terrain parameter sets. A biome is selected by a coarse
//! secondary noise channel and controls the amplitude/frequency of the
//! height pass plus tree eligibility.

/// A terrain-generation parameter set selected per world column.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Biome {
    /// Gentle, open terrain: low amplitude, low frequency.
    Plains,
    /// Steep terrain: high amplitude.
    Hills,
    /// Plains-like elevation with tree cover.
    Forest,
}

impl Biome {
    /// Elevation swing of the detail noise octave, in blocks.
    pub fn amplitude(self) -> f64 {
        match self {
            Biome::Plains => 5.0,
            Biome::Hills => 26.0,
            Biome::Forest => 6.0,
        }
    }

    /// Sampling frequency of the detail noise octave.
    pub fn frequency(self) -> f64 {
        match self {
            Biome::Plains => 0.01,
            Biome::Hills => 0.03,
            Biome::Forest => 0.012,
        }
    }

    /// Whether the population pass may plant trees in this biome.
    pub fn grows_trees(self) -> bool {
        matches!(self, Biome::Forest)
    }
}
