//! Build parameters for the kd-tree.

use serde::{Deserialize, Serialize};

use crate::error::{KdError, Result};

/// Tuning parameters for kd-tree construction.
///
/// The cost constants feed the surface area heuristic; only their relative
/// weighting matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Cost of one traversal step through an internal node.
    pub traversal_cost: f64,
    /// Cost of one ray-triangle intersection test.
    pub intersection_cost: f64,
    /// Multiplier applied to a split that leaves one side empty.
    pub empty_bonus: f64,
    /// Nodes at this depth always become leaves.
    pub max_depth: u8,
    /// Nodes with at most this many triangles always become leaves.
    pub max_leaf_triangles: usize,
    /// Build independent subtrees on the rayon thread pool.
    pub parallel: bool,
    /// Only fork a subtree build when the node holds at least this many triangles.
    pub parallel_min_triangles: usize,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            traversal_cost: 2.0,
            intersection_cost: 1.0,
            empty_bonus: 0.8,
            max_depth: 20,
            max_leaf_triangles: 1,
            parallel: false,
            parallel_min_triangles: 1024,
        }
    }
}

impl BuildSettings {
    /// Parse settings from a TOML document.
    ///
    /// Missing keys take their default values. The parsed settings are
    /// validated before being returned.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let settings: Self =
            toml::from_str(source).map_err(|e| KdError::SettingsParse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !self.traversal_cost.is_finite() || self.traversal_cost <= 0.0 {
            return Err(KdError::InvalidSettings(
                "traversal_cost must be positive".into(),
            ));
        }
        if !self.intersection_cost.is_finite() || self.intersection_cost <= 0.0 {
            return Err(KdError::InvalidSettings(
                "intersection_cost must be positive".into(),
            ));
        }
        if !(self.empty_bonus > 0.0 && self.empty_bonus <= 1.0) {
            return Err(KdError::InvalidSettings(
                "empty_bonus must be in (0, 1]".into(),
            ));
        }
        if self.max_depth == 0 || self.max_depth > 64 {
            return Err(KdError::InvalidSettings(
                "max_depth must be between 1 and 64".into(),
            ));
        }
        Ok(())
    }
}
