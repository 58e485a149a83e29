//! Layout options and their defaults
//!
//! Defaults follow d3-force: velocity damping of
//! 0.6, an alpha floor of 0.001 and a decay rate that cools from 1 to that
//! floor in 300 ticks.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

// =============================================================================
// Default Constants
// =============================================================================

/// Default rest length of a link spring
pub const DEFAULT_LINK_DISTANCE: f64 = 80.0;

/// Default charge for many-body repulsion (negative = repulsion)
pub const DEFAULT_CHARGE: f64 = -100.0;

/// Default extra radius added to every node for collision
pub const DEFAULT_COLLISION_PADDING: f64 = 0.0;

/// Default velocity damping factor (velocity is multiplied by this each tick)
pub const DEFAULT_VELOCITY_DAMPING: f64 = 0.6;

/// Default minimum alpha before the simulation settles
pub const DEFAULT_ALPHA_MIN: f64 = 0.001;

/// Default number of ticks for alpha to cool from 1 to `DEFAULT_ALPHA_MIN`
pub const DEFAULT_ALPHA_DECAY_TICKS: f64 = 300.0;

/// Default centering strength
pub const DEFAULT_CENTER_STRENGTH: f64 = 1.0;

/// Alpha target used while a node is being dragged
pub const DEFAULT_REHEAT_ALPHA_TARGET: f64 = 0.3;

/// Default number of collision relaxation passes per tick
pub const DEFAULT_COLLISION_ITERATIONS: usize = 8;

/// Overlap below which collision passes stop early
pub const DEFAULT_COLLISION_TOLERANCE: f64 = 0.01;

/// Default minimum distance for force calculations (avoids singularity)
pub const DEFAULT_DISTANCE_MIN: f64 = 1.0;

/// Default alpha decay: `1 - alpha_min^(1/300)`, roughly 0.0228
pub fn default_alpha_decay() -> f64 {
    1.0 - DEFAULT_ALPHA_MIN.powf(1.0 / DEFAULT_ALPHA_DECAY_TICKS)
}

/// Tunable parameters of a layout.
///
/// Every field has a default, so a partial document such as
/// `{ "link_distance": 60 }` deserializes into a complete set of options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Rest length of every link spring
    pub link_distance: f64,
    /// Many-body strength (negative = repulsion)
    pub charge_strength: f64,
    /// Extra radius added to each node's collision disk
    pub collision_padding: f64,
    /// Fraction of the gap to the alpha target closed each tick
    pub alpha_decay: f64,
    /// Velocity multiplier applied after integration
    pub velocity_damping: f64,
    /// Alpha at or below which the simulation settles
    pub alpha_min: f64,
    /// Centering strength
    pub center_strength: f64,
    /// Alpha target while a drag is active
    pub reheat_alpha_target: f64,
    /// Maximum collision relaxation passes per tick
    pub collision_iterations: usize,
    /// Largest overlap tolerated before another collision pass runs
    pub collision_tolerance: f64,
    /// Minimum pairwise distance used by the charge force
    pub distance_min: f64,
    /// Barnes-Hut threshold; `None` computes repulsion pair by pair
    pub theta: Option<f64>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            link_distance: DEFAULT_LINK_DISTANCE,
            charge_strength: DEFAULT_CHARGE,
            collision_padding: DEFAULT_COLLISION_PADDING,
            alpha_decay: default_alpha_decay(),
            velocity_damping: DEFAULT_VELOCITY_DAMPING,
            alpha_min: DEFAULT_ALPHA_MIN,
            center_strength: DEFAULT_CENTER_STRENGTH,
            reheat_alpha_target: DEFAULT_REHEAT_ALPHA_TARGET,
            collision_iterations: DEFAULT_COLLISION_ITERATIONS,
            collision_tolerance: DEFAULT_COLLISION_TOLERANCE,
            distance_min: DEFAULT_DISTANCE_MIN,
            theta: None,
        }
    }
}

impl LayoutOptions {
    /// Use the Barnes-Hut approximation with the given theta
    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = Some(theta);
        self
    }

    /// Check every option for a usable range.
    pub fn validate(&self) -> Result<()> {
        fn check(ok: bool, msg: &str) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(LayoutError::InvalidOptions(msg.to_string()))
            }
        }

        check(
            self.link_distance.is_finite() && self.link_distance >= 0.0,
            "link_distance must be a non-negative number",
        )?;
        check(
            self.charge_strength.is_finite(),
            "charge_strength must be finite",
        )?;
        check(
            self.collision_padding.is_finite() && self.collision_padding >= 0.0,
            "collision_padding must be a non-negative number",
        )?;
        check(
            self.alpha_decay > 0.0 && self.alpha_decay <= 1.0,
            "alpha_decay must be in (0, 1]",
        )?;
        check(
            (0.0..=1.0).contains(&self.velocity_damping),
            "velocity_damping must be in [0, 1]",
        )?;
        check(
            self.alpha_min > 0.0 && self.alpha_min < 1.0,
            "alpha_min must be in (0, 1)",
        )?;
        check(
            self.center_strength.is_finite() && self.center_strength >= 0.0,
            "center_strength must be a non-negative number",
        )?;
        check(
            self.reheat_alpha_target > 0.0 && self.reheat_alpha_target <= 1.0,
            "reheat_alpha_target must be in (0, 1]",
        )?;
        check(
            self.collision_tolerance.is_finite() && self.collision_tolerance >= 0.0,
            "collision_tolerance must be a non-negative number",
        )?;
        check(
            self.distance_min.is_finite() && self.distance_min > 0.0,
            "distance_min must be positive",
        )?;
        if let Some(theta) = self.theta {
            check(
                theta.is_finite() && theta > 0.0,
                "theta must be positive",
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_decay_cools_in_about_300_ticks() {
        let decay = default_alpha_decay();
        assert!((decay - 0.0228).abs() < 1e-4, "decay = {decay}");

        let alpha = (1.0 - decay).powf(DEFAULT_ALPHA_DECAY_TICKS);
        assert!((alpha - DEFAULT_ALPHA_MIN).abs() < 1e-9);
    }

    #[test]
    fn defaults_validate() {
        assert!(LayoutOptions::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let options = LayoutOptions {
            alpha_decay: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(LayoutError::InvalidOptions(_))
        ));

        let options = LayoutOptions {
            velocity_damping: 1.5,
            ..Default::default()
        };
        assert!(options.validate().is_err());

        let options = LayoutOptions::default().with_theta(-0.5);
        assert!(options.validate().is_err());
    }

    #[test]
    fn drag_reheat_must_be_positive() {
        let options = LayoutOptions {
            reheat_alpha_target: 0.0,
            ..Default::default()
        };
        assert_eq!(
            options.validate(),
            Err(LayoutError::InvalidOptions(
                "reheat_alpha_target must be in (0, 1]".to_string()
            ))
        );
    }

    #[test]
    fn partial_document_fills_defaults() {
        let options: LayoutOptions =
            serde_json::from_str(r#"{ "link_distance": 60, "theta": 0.9 }"#).unwrap();
        assert_eq!(options.link_distance, 60.0);
        assert_eq!(options.theta, Some(0.9));
        assert_eq!(options.charge_strength, DEFAULT_CHARGE);
        assert_eq!(options.velocity_damping, DEFAULT_VELOCITY_DAMPING);
    }
}
