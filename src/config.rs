//! Analysis configuration.
//!
//! Defaults reproduce the reference thresholds. A config can be loaded from
//! JSON (missing fields take defaults) or from environment overrides.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Which joint taxonomy a run classifies with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    #[default]
    WeldSeam,
    CornerJoint,
}

impl std::str::FromStr for ClassificationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "weld_seam" | "weld" => Ok(Self::WeldSeam),
            "corner_joint" | "corner" => Ok(Self::CornerJoint),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

/// A closed angle interval in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleWindow {
    pub min: f64,
    pub max: f64,
}

impl AngleWindow {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive on both ends.
    #[must_use]
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.min && angle <= self.max
    }

    fn validate(&self, name: &'static str) -> std::result::Result<(), ConfigError> {
        let ok = self.min.is_finite() && self.max.is_finite() && self.min <= self.max;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidWindow {
                name,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Thresholds for the weld-seam taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeldSeamParams {
    pub fillet: AngleWindow,
    pub tshape: AngleWindow,
    pub butt: AngleWindow,
    /// Largest dihedral angle still treated as an overlap.
    pub lap_max_angle: f64,
    /// Minimum edge length for a candidate (and for BUTT).
    pub min_length: f64,
    pub require_linear: bool,
    pub require_planar: bool,
}

impl Default for WeldSeamParams {
    fn default() -> Self {
        Self {
            fillet: AngleWindow::new(60.0, 120.0),
            tshape: AngleWindow::new(85.0, 95.0),
            butt: AngleWindow::new(150.0, 180.0),
            lap_max_angle: 30.0,
            min_length: 5.0,
            require_linear: true,
            require_planar: true,
        }
    }
}

/// Thresholds for the corner-joint taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerJointParams {
    pub window: AngleWindow,
    pub optimal_angle: f64,
    /// Sub-window labelled L corner; the rest of `window` is V corner.
    pub l_window: AngleWindow,
    pub min_joint_length: f64,
    /// Edges longer than this earn the quality length bonus.
    pub long_joint_length: f64,
    /// Length at which the confidence length score saturates.
    pub length_normalizer: f64,
    pub require_linear: bool,
    pub require_planar: bool,
}

impl Default for CornerJointParams {
    fn default() -> Self {
        Self {
            window: AngleWindow::new(70.0, 110.0),
            optimal_angle: 90.0,
            l_window: AngleWindow::new(85.0, 95.0),
            min_joint_length: 10.0,
            long_joint_length: 30.0,
            length_normalizer: 50.0,
            require_linear: true,
            require_planar: true,
        }
    }
}

/// Full configuration for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub mode: ClassificationMode,
    pub weld_seam: WeldSeamParams,
    pub corner_joint: CornerJointParams,
    /// Emit the angle-only seam hint list alongside the classified joints.
    pub seam_hints: bool,
    /// Copied into the document metadata.
    pub source_name: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            mode: ClassificationMode::default(),
            weld_seam: WeldSeamParams::default(),
            corner_joint: CornerJointParams::default(),
            seam_hints: true,
            source_name: None,
        }
    }
}

impl AnalysisConfig {
    /// Parses a JSON config; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a serialization error for malformed JSON or a config error if
    /// the result fails [`AnalysisConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `BREPJOINT_MODE`, `BREPJOINT_MIN_JOINT_LENGTH`
    /// and `BREPJOINT_SEAM_HINTS`.
    ///
    /// # Errors
    ///
    /// Returns a config error if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Like [`AnalysisConfig::from_env`] with a custom variable lookup.
    ///
    /// # Errors
    ///
    /// Returns a config error if a variable is set to an unparsable value.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("BREPJOINT_MODE") {
            config.mode = raw.parse()?;
        }

        if let Some(raw) = lookup("BREPJOINT_MIN_JOINT_LENGTH") {
            let len: f64 = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                variable: "BREPJOINT_MIN_JOINT_LENGTH",
                value: raw.clone(),
            })?;
            config.weld_seam.min_length = len;
            config.corner_joint.min_joint_length = len;
        }

        if let Some(raw) = lookup("BREPJOINT_SEAM_HINTS") {
            config.seam_hints = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        variable: "BREPJOINT_SEAM_HINTS",
                        value: raw,
                    }
                    .into())
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Rejects inverted or non-finite windows and negative lengths.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let w = &self.weld_seam;
        w.fillet.validate("weld_seam.fillet")?;
        w.tshape.validate("weld_seam.tshape")?;
        w.butt.validate("weld_seam.butt")?;
        non_negative("weld_seam.lap_max_angle", w.lap_max_angle)?;
        non_negative("weld_seam.min_length", w.min_length)?;

        let c = &self.corner_joint;
        c.window.validate("corner_joint.window")?;
        c.l_window.validate("corner_joint.l_window")?;
        non_negative("corner_joint.min_joint_length", c.min_joint_length)?;
        non_negative("corner_joint.long_joint_length", c.long_joint_length)?;
        if !(c.length_normalizer > 0.0 && c.length_normalizer.is_finite()) {
            return Err(ConfigError::NegativeLength {
                name: "corner_joint.length_normalizer",
                value: c.length_normalizer,
            });
        }
        Ok(())
    }
}

fn non_negative(name: &'static str, value: f64) -> std::result::Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NegativeLength { name, value })
    }
}
