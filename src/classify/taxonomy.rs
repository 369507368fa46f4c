use serde::{Deserialize, Serialize};

use crate::config::{AngleWindow, CornerJointParams, WeldSeamParams};
use crate::extract::{CurveCategory, SurfaceCategory};

/// Joint type assigned to a candidate edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JointLabel {
    #[serde(rename = "FILLET")]
    Fillet,
    #[serde(rename = "TSHAPE")]
    TShape,
    #[serde(rename = "BUTT")]
    Butt,
    #[serde(rename = "LAP")]
    Lap,
    #[serde(rename = "L_CORNER")]
    LCorner,
    #[serde(rename = "V_CORNER")]
    VCorner,
}

/// How a matched rule scores its candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfidenceFn {
    Fixed(f64),
    /// `max(floor, 1 - |angle - ideal| / falloff)`.
    Linear { ideal: f64, falloff: f64, floor: f64 },
    /// Weighted mix of angle closeness and length, clamped to `[0, 1]`.
    Corner {
        optimal: f64,
        falloff: f64,
        length_norm: f64,
    },
}

const CORNER_ANGLE_WEIGHT: f64 = 0.7;
const CORNER_LENGTH_WEIGHT: f64 = 0.3;

impl ConfidenceFn {
    #[must_use]
    pub fn score(&self, angle: f64, length: f64) -> f64 {
        match *self {
            Self::Fixed(c) => c,
            Self::Linear {
                ideal,
                falloff,
                floor,
            } => floor.max(1.0 - (angle - ideal).abs() / falloff),
            Self::Corner {
                optimal,
                falloff,
                length_norm,
            } => {
                let angle_score = (1.0 - (angle - optimal).abs() / falloff).max(0.0);
                let length_score = (length / length_norm).min(1.0);
                (CORNER_ANGLE_WEIGHT * angle_score + CORNER_LENGTH_WEIGHT * length_score)
                    .clamp(0.0, 1.0)
            }
        }
    }
}

/// One classification rule. Rules are tried in order; the first whose window
/// contains the angle and whose length floor is met wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub label: JointLabel,
    pub window: AngleWindow,
    pub min_length: Option<f64>,
    pub confidence: ConfidenceFn,
}

impl Rule {
    #[must_use]
    pub fn matches(&self, angle: f64, length: f64) -> bool {
        self.window.contains(angle) && self.min_length.map_or(true, |min| length >= min)
    }
}

/// Conditions every candidate must meet before any rule is tried.
#[derive(Debug, Clone, PartialEq)]
pub struct Prerequisites {
    pub required_curve: Option<CurveCategory>,
    pub required_surface: Option<SurfaceCategory>,
    pub min_joint_length: f64,
}

/// Corner quality score: a base plus bonuses for a near-right angle and a
/// long joint, capped at 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityFn {
    pub right_window: AngleWindow,
    pub long_length: f64,
}

impl QualityFn {
    #[must_use]
    pub fn score(&self, angle: f64, length: f64) -> f64 {
        let mut q: f64 = 70.0;
        if self.right_window.contains(angle) {
            q += 20.0;
        }
        if length > self.long_length {
            q += 10.0;
        }
        q.min(100.0)
    }
}

/// An ordered rule set with its gate.
#[derive(Debug, Clone, PartialEq)]
pub struct Taxonomy {
    pub gate: Prerequisites,
    pub rules: Vec<Rule>,
    pub quality: Option<QualityFn>,
}

impl Taxonomy {
    /// FILLET, TSHAPE, BUTT, LAP in that order.
    ///
    /// TSHAPE's window lies inside FILLET's with the defaults, so it only
    /// fires when the fillet window is narrowed.
    #[must_use]
    pub fn weld_seam(params: &WeldSeamParams) -> Self {
        Self {
            gate: Prerequisites {
                required_curve: params.require_linear.then_some(CurveCategory::Line),
                required_surface: params.require_planar.then_some(SurfaceCategory::Plane),
                min_joint_length: params.min_length,
            },
            rules: vec![
                Rule {
                    label: JointLabel::Fillet,
                    window: params.fillet,
                    min_length: None,
                    confidence: ConfidenceFn::Linear {
                        ideal: 90.0,
                        falloff: 30.0,
                        floor: 0.5,
                    },
                },
                Rule {
                    label: JointLabel::TShape,
                    window: params.tshape,
                    min_length: None,
                    confidence: ConfidenceFn::Fixed(0.9),
                },
                Rule {
                    label: JointLabel::Butt,
                    window: params.butt,
                    min_length: Some(params.min_length),
                    confidence: ConfidenceFn::Linear {
                        ideal: 180.0,
                        falloff: 30.0,
                        floor: 0.5,
                    },
                },
                Rule {
                    label: JointLabel::Lap,
                    window: AngleWindow::new(0.0, params.lap_max_angle),
                    min_length: None,
                    confidence: ConfidenceFn::Fixed(0.6),
                },
            ],
            quality: None,
        }
    }

    /// L_CORNER inside the L window, V_CORNER anywhere else in the corner
    /// window.
    #[must_use]
    pub fn corner_joint(params: &CornerJointParams) -> Self {
        let confidence = ConfidenceFn::Corner {
            optimal: params.optimal_angle,
            falloff: 30.0,
            length_norm: params.length_normalizer,
        };
        let l_window = AngleWindow::new(
            params.l_window.min.max(params.window.min),
            params.l_window.max.min(params.window.max),
        );
        Self {
            gate: Prerequisites {
                required_curve: params.require_linear.then_some(CurveCategory::Line),
                required_surface: params.require_planar.then_some(SurfaceCategory::Plane),
                min_joint_length: params.min_joint_length,
            },
            rules: vec![
                Rule {
                    label: JointLabel::LCorner,
                    window: l_window,
                    min_length: None,
                    confidence,
                },
                Rule {
                    label: JointLabel::VCorner,
                    window: params.window,
                    min_length: None,
                    confidence,
                },
            ],
            quality: Some(QualityFn {
                right_window: params.l_window,
                long_length: params.long_joint_length,
            }),
        }
    }

    /// First matching rule, if any.
    #[must_use]
    pub fn evaluate(&self, angle: f64, length: f64) -> Option<&Rule> {
        self.rules.iter().find(|r| r.matches(angle, length))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn weld_rules_in_order() {
        let t = Taxonomy::weld_seam(&WeldSeamParams::default());
        let label = |a: f64, len: f64| t.evaluate(a, len).map(|r| r.label);
        assert_eq!(label(90.0, 10.0), Some(JointLabel::Fillet));
        assert_eq!(label(170.0, 10.0), Some(JointLabel::Butt));
        assert_eq!(label(170.0, 1.0), None);
        assert_eq!(label(10.0, 1.0), Some(JointLabel::Lap));
        assert_eq!(label(30.0, 1.0), Some(JointLabel::Lap));
        assert_eq!(label(140.0, 10.0), None);
    }

    #[test]
    fn tshape_fires_when_fillet_narrowed() {
        let params = WeldSeamParams {
            fillet: AngleWindow::new(60.0, 80.0),
            ..WeldSeamParams::default()
        };
        let t = Taxonomy::weld_seam(&params);
        let rule = t.evaluate(90.0, 10.0).unwrap();
        assert_eq!(rule.label, JointLabel::TShape);
        assert_relative_eq!(rule.confidence.score(90.0, 10.0), 0.9);
    }

    #[test]
    fn linear_confidence_is_monotone_with_floor() {
        let f = ConfidenceFn::Linear {
            ideal: 90.0,
            falloff: 30.0,
            floor: 0.5,
        };
        let mut prev = f.score(90.0, 0.0);
        assert_relative_eq!(prev, 1.0);
        for dev in 1..=30 {
            let c = f.score(90.0 + f64::from(dev), 0.0);
            assert!(c <= prev);
            assert!(c >= 0.5);
            assert_relative_eq!(c, f.score(90.0 - f64::from(dev), 0.0));
            prev = c;
        }
    }

    #[test]
    fn corner_labels_and_scores() {
        let t = Taxonomy::corner_joint(&CornerJointParams::default());
        assert_eq!(t.evaluate(90.0, 20.0).unwrap().label, JointLabel::LCorner);
        assert_eq!(t.evaluate(75.0, 20.0).unwrap().label, JointLabel::VCorner);
        assert_eq!(t.evaluate(105.0, 20.0).unwrap().label, JointLabel::VCorner);
        assert!(t.evaluate(120.0, 20.0).is_none());

        let rule = t.evaluate(90.0, 50.0).unwrap();
        assert_relative_eq!(rule.confidence.score(90.0, 50.0), 1.0);
        assert_relative_eq!(rule.confidence.score(90.0, 25.0), 0.85);
        assert_relative_eq!(rule.confidence.score(75.0, 0.0), 0.35);

        let q = t.quality.unwrap();
        assert_relative_eq!(q.score(90.0, 50.0), 100.0);
        assert_relative_eq!(q.score(90.0, 10.0), 90.0);
        assert_relative_eq!(q.score(75.0, 10.0), 70.0);
    }

    #[test]
    fn disabled_prerequisites() {
        let params = CornerJointParams {
            require_linear: false,
            require_planar: false,
            ..CornerJointParams::default()
        };
        let t = Taxonomy::corner_joint(&params);
        assert!(t.gate.required_curve.is_none());
        assert!(t.gate.required_surface.is_none());
    }
}
