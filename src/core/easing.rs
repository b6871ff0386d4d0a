//! Easing curves applied to phase-local progress.
//!
//! Every curve maps `0 -> 0` and `1 -> 1` exactly, so a track that is
//! continuous in linear time stays continuous once eased.

use std::f64::consts::PI;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChoreoError, ChoreoResult};

const BEZIER_EPSILON: f64 = 1e-7;
const BEZIER_NEWTON_ITERATIONS: usize = 8;
const BEZIER_BISECTION_ITERATIONS: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EaseDirection {
    In,
    #[default]
    Out,
    InOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// `powerN` family: `degree` 1 is quadratic, 2 cubic, 3 quartic, 4 quintic.
    Power { degree: u8, direction: EaseDirection },
    Sine(EaseDirection),
    Expo(EaseDirection),
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Easing {
    pub const EASE: Self = Self::CubicBezier {
        x1: 0.25,
        y1: 0.1,
        x2: 0.25,
        y2: 1.0,
    };
    pub const EASE_IN: Self = Self::CubicBezier {
        x1: 0.42,
        y1: 0.0,
        x2: 1.0,
        y2: 1.0,
    };
    pub const EASE_OUT: Self = Self::CubicBezier {
        x1: 0.0,
        y1: 0.0,
        x2: 0.58,
        y2: 1.0,
    };
    pub const EASE_IN_OUT: Self = Self::CubicBezier {
        x1: 0.42,
        y1: 0.0,
        x2: 0.58,
        y2: 1.0,
    };

    #[must_use]
    pub const fn power(degree: u8, direction: EaseDirection) -> Self {
        Self::Power { degree, direction }
    }

    pub fn validate(self) -> ChoreoResult<()> {
        match self {
            Self::Power { degree, .. } if degree > 8 => Err(ChoreoError::InvalidData(format!(
                "power easing degree must be <= 8, got {degree}"
            ))),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                if ![x1, y1, x2, y2].iter().all(|value| value.is_finite()) {
                    return Err(ChoreoError::InvalidData(
                        "cubic-bezier control points must be finite".to_owned(),
                    ));
                }
                if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
                    return Err(ChoreoError::InvalidData(
                        "cubic-bezier x control points must be in [0, 1]".to_owned(),
                    ));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Eases `t`, clamped into `[0, 1]` first.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Self::Linear => t,
            Self::Power { degree, direction } => {
                let exponent = i32::from(degree) + 1;
                directional(direction, t, |x| x.powi(exponent))
            }
            Self::Sine(direction) => directional(direction, t, |x| 1.0 - (x * PI / 2.0).cos()),
            Self::Expo(direction) => directional(direction, t, |x| {
                if x <= 0.0 {
                    0.0
                } else {
                    2.0_f64.powf(10.0 * (x - 1.0))
                }
            }),
            Self::CubicBezier { x1, y1, x2, y2 } => solve_cubic_bezier(x1, y1, x2, y2, t),
        }
    }
}

/// Builds out/in-out variants from an ease-in curve.
fn directional(direction: EaseDirection, t: f64, ease_in: impl Fn(f64) -> f64) -> f64 {
    match direction {
        EaseDirection::In => ease_in(t),
        EaseDirection::Out => 1.0 - ease_in(1.0 - t),
        EaseDirection::InOut => {
            if t < 0.5 {
                ease_in(t * 2.0) / 2.0
            } else {
                1.0 - ease_in((1.0 - t) * 2.0) / 2.0
            }
        }
    }
}

fn bezier_component(t: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - t;
    3.0 * inv * inv * t * p1 + 3.0 * inv * t * t * p2 + t * t * t
}

fn bezier_component_derivative(t: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - t;
    3.0 * inv * inv * p1 + 6.0 * inv * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

fn solve_cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    let mut t = x;
    for _ in 0..BEZIER_NEWTON_ITERATIONS {
        let error = bezier_component(t, x1, x2) - x;
        if error.abs() < BEZIER_EPSILON {
            return bezier_component(t, y1, y2);
        }
        let slope = bezier_component_derivative(t, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        t -= error / slope;
    }

    // Newton failed to converge; fall back to bisection on the monotone x curve.
    let (mut low, mut high) = (0.0, 1.0);
    t = x;
    for _ in 0..BEZIER_BISECTION_ITERATIONS {
        let value = bezier_component(t, x1, x2);
        if (value - x).abs() < BEZIER_EPSILON {
            break;
        }
        if value < x {
            low = t;
        } else {
            high = t;
        }
        t = (low + high) / 2.0;
    }
    bezier_component(t, y1, y2)
}

fn parse_direction(raw: Option<&str>) -> Result<EaseDirection, String> {
    match raw {
        None | Some("out") => Ok(EaseDirection::Out),
        Some("in") => Ok(EaseDirection::In),
        Some("inOut") | Some("inout") => Ok(EaseDirection::InOut),
        Some(other) => Err(format!("unknown ease direction `{other}`")),
    }
}

fn parse_cubic_bezier(args: &str) -> Result<Easing, String> {
    let values = args
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|e| e.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    let &[x1, y1, x2, y2] = values.as_slice() else {
        return Err("cubic-bezier takes four numbers".to_owned());
    };
    Ok(Easing::CubicBezier { x1, y1, x2, y2 })
}

impl FromStr for Easing {
    type Err = ChoreoError;

    /// Accepts GSAP-style names (`none`, `power2.out`, `sine.inOut`) and
    /// CSS timing keywords (`ease-in-out`, `cubic-bezier(a, b, c, d)`).
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        let parsed = match input {
            "none" | "linear" => Ok(Self::Linear),
            "ease" => Ok(Self::EASE),
            "ease-in" => Ok(Self::EASE_IN),
            "ease-out" => Ok(Self::EASE_OUT),
            "ease-in-out" => Ok(Self::EASE_IN_OUT),
            _ => {
                if let Some(args) = input
                    .strip_prefix("cubic-bezier(")
                    .and_then(|rest| rest.strip_suffix(')'))
                {
                    parse_cubic_bezier(args)
                } else {
                    let (family, direction) = match input.split_once('.') {
                        Some((family, direction)) => (family, Some(direction)),
                        None => (input, None),
                    };
                    parse_direction(direction).and_then(|direction| match family {
                        "sine" => Ok(Self::Sine(direction)),
                        "expo" => Ok(Self::Expo(direction)),
                        "quad" => Ok(Self::power(1, direction)),
                        "cubic" => Ok(Self::power(2, direction)),
                        "quart" => Ok(Self::power(3, direction)),
                        "quint" => Ok(Self::power(4, direction)),
                        _ => family
                            .strip_prefix("power")
                            .and_then(|degree| degree.parse::<u8>().ok())
                            .map(|degree| {
                                if degree == 0 {
                                    Self::Linear
                                } else {
                                    Self::power(degree, direction)
                                }
                            })
                            .ok_or_else(|| format!("unknown ease `{input}`")),
                    })
                }
            }
        };

        let easing = parsed.map_err(|reason| {
            ChoreoError::InvalidData(format!("failed to parse easing `{input}`: {reason}"))
        })?;
        easing.validate()?;
        Ok(easing)
    }
}
