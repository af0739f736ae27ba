//! Easing functions for animations

use serde::{Deserialize, Serialize};

/// Easing function type
///
/// Named variants mirror CSS `transition-timing-function` keywords so the same
/// value can drive a numeric ramp or be written into an inline transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    #[default]
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseOutCubic,
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            _ => {
                let (x1, y1, x2, y2) = self.control_points();
                solve_cubic_bezier(t, x1, y1, x2, y2)
            }
        }
    }

    /// Control points of the equivalent CSS cubic-bezier curve
    pub fn control_points(&self) -> (f64, f64, f64, f64) {
        match *self {
            Easing::Linear => (0.0, 0.0, 1.0, 1.0),
            Easing::Ease => (0.25, 0.1, 0.25, 1.0),
            Easing::EaseIn => (0.42, 0.0, 1.0, 1.0),
            Easing::EaseOut => (0.0, 0.0, 0.58, 1.0),
            Easing::EaseInOut => (0.42, 0.0, 0.58, 1.0),
            Easing::EaseOutCubic => (0.33, 1.0, 0.68, 1.0),
            Easing::CubicBezier(x1, y1, x2, y2) => (x1, y1, x2, y2),
        }
    }

    /// CSS timing-function text (`ease`, `cubic-bezier(...)`)
    pub fn to_css(&self) -> String {
        match self {
            Easing::Linear => "linear".to_string(),
            Easing::Ease => "ease".to_string(),
            Easing::EaseIn => "ease-in".to_string(),
            Easing::EaseOut => "ease-out".to_string(),
            Easing::EaseInOut => "ease-in-out".to_string(),
            _ => {
                let (x1, y1, x2, y2) = self.control_points();
                format!("cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }
}

/// Evaluate a CSS cubic-bezier timing curve at time `t`.
///
/// Finds the curve parameter whose x equals `t` (Newton steps, bisection when
/// the slope flattens), then returns the y at that parameter.
fn solve_cubic_bezier(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    const EPSILON: f64 = 1e-7;

    let mut p = t;
    for _ in 0..8 {
        let error = bezier_component(p, x1, x2) - t;
        if error.abs() < EPSILON {
            return bezier_component(p, y1, y2);
        }
        let slope = bezier_derivative(p, x1, x2);
        if slope.abs() < EPSILON {
            break;
        }
        p -= error / slope;
    }

    let (mut low, mut high) = (0.0_f64, 1.0_f64);
    p = t;
    for _ in 0..32 {
        let x = bezier_component(p, x1, x2);
        if (x - t).abs() < EPSILON {
            break;
        }
        if x < t {
            low = p;
        } else {
            high = p;
        }
        p = 0.5 * (low + high);
    }

    bezier_component(p, y1, y2)
}

/// One axis of a bezier with endpoints fixed at 0 and 1
#[inline]
fn bezier_component(p: f64, c1: f64, c2: f64) -> f64 {
    let a = 1.0 - 3.0 * c2 + 3.0 * c1;
    let b = 3.0 * c2 - 6.0 * c1;
    let c = 3.0 * c1;
    ((a * p + b) * p + c) * p
}

#[inline]
fn bezier_derivative(p: f64, c1: f64, c2: f64) -> f64 {
    let a = 1.0 - 3.0 * c2 + 3.0 * c1;
    let b = 3.0 * c2 - 6.0 * c1;
    let c = 3.0 * c1;
    (3.0 * a * p + 2.0 * b) * p + c
}
