//! Viewport geometry and root margins

use std::fmt;
use std::str::FromStr;

use glint_core::Rect;
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{multispace0, multispace1},
    combinator::{all_consuming, opt},
    multi::separated_list1,
    number::complete::float,
    sequence::delimited,
    Finish, IResult,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The visible window onto the page
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scroll_x: f32,
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width,
            height,
        }
    }

    /// Same viewport scrolled vertically to `y`
    pub fn scrolled_to(self, y: f32) -> Self {
        Self {
            scroll_y: y.max(0.0),
            ..self
        }
    }

    /// Viewport area in page coordinates
    pub fn root_rect(&self) -> Rect {
        Rect::new(self.scroll_x, self.scroll_y, self.width, self.height)
    }

    /// Convert a client (viewport-relative) point to page coordinates
    pub fn to_page(&self, x: f32, y: f32) -> (f32, f32) {
        (x + self.scroll_x, y + self.scroll_y)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarginError {
    #[error("invalid root margin `{0}`: expected 1 to 4 lengths in px or %")]
    Invalid(String),
}

/// One side of a root margin
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MarginLength {
    Px(f32),
    /// Percentage of the root's width (left/right) or height (top/bottom)
    Percent(f32),
}

impl MarginLength {
    fn resolve(&self, basis: f32) -> f32 {
        match *self {
            MarginLength::Px(px) => px,
            MarginLength::Percent(pct) => basis * pct / 100.0,
        }
    }
}

impl Default for MarginLength {
    fn default() -> Self {
        MarginLength::Px(0.0)
    }
}

impl fmt::Display for MarginLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarginLength::Px(px) => write!(f, "{px}px"),
            MarginLength::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

/// Grows (positive) or shrinks (negative) the viewport before intersection tests.
///
/// Written with the CSS margin shorthand: `"0px 0px -50px 0px"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RootMargin {
    pub top: MarginLength,
    pub right: MarginLength,
    pub bottom: MarginLength,
    pub left: MarginLength,
}

impl RootMargin {
    /// Margin of zero on every side
    pub fn zero() -> Self {
        Self::default()
    }

    /// Pixel margin on each side
    pub fn px(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top: MarginLength::Px(top),
            right: MarginLength::Px(right),
            bottom: MarginLength::Px(bottom),
            left: MarginLength::Px(left),
        }
    }

    pub fn parse(input: &str) -> Result<Self, MarginError> {
        let invalid = || MarginError::Invalid(input.to_string());

        let (_, lengths) = all_consuming(delimited(
            multispace0,
            separated_list1(multispace1, margin_length),
            multispace0,
        ))(input)
        .finish()
        .map_err(|_: nom::error::Error<&str>| invalid())?;

        let [top, right, bottom, left] = match lengths.as_slice() {
            [all] => [*all; 4],
            [vertical, horizontal] => [*vertical, *horizontal, *vertical, *horizontal],
            [top, horizontal, bottom] => [*top, *horizontal, *bottom, *horizontal],
            [top, right, bottom, left] => [*top, *right, *bottom, *left],
            _ => return Err(invalid()),
        };

        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }

    /// Apply the margin to a root rect
    pub fn apply(&self, root: Rect) -> Rect {
        let top = self.top.resolve(root.height);
        let right = self.right.resolve(root.width);
        let bottom = self.bottom.resolve(root.height);
        let left = self.left.resolve(root.width);

        Rect::new(
            root.x - left,
            root.y - top,
            root.width + left + right,
            root.height + top + bottom,
        )
    }
}

/// Parse a length with an optional `px` / `%` suffix (unitless means px)
fn margin_length(input: &str) -> IResult<&str, MarginLength> {
    let (rest, value) = float(input)?;
    if !value.is_finite() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Float,
        )));
    }
    let (rest, unit) = opt(alt((tag_no_case("px"), tag("%"))))(rest)?;

    let length = match unit {
        Some("%") => MarginLength::Percent(value),
        _ => MarginLength::Px(value),
    };
    Ok((rest, length))
}

impl FromStr for RootMargin {
    type Err = MarginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RootMargin::parse(s)
    }
}

impl TryFrom<String> for RootMargin {
    type Error = MarginError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RootMargin::parse(&value)
    }
}

impl From<RootMargin> for String {
    fn from(margin: RootMargin) -> Self {
        margin.to_string()
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_four_values() {
        let margin = RootMargin::parse("0px 0px -50px 0px").unwrap();
        assert_eq!(margin, RootMargin::px(0.0, 0.0, -50.0, 0.0));
    }

    #[test]
    fn test_parse_shorthand_expansion() {
        assert_eq!(
            RootMargin::parse("10px").unwrap(),
            RootMargin::px(10.0, 10.0, 10.0, 10.0)
        );
        assert_eq!(
            RootMargin::parse("10px 20px").unwrap(),
            RootMargin::px(10.0, 20.0, 10.0, 20.0)
        );
        assert_eq!(
            RootMargin::parse(" 1 2 3 ").unwrap(),
            RootMargin::px(1.0, 2.0, 3.0, 2.0)
        );
    }

    #[test]
    fn test_parse_percent() {
        let margin = RootMargin::parse("10%").unwrap();
        assert_eq!(margin.top, MarginLength::Percent(10.0));

        let applied = margin.apply(Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(applied, Rect::new(-20.0, -10.0, 240.0, 120.0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(RootMargin::parse("").is_err());
        assert!(RootMargin::parse("10em").is_err());
        assert!(RootMargin::parse("1px 2px 3px 4px 5px").is_err());
        assert!(RootMargin::parse("inf").is_err());
    }

    #[test]
    fn test_negative_bottom_shrinks_root() {
        let viewport = Viewport::new(1280.0, 720.0).scrolled_to(100.0);
        let root = RootMargin::px(0.0, 0.0, -50.0, 0.0).apply(viewport.root_rect());

        assert_eq!(root, Rect::new(0.0, 100.0, 1280.0, 670.0));
    }

    #[test]
    fn test_display_round_trips() {
        let margin = RootMargin::parse("0px 0px -50px 0px").unwrap();
        assert_eq!(margin.to_string(), "0px 0px -50px 0px");
    }
}
