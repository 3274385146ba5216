//! Connection-point geometry for edge endpoints.
//!
//! Every edge endpoint gets its own handle aimed at the node on the other end.
//! The direction vector is bucketed into one of eight 45° compass sectors, and
//! each sector maps to a fixed CSS-style offset on the node boundary.

use crate::Vec2;
use serde::{Serialize, Serializer};
use std::fmt;

/// Distance a handle sits outside the node border, in pixels.
pub const HANDLE_INSET: f32 = 4.0;

const SECTOR_DEGREES: f64 = 45.0;
const HALF_SECTOR_DEGREES: f64 = SECTOR_DEGREES / 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleRole {
    Source,
    Target,
}

impl HandleRole {
    pub fn as_str(self) -> &'static str {
        match self {
            HandleRole::Source => "source",
            HandleRole::Target => "target",
        }
    }
}

/// Which side of a node an anchor is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl AnchorSide {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            AnchorSide::Left => AnchorSide::Right,
            AnchorSide::Right => AnchorSide::Left,
            AnchorSide::Top => AnchorSide::Bottom,
            AnchorSide::Bottom => AnchorSide::Top,
        }
    }
}

/// Eight compass sectors, in increasing-angle order.
///
/// Screen coordinates grow downwards, so walking from 0° towards 90° goes from
/// "right" to "bottom".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompassDirection {
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
    Top,
    TopRight,
}

impl CompassDirection {
    pub const ALL: [CompassDirection; 8] = [
        CompassDirection::Right,
        CompassDirection::BottomRight,
        CompassDirection::Bottom,
        CompassDirection::BottomLeft,
        CompassDirection::Left,
        CompassDirection::TopLeft,
        CompassDirection::Top,
        CompassDirection::TopRight,
    ];

    /// Sector containing `degrees`; sector boundaries sit at 22.5° + 45°·k.
    pub fn from_angle_degrees(degrees: f64) -> Self {
        if !degrees.is_finite() {
            return CompassDirection::Right;
        }
        let normalized = degrees.rem_euclid(360.0);
        let sector = ((normalized + HALF_SECTOR_DEGREES) / SECTOR_DEGREES).floor() as usize;
        Self::ALL[sector % Self::ALL.len()]
    }

    /// Direction from `from` towards `toward`. Coincident or non-finite points
    /// resolve to [`CompassDirection::Right`].
    pub fn between(from: Vec2, toward: Vec2) -> Self {
        let dx = f64::from(toward.x) - f64::from(from.x);
        let dy = f64::from(toward.y) - f64::from(from.y);
        if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
            return CompassDirection::Right;
        }
        Self::from_angle_degrees(dy.atan2(dx).to_degrees())
    }

    /// Angle at the middle of the sector.
    pub fn center_degrees(self) -> f64 {
        self.index() as f64 * SECTOR_DEGREES
    }

    fn index(self) -> usize {
        match self {
            CompassDirection::Right => 0,
            CompassDirection::BottomRight => 1,
            CompassDirection::Bottom => 2,
            CompassDirection::BottomLeft => 3,
            CompassDirection::Left => 4,
            CompassDirection::TopLeft => 5,
            CompassDirection::Top => 6,
            CompassDirection::TopRight => 7,
        }
    }

    pub fn side(self) -> AnchorSide {
        match self {
            CompassDirection::Right | CompassDirection::BottomRight | CompassDirection::TopRight => {
                AnchorSide::Right
            }
            CompassDirection::Left | CompassDirection::BottomLeft | CompassDirection::TopLeft => {
                AnchorSide::Left
            }
            CompassDirection::Bottom => AnchorSide::Bottom,
            CompassDirection::Top => AnchorSide::Top,
        }
    }

    /// Diagonals sit on the left/right border, a quarter of the way from the corner.
    pub fn offset(self) -> HandleOffset {
        let outside = CssLength::Px(-HANDLE_INSET);
        match self {
            CompassDirection::Right => HandleOffset {
                right: Some(outside),
                top: Some(CssLength::Percent(50.0)),
                ..HandleOffset::default()
            },
            CompassDirection::BottomRight => HandleOffset {
                right: Some(outside),
                top: Some(CssLength::Percent(75.0)),
                ..HandleOffset::default()
            },
            CompassDirection::Bottom => HandleOffset {
                bottom: Some(outside),
                left: Some(CssLength::Percent(50.0)),
                ..HandleOffset::default()
            },
            CompassDirection::BottomLeft => HandleOffset {
                left: Some(outside),
                top: Some(CssLength::Percent(75.0)),
                ..HandleOffset::default()
            },
            CompassDirection::Left => HandleOffset {
                left: Some(outside),
                top: Some(CssLength::Percent(50.0)),
                ..HandleOffset::default()
            },
            CompassDirection::TopLeft => HandleOffset {
                left: Some(outside),
                top: Some(CssLength::Percent(25.0)),
                ..HandleOffset::default()
            },
            CompassDirection::Top => HandleOffset {
                top: Some(outside),
                left: Some(CssLength::Percent(50.0)),
                ..HandleOffset::default()
            },
            CompassDirection::TopRight => HandleOffset {
                right: Some(outside),
                top: Some(CssLength::Percent(25.0)),
                ..HandleOffset::default()
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompassDirection::Right => "right",
            CompassDirection::BottomRight => "bottom-right",
            CompassDirection::Bottom => "bottom",
            CompassDirection::BottomLeft => "bottom-left",
            CompassDirection::Left => "left",
            CompassDirection::TopLeft => "top-left",
            CompassDirection::Top => "top",
            CompassDirection::TopRight => "top-right",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssLength {
    Px(f32),
    Percent(f32),
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssLength::Px(v) => write!(f, "{v}px"),
            CssLength::Percent(v) => write!(f, "{v}%"),
        }
    }
}

impl Serialize for CssLength {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Absolute-position offsets of a handle relative to its node box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HandleOffset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<CssLength>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<CssLength>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<CssLength>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<CssLength>,
}

impl HandleOffset {
    /// Inline style string, e.g. `right: -4px; top: 50%`.
    pub fn to_css(&self) -> String {
        [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| format!("{name}: {v}")))
        .collect::<Vec<_>>()
        .join("; ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleSpec {
    pub id: String,
    pub role: HandleRole,
    pub direction: CompassDirection,
    pub side: AnchorSide,
    pub offset: HandleOffset,
}

/// Handle for the node at `from`, aimed at the node at `toward`.
///
/// For a source handle `from` is the source position; for a target handle it is
/// the target position.
pub fn compute_handle(from: Vec2, toward: Vec2, role: HandleRole) -> HandleSpec {
    let direction = CompassDirection::between(from, toward);
    HandleSpec {
        id: format!("{}-{}", role.as_str(), direction.as_str()),
        role,
        direction,
        side: direction.side(),
        offset: direction.offset(),
    }
}
