//! Graph View Style System
//!
//! Per-kind colors for nodes and links, plus the emphasis levels that search
//! and spotlight highlighting put on top of them.

use compliance_core::{EntityKind, LinkKind};
use serde::Serialize;
use std::fmt;

/// RGBA color, serialized as a CSS hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha scaled by `opacity` (clamped to 0..=1).
    pub fn with_opacity(&self, opacity: f32) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        Self {
            a: ((self.a as f32) * opacity).round() as u8,
            ..*self
        }
    }

    /// `#rrggbb`, or `#rrggbbaa` when the color is not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeColors {
    pub fill: Color,
    pub border: Color,
    pub text: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeStyle {
    pub color: Color,
    pub width: f32,
    pub opacity: f32,
    /// Flowing-dash animation, used for edges inside the active highlight.
    pub animated: bool,
}

/// How strongly a node or edge is drawn relative to the current highlight.
///
/// Search uses the soft pair (`Highlighted` / `Dimmed`); spotlight uses the
/// hard pair (`Spotlit` / `Obscured`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    #[default]
    Normal,
    Highlighted,
    Dimmed,
    Spotlit,
    Obscured,
}

impl Emphasis {
    pub fn opacity(self) -> f32 {
        match self {
            Emphasis::Normal | Emphasis::Highlighted | Emphasis::Spotlit => 1.0,
            Emphasis::Dimmed => 0.3,
            Emphasis::Obscured => 0.1,
        }
    }

    pub fn is_emphasized(self) -> bool {
        matches!(self, Emphasis::Highlighted | Emphasis::Spotlit)
    }
}

// ============================================================================
// Color Palette
// ============================================================================

// Document (blue)
pub const COLOR_DOCUMENT_FILL: Color = Color::rgb(219, 234, 254);
pub const COLOR_DOCUMENT_BORDER: Color = Color::rgb(59, 130, 246);
pub const COLOR_DOCUMENT_TEXT: Color = Color::rgb(30, 64, 175);

// Use case (green)
pub const COLOR_USE_CASE_FILL: Color = Color::rgb(220, 252, 231);
pub const COLOR_USE_CASE_BORDER: Color = Color::rgb(34, 197, 94);
pub const COLOR_USE_CASE_TEXT: Color = Color::rgb(22, 101, 52);

// Risk indicator (red)
pub const COLOR_RISK_FILL: Color = Color::rgb(254, 226, 226);
pub const COLOR_RISK_BORDER: Color = Color::rgb(239, 68, 68);
pub const COLOR_RISK_TEXT: Color = Color::rgb(153, 27, 27);

// Feature (purple)
pub const COLOR_FEATURE_FILL: Color = Color::rgb(243, 232, 255);
pub const COLOR_FEATURE_BORDER: Color = Color::rgb(168, 85, 247);
pub const COLOR_FEATURE_TEXT: Color = Color::rgb(107, 33, 168);

pub const COLOR_EDGE: Color = Color::rgb(148, 163, 184);
pub const COLOR_EDGE_ACTIVE: Color = Color::rgb(245, 158, 11);

pub const EDGE_WIDTH: f32 = 1.5;
pub const EDGE_WIDTH_ACTIVE: f32 = 2.5;

// ============================================================================
// Style Functions
// ============================================================================

pub fn node_colors(kind: EntityKind) -> NodeColors {
    match kind {
        EntityKind::Document => NodeColors {
            fill: COLOR_DOCUMENT_FILL,
            border: COLOR_DOCUMENT_BORDER,
            text: COLOR_DOCUMENT_TEXT,
        },
        EntityKind::UseCase => NodeColors {
            fill: COLOR_USE_CASE_FILL,
            border: COLOR_USE_CASE_BORDER,
            text: COLOR_USE_CASE_TEXT,
        },
        EntityKind::RiskIndicator => NodeColors {
            fill: COLOR_RISK_FILL,
            border: COLOR_RISK_BORDER,
            text: COLOR_RISK_TEXT,
        },
        EntityKind::Feature => NodeColors {
            fill: COLOR_FEATURE_FILL,
            border: COLOR_FEATURE_BORDER,
            text: COLOR_FEATURE_TEXT,
        },
    }
}

/// Node colors faded to the emphasis opacity.
pub fn emphasized_node_colors(kind: EntityKind, emphasis: Emphasis) -> NodeColors {
    let base = node_colors(kind);
    let opacity = emphasis.opacity();
    NodeColors {
        fill: base.fill.with_opacity(opacity),
        border: base.border.with_opacity(opacity),
        text: base.text.with_opacity(opacity),
    }
}

/// Human-readable label for a record kind, as shown in legends and filters.
pub fn kind_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Document => "Document",
        EntityKind::UseCase => "Use Case",
        EntityKind::RiskIndicator => "Risk Indicator",
        EntityKind::Feature => "Feature",
    }
}

pub fn link_label(kind: LinkKind) -> &'static str {
    match kind {
        LinkKind::DocumentUseCase => "governs",
        LinkKind::UseCaseRisk => "raises",
        LinkKind::RiskFeature => "mitigated by",
    }
}

pub fn edge_style(emphasis: Emphasis) -> EdgeStyle {
    let active = emphasis.is_emphasized();
    EdgeStyle {
        color: if active { COLOR_EDGE_ACTIVE } else { COLOR_EDGE },
        width: if active { EDGE_WIDTH_ACTIVE } else { EDGE_WIDTH },
        opacity: emphasis.opacity(),
        animated: active,
    }
}
