//! Element tree types for the label document model.
//!
//! All types derive `Serialize + Deserialize` so the same tree can be built in
//! Rust or loaded from JSON:
//!
//! ```json
//! {"type": "rect", "id": "frame", "x": 10, "y": 10, "width": 40, "height": 20,
//!  "fill": "white", "stroke": "black", "stroke_width": 2}
//! ```
//!
//! Lengths are plain numbers in document units (pixels at the source DPI).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::geometry::Matrix;

// ============================================================================
// PAINT
// ============================================================================

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Fill or stroke paint.
///
/// Accepts `"none"`, `"black"`, `"white"`, `#rgb` and `#rrggbb` when
/// deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Paint {
    None,
    Color(Rgb),
}

impl Paint {
    pub const BLACK: Self = Paint::Color(Rgb::BLACK);
    pub const WHITE: Self = Paint::Color(Rgb::WHITE);

    pub fn is_none(&self) -> bool {
        matches!(self, Paint::None)
    }

    pub fn is_white(&self) -> bool {
        matches!(self, Paint::Color(c) if *c == Rgb::WHITE)
    }

    /// Painted with something other than white.
    pub fn is_visible_ink(&self) -> bool {
        !self.is_none() && !self.is_white()
    }
}

impl TryFrom<String> for Paint {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Paint> for String {
    fn from(paint: Paint) -> String {
        paint.to_string()
    }
}

impl std::str::FromStr for Paint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "none" | "transparent" => return Ok(Paint::None),
            "black" => return Ok(Paint::BLACK),
            "white" => return Ok(Paint::WHITE),
            _ => {}
        }
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("unsupported paint '{}'", s))?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("bad color '{}'", s));
        }
        let parse = |h: &str| u8::from_str_radix(h, 16).map_err(|e| format!("bad color '{}': {}", s, e));
        match hex.len() {
            3 => {
                let expand = |i: usize| parse(&hex[i..i + 1].repeat(2));
                Ok(Paint::Color(Rgb::new(expand(0)?, expand(1)?, expand(2)?)))
            }
            6 => Ok(Paint::Color(Rgb::new(
                parse(&hex[0..2])?,
                parse(&hex[2..4])?,
                parse(&hex[4..6])?,
            ))),
            _ => Err(format!("bad color '{}'", s)),
        }
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Paint::None => f.write_str("none"),
            Paint::Color(c) => write!(f, "#{:02x}{:02x}{:02x}", c.r, c.g, c.b),
        }
    }
}

// ============================================================================
// STYLE
// ============================================================================

/// Font slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// Presentation attributes declared on one element.
///
/// Unset fields inherit from the nearest ancestor that sets them (see
/// [`ComputedStyle::inherit`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Paint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Paint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    /// CSS numeric weight (100-900; 400 is normal, 700 is bold).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
}

/// Fully resolved presentation attributes of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedStyle {
    pub fill: Paint,
    pub stroke: Paint,
    pub stroke_width: f32,
    pub font_size: f32,
    pub font_weight: u16,
    pub font_style: FontStyle,
}

impl Default for ComputedStyle {
    /// Initial values: black fill, no stroke, 1 unit stroke, 16 unit font.
    fn default() -> Self {
        Self {
            fill: Paint::BLACK,
            stroke: Paint::None,
            stroke_width: 1.0,
            font_size: 16.0,
            font_weight: 400,
            font_style: FontStyle::Normal,
        }
    }
}

impl ComputedStyle {
    /// Resolve `own` on top of this (parent) style.
    pub fn inherit(&self, own: &Style) -> ComputedStyle {
        ComputedStyle {
            fill: own.fill.unwrap_or(self.fill),
            stroke: own.stroke.unwrap_or(self.stroke),
            stroke_width: own.stroke_width.unwrap_or(self.stroke_width),
            font_size: own.font_size.unwrap_or(self.font_size),
            font_weight: own.font_weight.unwrap_or(self.font_weight),
            font_style: own.font_style.unwrap_or(self.font_style),
        }
    }
}

// ============================================================================
// TRANSFORMS
// ============================================================================

/// One entry of an element's `transform` list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transform {
    Matrix(Matrix),
    Translate {
        x: f32,
        #[serde(default)]
        y: f32,
    },
    Scale {
        x: f32,
        #[serde(default)]
        y: Option<f32>,
    },
    Rotate {
        angle: f32,
        #[serde(default)]
        cx: f32,
        #[serde(default)]
        cy: f32,
    },
    SkewX {
        angle: f32,
    },
    SkewY {
        angle: f32,
    },
}

impl Transform {
    pub fn to_matrix(&self) -> Matrix {
        match *self {
            Transform::Matrix(m) => m,
            Transform::Translate { x, y } => Matrix::translate(x, y),
            Transform::Scale { x, y } => Matrix::scale(x, y.unwrap_or(x)),
            Transform::Rotate { angle, cx, cy } => {
                if cx == 0.0 && cy == 0.0 {
                    Matrix::rotate(angle)
                } else {
                    Matrix::rotate_around(angle, cx, cy)
                }
            }
            Transform::SkewX { angle } => Matrix::skew_x(angle),
            Transform::SkewY { angle } => Matrix::skew_y(angle),
        }
    }
}

/// Collapse a transform list into one matrix.
///
/// As in SVG, the last listed transform is applied to the element first.
pub fn transform_list_matrix(transforms: &[Transform]) -> Matrix {
    transforms
        .iter()
        .rev()
        .fold(Matrix::IDENTITY, |m, t| m.then(&t.to_matrix()))
}

// ============================================================================
// SHAPES
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LineShape {
    #[serde(default)]
    pub x1: f32,
    #[serde(default)]
    pub y1: f32,
    #[serde(default)]
    pub x2: f32,
    #[serde(default)]
    pub y2: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RectShape {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CircleShape {
    #[serde(default)]
    pub cx: f32,
    #[serde(default)]
    pub cy: f32,
    #[serde(default)]
    pub r: f32,
}

/// Text content and anchor of a `text` or `tspan` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    /// Glyph x positions; only the first one anchors the run.
    #[serde(default)]
    pub x: Vec<f32>,
    #[serde(default)]
    pub y: Vec<f32>,
    #[serde(default)]
    pub text: Option<String>,
}

impl TextContent {
    pub fn new(x: f32, y: f32, text: impl Into<String>) -> Self {
        Self {
            x: vec![x],
            y: vec![y],
            text: Some(text.into()),
        }
    }

    /// Anchor point, `(0, 0)` where unset.
    pub fn anchor(&self) -> (f32, f32) {
        (
            self.x.first().copied().unwrap_or(0.0),
            self.y.first().copied().unwrap_or(0.0),
        )
    }
}

/// An embedded raster image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    /// `data:` URI or bare base64 image bytes.
    #[serde(default)]
    pub href: Option<String>,
}

impl ImageRef {
    pub fn bounds(&self) -> RectShape {
        RectShape {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// A 2D point serialized as `[x, y]`.
pub type Point = (f32, f32);

/// One segment of a path. Every segment knows its own start and end point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathSegment {
    Move {
        start: Point,
        end: Point,
    },
    Line {
        start: Point,
        end: Point,
    },
    Cubic {
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
    },
    Quadratic {
        start: Point,
        control: Point,
        end: Point,
    },
    Arc {
        start: Point,
        end: Point,
        rx: f32,
        ry: f32,
        #[serde(default)]
        angle: f32,
        #[serde(default)]
        large_arc: bool,
        #[serde(default)]
        sweep: bool,
    },
    Close {
        start: Point,
        end: Point,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    #[serde(default)]
    pub segments: Vec<PathSegment>,
}

// ============================================================================
// ELEMENTS
// ============================================================================

/// Element kind with its kind-specific geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    Group,
    Line(LineShape),
    Rect(RectShape),
    Text(TextContent),
    #[serde(rename = "tspan")]
    TextSpan(TextContent),
    Path(PathData),
    Image(ImageRef),
    Circle(CircleShape),
}

/// Fieldless discriminant of [`ElementKind`], used as translator registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementTag {
    Group,
    Line,
    Rect,
    Text,
    TextSpan,
    Path,
    Image,
    Circle,
}

impl ElementKind {
    pub fn tag(&self) -> ElementTag {
        match self {
            ElementKind::Group => ElementTag::Group,
            ElementKind::Line(_) => ElementTag::Line,
            ElementKind::Rect(_) => ElementTag::Rect,
            ElementKind::Text(_) => ElementTag::Text,
            ElementKind::TextSpan(_) => ElementTag::TextSpan,
            ElementKind::Path(_) => ElementTag::Path,
            ElementKind::Image(_) => ElementTag::Image,
            ElementKind::Circle(_) => ElementTag::Circle,
        }
    }
}

impl fmt::Display for ElementTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementTag::Group => "g",
            ElementTag::Line => "line",
            ElementTag::Rect => "rect",
            ElementTag::Text => "text",
            ElementTag::TextSpan => "tspan",
            ElementTag::Path => "path",
            ElementTag::Image => "image",
            ElementTag::Circle => "circle",
        };
        f.write_str(name)
    }
}

fn default_visible() -> bool {
    true
}

fn is_true(v: &bool) -> bool {
    *v
}

/// A node of the element tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<Transform>,
    #[serde(default = "default_visible", skip_serializing_if = "is_true")]
    pub visible: bool,
    #[serde(flatten)]
    pub style: Style,
    /// Free-form custom attributes (`data-*` hints, `line-height`, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: String::new(),
            kind,
            transforms: Vec::new(),
            visible: true,
            style: Style::default(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn group(children: Vec<Element>) -> Self {
        Self::new(ElementKind::Group).with_children(children)
    }

    pub fn line(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(ElementKind::Line(LineShape { x1, y1, x2, y2 }))
    }

    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(ElementKind::Rect(RectShape { x, y, width, height }))
    }

    pub fn text(x: f32, y: f32, text: impl Into<String>) -> Self {
        Self::new(ElementKind::Text(TextContent::new(x, y, text)))
    }

    pub fn tspan(x: f32, y: f32, text: impl Into<String>) -> Self {
        Self::new(ElementKind::TextSpan(TextContent::new(x, y, text)))
    }

    pub fn path(segments: Vec<PathSegment>) -> Self {
        Self::new(ElementKind::Path(PathData { segments }))
    }

    pub fn image(x: f32, y: f32, width: f32, height: f32, href: Option<String>) -> Self {
        Self::new(ElementKind::Image(ImageRef {
            x,
            y,
            width,
            height,
            href,
        }))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    pub fn with_children(mut self, children: Vec<Element>) -> Self {
        self.children = children;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_fill(mut self, paint: Paint) -> Self {
        self.style.fill = Some(paint);
        self
    }

    pub fn with_stroke(mut self, paint: Paint, width: f32) -> Self {
        self.style.stroke = Some(paint);
        self.style.stroke_width = Some(width);
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.style.font_size = Some(size);
        self
    }

    pub fn with_font_weight(mut self, weight: u16) -> Self {
        self.style.font_weight = Some(weight);
        self
    }

    pub fn with_font_style(mut self, style: FontStyle) -> Self {
        self.style.font_style = Some(style);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// A custom attribute, if present and non-empty.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// The element's own transform list as one matrix, if it has any.
    pub fn local_transform(&self) -> Option<Matrix> {
        if self.transforms.is_empty() {
            None
        } else {
            Some(transform_list_matrix(&self.transforms))
        }
    }
}

/// The root of an element tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Owning-document identity; part of the image cache key.
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<Transform>,
    #[serde(default)]
    pub children: Vec<Element>,
}

impl Document {
    pub fn new(id: impl Into<String>, children: Vec<Element>) -> Self {
        Self {
            id: id.into(),
            children,
            ..Default::default()
        }
    }
}
