use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Write};

/// A point on the rendered plane. Serialized as a `[x, y]` pair, which is
/// also the JSON form of the label offsets in render settings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from(value: (f64, f64)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

impl From<Point> for (f64, f64) {
    fn from(value: Point) -> Self {
        (value.x, value.y)
    }
}

/// An SVG paint value.
///
/// The JSON form is a color name string, a `[r, g, b]` array, or a
/// `[r, g, b, a]` array; `None` renders as the literal `none`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    #[default]
    None,
    Named(String),
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, f64),
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self::Named(value.to_owned())
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::None => f.write_str("none"),
            Color::Named(name) => f.write_str(name),
            Color::Rgb(r, g, b) => write!(f, "rgb({r},{g},{b})"),
            Color::Rgba(r, g, b, opacity) => write!(f, "rgba({r},{g},{b},{opacity})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeLineCap {
    Butt,
    Round,
    Square,
}

impl StrokeLineCap {
    fn as_str(self) -> &'static str {
        match self {
            StrokeLineCap::Butt => "butt",
            StrokeLineCap::Round => "round",
            StrokeLineCap::Square => "square",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeLineJoin {
    Arcs,
    Bevel,
    Miter,
    MiterClip,
    Round,
}

impl StrokeLineJoin {
    fn as_str(self) -> &'static str {
        match self {
            StrokeLineJoin::Arcs => "arcs",
            StrokeLineJoin::Bevel => "bevel",
            StrokeLineJoin::Miter => "miter",
            StrokeLineJoin::MiterClip => "miter-clip",
            StrokeLineJoin::Round => "round",
        }
    }
}

/// Paint attributes shared by every shape. Attributes render in a fixed
/// order and only when set, so output stays reproducible.
#[derive(Debug, Default, Clone)]
struct PathProps {
    fill: Option<Color>,
    stroke: Option<Color>,
    stroke_width: Option<f64>,
    line_cap: Option<StrokeLineCap>,
    line_join: Option<StrokeLineJoin>,
}

impl PathProps {
    fn render(&self, out: &mut String) {
        if let Some(fill) = &self.fill {
            let _ = write!(out, " fill=\"{fill}\"");
        }
        if let Some(stroke) = &self.stroke {
            let _ = write!(out, " stroke=\"{stroke}\"");
        }
        if let Some(width) = self.stroke_width {
            let _ = write!(out, " stroke-width=\"{width}\"");
        }
        if let Some(cap) = self.line_cap {
            let _ = write!(out, " stroke-linecap=\"{}\"", cap.as_str());
        }
        if let Some(join) = self.line_join {
            let _ = write!(out, " stroke-linejoin=\"{}\"", join.as_str());
        }
    }
}

macro_rules! path_props_setters {
    () => {
        pub fn fill(mut self, color: Color) -> Self {
            self.props.fill = Some(color);
            self
        }

        pub fn stroke(mut self, color: Color) -> Self {
            self.props.stroke = Some(color);
            self
        }

        pub fn stroke_width(mut self, width: f64) -> Self {
            self.props.stroke_width = Some(width);
            self
        }

        pub fn line_cap(mut self, cap: StrokeLineCap) -> Self {
            self.props.line_cap = Some(cap);
            self
        }

        pub fn line_join(mut self, join: StrokeLineJoin) -> Self {
            self.props.line_join = Some(join);
            self
        }
    };
}

#[derive(Debug, Default, Clone)]
pub struct Circle {
    center: Point,
    radius: f64,
    props: PathProps,
}

impl Circle {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn center(mut self, center: Point) -> Self {
        self.center = center;
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    path_props_setters!();

    fn render(&self, out: &mut String) {
        let _ = write!(
            out,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"",
            self.center.x, self.center.y, self.radius
        );
        self.props.render(out);
        out.push_str("/>");
    }
}

#[derive(Debug, Default, Clone)]
pub struct Polyline {
    points: Vec<Point>,
    props: PathProps,
}

impl Polyline {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn point(mut self, point: Point) -> Self {
        self.points.push(point);
        self
    }

    path_props_setters!();

    fn render(&self, out: &mut String) {
        out.push_str("<polyline points=\"");
        let mut first = true;
        for point in &self.points {
            if !first {
                out.push(' ');
            }
            first = false;
            let _ = write!(out, "{},{}", point.x, point.y);
        }
        out.push('"');
        self.props.render(out);
        out.push_str("/>");
    }
}

#[derive(Debug, Default, Clone)]
pub struct Text {
    position: Point,
    offset: Point,
    font_size: u32,
    font_family: Option<String>,
    font_weight: Option<String>,
    data: String,
    props: PathProps,
}

impl Text {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = size;
        self
    }

    pub fn font_family(mut self, family: &str) -> Self {
        self.font_family = Some(family.to_owned());
        self
    }

    pub fn font_weight(mut self, weight: &str) -> Self {
        self.font_weight = Some(weight.to_owned());
        self
    }

    pub fn data(mut self, data: &str) -> Self {
        self.data = data.to_owned();
        self
    }

    path_props_setters!();

    fn render(&self, out: &mut String) {
        let _ = write!(
            out,
            "<text x=\"{}\" y=\"{}\" dx=\"{}\" dy=\"{}\" font-size=\"{}\"",
            self.position.x, self.position.y, self.offset.x, self.offset.y, self.font_size
        );
        if let Some(family) = &self.font_family {
            let _ = write!(out, " font-family=\"{family}\"");
        }
        if let Some(weight) = &self.font_weight {
            let _ = write!(out, " font-weight=\"{weight}\"");
        }
        self.props.render(out);
        out.push('>');
        out.push_str(&escape(&self.data));
        out.push_str("</text>");
    }
}

/// Escapes `& " ' < >`, each exactly once per character.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[derive(Debug, Clone)]
pub enum Object {
    Circle(Circle),
    Polyline(Polyline),
    Text(Text),
}

impl From<Circle> for Object {
    fn from(value: Circle) -> Self {
        Self::Circle(value)
    }
}

impl From<Polyline> for Object {
    fn from(value: Polyline) -> Self {
        Self::Polyline(value)
    }
}

impl From<Text> for Object {
    fn from(value: Text) -> Self {
        Self::Text(value)
    }
}

/// An ordered SVG document rendered to text.
#[derive(Debug, Default, Clone)]
pub struct Document {
    objects: Vec<Object>,
}

impl Document {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, object: impl Into<Object>) {
        self.objects.push(object.into());
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n");
        out.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">\n");
        for object in &self.objects {
            out.push_str("  ");
            match object {
                Object::Circle(circle) => circle.render(&mut out),
                Object::Polyline(polyline) => polyline.render(&mut out),
                Object::Text(text) => text.render(&mut out),
            }
            out.push('\n');
        }
        out.push_str("</svg>");
        out
    }
}

#[test]
fn escape_all_entities() {
    assert_eq!(escape("a&b\"c'd<e>f"), "a&amp;b&quot;c&apos;d&lt;e&gt;f");
    assert_eq!(escape("plain"), "plain");
}

#[test]
fn color_forms() {
    assert_eq!(Color::None.to_string(), "none");
    assert_eq!(Color::from("red").to_string(), "red");
    assert_eq!(Color::Rgb(1, 2, 3).to_string(), "rgb(1,2,3)");
    assert_eq!(Color::Rgba(255, 200, 23, 0.85).to_string(), "rgba(255,200,23,0.85)");
}
