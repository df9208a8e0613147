// A thin Rust wrapper to build SVG tags and render them to markup.

use std::{
    collections::BTreeMap,
    fmt::{self, Write},
};

/// Tag attributes. Ordered, so that rendering is deterministic.
pub type Params = BTreeMap<String, String>;

pub trait RenderTag: fmt::Debug {
    fn render(&self, buf: &mut String) -> fmt::Result;
}

impl<T> RenderTag for Tag<T>
where
    T: Identifier + fmt::Debug,
{
    fn render(&self, buf: &mut String) -> fmt::Result {
        write!(buf, "<{}", self.kind.identifier())?;
        for (k, v) in self.parameters.iter() {
            write!(buf, " {k}=\"{}\"", escape(v))?;
        }
        if !self.style.is_empty() {
            let style: Vec<String> = self.style.iter().map(|(k, v)| format!("{k}:{v}")).collect();
            write!(buf, " style=\"{}\"", escape(&style.join(";")))?;
        }
        if self.children.is_empty() {
            return write!(buf, "/>");
        }
        write!(buf, ">")?;
        for c in self.children.iter() {
            c.render(buf)?;
        }
        write!(buf, "</{}>", self.kind.identifier())
    }
}

/// Plain text content of a tag.
impl RenderTag for String {
    fn render(&self, buf: &mut String) -> fmt::Result {
        buf.write_str(&escape(self))
    }
}

pub fn render(svg_tag: &Tag<Svg>) -> Result<String, fmt::Error> {
    let mut raw_svg = String::new();
    svg_tag.render(&mut raw_svg)?;
    Ok(raw_svg)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for chr in text.chars() {
        match chr {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(chr),
        }
    }
    out
}

#[derive(Debug)]
pub struct Tag<T>
where
    T: fmt::Debug,
{
    parameters: Params,
    style: Params,
    children: Vec<Box<dyn RenderTag>>,
    kind: T,
}

impl<T> Tag<T>
where
    T: fmt::Debug,
{
    fn with_parameters(kind: T, parameters: &[(&str, String)], style: Option<Params>) -> Self {
        Self {
            parameters: parameters
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            style: style.unwrap_or_default(),
            children: Vec::new(),
            kind,
        }
    }

    pub fn add_child(&mut self, child: impl RenderTag + 'static) {
        self.children.push(Box::new(child));
    }

    pub fn add_children(&mut self, children: Vec<Box<dyn RenderTag>>) {
        self.children.extend(children);
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.parameters.insert(key.to_string(), value.to_string());
    }
}

// ----------------------------------------------------------------------------
//
//
// Creation of `new` tags.
//
//
// ----------------------------------------------------------------------------

impl Tag<Svg> {
    pub fn new(width: u64, height: u64, style: Option<Params>) -> Self {
        Self::with_parameters(
            Svg,
            &[
                ("width", format!("{width}")),
                ("height", format!("{height}")),
                ("viewBox", format!("0 0 {width} {height}")),
                ("xmlns", "http://www.w3.org/2000/svg".to_string()),
            ],
            style,
        )
    }
}

impl Tag<Group> {
    pub fn new(style: Option<Params>) -> Self {
        Self::with_parameters(Group, &[], style)
    }
}

impl Tag<Rect> {
    pub fn new(x: f64, y: f64, width: f64, height: f64, style: Option<Params>) -> Self {
        Self::with_parameters(
            Rect,
            &[
                ("x", format!("{x}")),
                ("y", format!("{y}")),
                ("width", format!("{width}")),
                ("height", format!("{height}")),
            ],
            style,
        )
    }
}

impl Tag<Text> {
    pub fn new(x: f64, y: f64, text: &str, style: Option<Params>) -> Self {
        let mut res = Self::with_parameters(
            Text,
            &[("x", format!("{x}")), ("y", format!("{y}"))],
            style,
        );
        res.add_child(text.to_string());
        res
    }
}

impl Tag<Line> {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, style: Option<Params>) -> Self {
        Self::with_parameters(
            Line,
            &[
                ("x1", format!("{x1}")),
                ("y1", format!("{y1}")),
                ("x2", format!("{x2}")),
                ("y2", format!("{y2}")),
            ],
            style,
        )
    }
}

impl Tag<Polyline> {
    pub fn new(points: impl IntoIterator<Item = (f64, f64)>, style: Option<Params>) -> Self {
        Self::with_parameters(
            Polyline,
            &[("points", join_points(points)), ("fill", "none".to_string())],
            style,
        )
    }
}

impl Tag<Polygon> {
    pub fn new(points: impl IntoIterator<Item = (f64, f64)>, style: Option<Params>) -> Self {
        Self::with_parameters(Polygon, &[("points", join_points(points))], style)
    }
}

fn join_points(points: impl IntoIterator<Item = (f64, f64)>) -> String {
    points
        .into_iter()
        .map(|(x, y)| format!("{x},{y}"))
        .collect::<Vec<_>>()
        .join(" ")
}

// ----------------------------------------------------------------------------
//
//
// SVG tag kinds and their str representation (`identifier`)
//
//
// ----------------------------------------------------------------------------

#[derive(Debug)]
pub struct Svg;
#[derive(Debug)]
pub struct Group;
#[derive(Debug)]
pub struct Rect;
#[derive(Debug)]
pub struct Text;
#[derive(Debug)]
pub struct Line;
#[derive(Debug)]
pub struct Polyline;
#[derive(Debug)]
pub struct Polygon;

pub trait Identifier {
    fn identifier(&self) -> &'static str;
}

macro_rules! identifier {
    ($kind:ty, $name:literal) => {
        impl Identifier for $kind {
            fn identifier(&self) -> &'static str {
                $name
            }
        }
    };
}

identifier!(Svg, "svg");
identifier!(Group, "g");
identifier!(Rect, "rect");
identifier!(Text, "text");
identifier!(Line, "line");
identifier!(Polyline, "polyline");
identifier!(Polygon, "polygon");

/// Build `Params` from a slice of pairs.
pub fn opts(items: &[(&str, &str)]) -> Option<Params> {
    Some(
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}
