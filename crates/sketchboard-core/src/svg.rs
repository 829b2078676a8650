//! Minimal SVG element tree for static vector export.

use std::fmt::{self, Write};

/// SVG namespace URI.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// An SVG element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgElement {
    pub tag: &'static str,
    pub attributes: Vec<(&'static str, String)>,
    pub children: Vec<SvgElement>,
}

impl SvgElement {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing an existing one with the same name.
    pub fn attr(mut self, name: &'static str, value: impl ToString) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn set_attr(&mut self, name: &'static str, value: impl ToString) {
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn child(mut self, child: SvgElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    fn write_to(&self, out: &mut String) -> fmt::Result {
        write!(out, "<{}", self.tag)?;
        for (name, value) in &self.attributes {
            write!(out, " {}=\"{}\"", name, escape(value))?;
        }
        if self.children.is_empty() {
            out.push_str("/>");
        } else {
            out.push('>');
            for child in &self.children {
                child.write_to(out)?;
            }
            write!(out, "</{}>", self.tag)?;
        }
        Ok(())
    }
}

impl fmt::Display for SvgElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out)?;
        f.write_str(&out)
    }
}

/// Wrap exported fragments in a standalone `<svg>` document.
pub fn document(width: f64, height: f64, background: Option<&str>, body: Vec<SvgElement>) -> String {
    let mut root = SvgElement::new("svg")
        .attr("xmlns", SVG_NS)
        .attr("width", fmt_num(width))
        .attr("height", fmt_num(height))
        .attr("viewBox", format!("0 0 {} {}", fmt_num(width), fmt_num(height)));
    if let Some(fill) = background {
        root = root.child(
            SvgElement::new("rect")
                .attr("width", fmt_num(width))
                .attr("height", fmt_num(height))
                .attr("fill", fill),
        );
    }
    root.children.extend(body);
    root.to_string()
}

/// Format a number without a trailing `.0` for integral values.
pub fn fmt_num(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
