use std::borrow::Cow;
use std::fmt;

use dbus_publish_core::proto::Access;
use dbus_publish_core::signature::Signature;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::elements::{ARG, INTERFACE, METHOD, NODE, PROPERTY, SIGNAL};
use crate::error::ErrorKind;
use crate::{Child, Direction, Element, Error, Result};

const DOCTYPE: &str = r#"node PUBLIC "-//freedesktop//DTD D-BUS Object Introspection 1.0//EN" "http://www.freedesktop.org/standards/dbus/1.0/introspect.dtd""#;

/// Options used when writing an introspection document.
///
/// # Examples
///
/// ```
/// use dbus_publish_xml::{Element, XmlOptions};
///
/// let node = Element::node();
/// let options = XmlOptions::new().indent(0).doctype(true);
/// let xml = dbus_publish_xml::serialize_with(&node, &options)?;
/// assert!(xml.starts_with("<!DOCTYPE node PUBLIC"));
/// # Ok::<_, dbus_publish_xml::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlOptions {
    indent: usize,
    doctype: bool,
}

impl XmlOptions {
    /// Construct the default options: two spaces of indentation and no
    /// DOCTYPE declaration.
    pub const fn new() -> Self {
        Self {
            indent: 2,
            doctype: false,
        }
    }

    /// Number of spaces used per indentation level, where zero writes the
    /// whole document on a single line.
    pub const fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Write the introspection DOCTYPE declaration before the root element.
    pub const fn doctype(mut self, doctype: bool) -> Self {
        self.doctype = doctype;
        self
    }
}

impl Default for XmlOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Element {
    /// Construct a new empty element.
    pub fn new<N>(name: N) -> Self
    where
        Box<str>: From<N>,
    {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Construct a root `node` element.
    pub fn node() -> Self {
        Self::new(NODE)
    }

    /// Construct an `interface` element.
    pub fn interface(name: &str) -> Self {
        Self::new(INTERFACE).with_attribute("name", name)
    }

    /// Construct a `method` element.
    pub fn method(name: &str) -> Self {
        Self::new(METHOD).with_attribute("name", name)
    }

    /// Construct a `signal` element.
    pub fn signal(name: &str) -> Self {
        Self::new(SIGNAL).with_attribute("name", name)
    }

    /// Construct a `property` element.
    pub fn property(name: &str, ty: &Signature, access: Access) -> Self {
        Self::new(PROPERTY)
            .with_attribute("name", name)
            .with_attribute("type", ty.as_str())
            .with_attribute("access", &access.to_string())
    }

    /// Construct an `arg` element.
    ///
    /// Signal arguments are conventionally written without a direction.
    pub fn parameter(name: &str, ty: &Signature, direction: Option<Direction>) -> Self {
        let mut element = Self::new(ARG)
            .with_attribute("name", name)
            .with_attribute("type", ty.as_str());

        if let Some(direction) = direction {
            element.set_attribute("direction", direction.as_str());
        }

        element
    }

    /// Set an attribute, returning the modified element.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Set an attribute, replacing any existing attribute with the same name.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| **k == *name) {
            Some((_, existing)) => *existing = value.into(),
            None => self.attributes.push((name.into(), value.into())),
        }
    }

    /// Append a child element.
    pub fn push(&mut self, child: Element) {
        self.children.push(Child::Element(child));
    }

    /// Append a comment.
    pub fn push_comment(&mut self, text: &str) {
        self.children.push(Child::Comment(text.into()));
    }

    /// Sort the attributes of this element and every descendant by name.
    pub fn sort_attributes(&mut self) {
        self.attributes.sort_by(|(a, _), (b, _)| a.cmp(b));

        for child in &mut self.children {
            if let Child::Element(element) = child {
                element.sort_attributes();
            }
        }
    }
}

/// Serialize an element with the default [`XmlOptions`].
pub fn serialize(element: &Element) -> Result<String> {
    serialize_with(element, &XmlOptions::new())
}

/// Serialize an element using the given options.
pub fn serialize_with(element: &Element, options: &XmlOptions) -> Result<String> {
    let mut writer = if options.indent == 0 {
        Writer::new(Vec::new())
    } else {
        Writer::new_with_indent(Vec::new(), b' ', options.indent)
    };

    if options.doctype {
        writer
            .write_event(Event::DocType(BytesText::from_escaped(DOCTYPE)))
            .map_err(|error| write_error("", error))?;
    }

    write_element(&mut writer, element, element.tag())?;

    match String::from_utf8(writer.into_inner()) {
        Ok(xml) => Ok(xml),
        Err(..) => Err(Error::new("", ErrorKind::NotUtf8)),
    }
}

/// Bring a document into canonical form.
///
/// Attributes are sorted by name and whitespace between elements is replaced
/// with the default indentation. Comments are preserved. Two documents which
/// only differ in attribute order or formatting normalize to the same string.
pub fn normalize(xml: &str) -> Result<String> {
    let mut root = crate::parse(xml)?;
    root.sort_attributes();
    serialize(&root)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element, path: &str) -> Result<()> {
    let mut start = BytesStart::new(element.tag());

    for (name, value) in element.attributes() {
        start.push_attribute((name, value));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|error| write_error(path, error));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|error| write_error(path, error))?;

    for child in &element.children {
        let event = match child {
            Child::Element(child) => {
                write_element(writer, child, &format!("{path}/{}", child.tag()))?;
                continue;
            }
            Child::Comment(text) => {
                Event::Comment(BytesText::from_escaped(format!(" {} ", comment_text(text))))
            }
            Child::Text(text) => Event::Text(BytesText::new(text)),
        };

        writer
            .write_event(event)
            .map_err(|error| write_error(path, error))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(element.tag())))
        .map_err(|error| write_error(path, error))
}

/// Comments may not contain `--`, so consecutive dashes are split by a space.
fn comment_text(text: &str) -> Cow<'_, str> {
    if !text.contains("--") {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 4);
    let mut last = None;

    for c in text.chars() {
        if c == '-' && last == Some('-') {
            out.push(' ');
        }

        out.push(c);
        last = Some(c);
    }

    Cow::Owned(out)
}

fn write_error(path: &str, error: impl fmt::Display) -> Error {
    Error::new(path, ErrorKind::Write(error.to_string().into()))
}
