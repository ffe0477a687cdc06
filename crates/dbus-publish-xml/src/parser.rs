use std::borrow::Cow;

use xmlparser::{ElementEnd, StrSpan, Token};

use crate::error::ErrorKind;
use crate::{Child, Element, Error, Result};

/// Parse an introspection document into its root element.
///
/// Only well-formedness is checked. The document is not validated against the
/// D-Bus introspection DTD, so unknown elements and attributes are preserved as
/// they are.
///
/// # Examples
///
/// ```
/// let node = dbus_publish_xml::parse(r#"<node><interface name="org.example.Foo"/></node>"#)?;
/// assert!(node.is_node());
/// assert_eq!(node.elements().next().map(|e| e.name_or_empty()), Some("org.example.Foo"));
/// # Ok::<_, dbus_publish_xml::Error>(())
/// ```
pub fn parse(xml: &str) -> Result<Element> {
    let tokenizer = xmlparser::Tokenizer::from(xml);

    let mut stack = Vec::<Element>::new();
    let mut root = None;
    let mut path = String::new();

    for token in tokenizer {
        let token = match token {
            Ok(token) => token,
            Err(error) => return Err(Error::new(path, error)),
        };

        match token {
            Token::ElementStart { prefix, local, .. } => {
                if root.is_some() {
                    return Err(Error::new(path, ErrorKind::MultipleRoots));
                }

                let name = qualified(prefix, local);

                if !path.is_empty() {
                    path.push('/');
                }

                path.push_str(&name);

                stack.push(Element {
                    name: name.into(),
                    attributes: Vec::new(),
                    children: Vec::new(),
                });
            }
            Token::Attribute {
                prefix,
                local,
                value,
                ..
            } => {
                let Some(element) = stack.last_mut() else {
                    return Err(Error::new(path, ErrorKind::UnsupportedElementEnd));
                };

                let value = unescape(&path, value.as_str())?;
                element
                    .attributes
                    .push((qualified(prefix, local).into(), value.into()));
            }
            Token::ElementEnd { end, .. } => {
                let name = match end {
                    ElementEnd::Open => {
                        continue;
                    }
                    ElementEnd::Close(prefix, local) => Some(qualified(prefix, local)),
                    ElementEnd::Empty => None,
                };

                let Some(element) = stack.pop() else {
                    return Err(Error::new(path, ErrorKind::UnsupportedElementEnd));
                };

                if let Some(name) = name {
                    if *element.name != *name {
                        return Err(Error::new(
                            path,
                            ErrorKind::MismatchingEnd {
                                expected: element.name,
                                actual: name.into(),
                            },
                        ));
                    }
                }

                match stack.last_mut() {
                    Some(parent) => parent.children.push(Child::Element(element)),
                    None => root = Some(element),
                }

                if let Some(index) = path.rfind('/') {
                    path.truncate(index);
                } else {
                    path.clear();
                }
            }
            Token::Text { text } => {
                let text = text.as_str().trim();

                if text.is_empty() {
                    continue;
                }

                let text = unescape(&path, text)?;

                match stack.last_mut() {
                    Some(element) => element.children.push(Child::Text(text.into())),
                    None => return Err(Error::new(path, ErrorKind::UnsupportedText)),
                }
            }
            Token::Cdata { text, .. } => match stack.last_mut() {
                Some(element) => element.children.push(Child::Text(text.as_str().into())),
                None => return Err(Error::new(path, ErrorKind::UnsupportedText)),
            },
            Token::Comment { text, .. } => {
                // Comments outside of the root element are dropped.
                if let Some(element) = stack.last_mut() {
                    element
                        .children
                        .push(Child::Comment(text.as_str().trim().into()));
                }
            }
            _ => {}
        }
    }

    if let Some(element) = stack.pop() {
        return Err(Error::new(path, ErrorKind::UnclosedElement(element.name)));
    }

    match root {
        Some(root) => Ok(root),
        None => Err(Error::new(path, ErrorKind::MissingRoot)),
    }
}

fn qualified(prefix: StrSpan<'_>, local: StrSpan<'_>) -> String {
    if prefix.as_str().is_empty() {
        local.as_str().to_owned()
    } else {
        format!("{}:{}", prefix.as_str(), local.as_str())
    }
}

fn unescape<'a>(path: &str, value: &'a str) -> Result<Cow<'a, str>> {
    quick_xml::escape::unescape(value)
        .map_err(|error| Error::new(path, ErrorKind::Escape(error.to_string().into())))
}
