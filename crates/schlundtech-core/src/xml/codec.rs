//! XML encoding and decoding for [`XmlMap`] documents

use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::{XmlMap, XmlValue};
use crate::error::{Error, Result};

/// Element being assembled while decoding
struct Frame {
    name: String,
    children: XmlMap,
    text: String,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            children: XmlMap::new(),
            text: String::new(),
        }
    }

    /// Elements with children become maps; everything else is text
    ///
    /// Leaf text is kept verbatim. Text between child elements is
    /// indentation and is dropped with the rest of the element's text.
    fn into_parts(self) -> (String, XmlValue) {
        let value = if self.children.is_empty() {
            XmlValue::Text(self.text)
        } else {
            XmlValue::Map(self.children)
        };
        (self.name, value)
    }
}

/// Decode a gateway XML document into the mapping of its root's children
///
/// ```text
/// <test><a>1</a><a>2</a><b>hello</b></test>  =>  {a: ["1", "2"], b: "hello"}
/// ```
///
/// The root tag itself is not part of the result. Attributes, comments,
/// processing instructions and the XML declaration are ignored. Scalar text
/// is returned exactly as written, surrounding whitespace included.
///
/// # Errors
///
/// [`Error::Parse`] for malformed input: mismatched or unclosed tags, text
/// or elements outside the root, a missing root, bad escapes.
pub fn decode(input: &[u8]) -> Result<XmlMap> {
    let mut reader = Reader::from_reader(input);

    let mut buf = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<XmlMap> = None;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            Error::parse(format!("at position {}: {}", reader.buffer_position(), e))
        })?;

        match event {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(Error::parse("element after the root element"));
                }
                stack.push(Frame::new(element_name(start.name().as_ref())));
            }
            Event::Empty(start) => {
                let name = element_name(start.name().as_ref());
                match stack.last_mut() {
                    Some(parent) => parent.children.append_child(name, XmlValue::Text(String::new())),
                    None if root.is_none() => root = Some(XmlMap::new()),
                    None => return Err(Error::parse("element after the root element")),
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| Error::parse(e.to_string()))?;
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(Error::parse("text outside the root element")),
                }
            }
            Event::CData(data) => {
                let frame = stack
                    .last_mut()
                    .ok_or_else(|| Error::parse("CDATA outside the root element"))?;
                frame.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| Error::parse("closing tag without an open element"))?;
                match stack.last_mut() {
                    Some(parent) => {
                        let (name, value) = frame.into_parts();
                        parent.children.append_child(name, value);
                    }
                    None => root = Some(frame.children),
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(Error::parse(format!("unclosed element <{}>", open.name)));
    }

    root.ok_or_else(|| Error::parse("document has no root element"))
}

/// Encode a mapping as a UTF-8 XML document under `root`
///
/// Output starts with an XML declaration and follows the mapping's
/// insertion order. Lists become repeated sibling elements.
///
/// # Errors
///
/// [`Error::InvalidInput`] when a list directly contains another list,
/// which has no XML representation in this dialect.
pub fn encode(root: &str, map: &XmlMap) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_error)?;
    write_map(&mut writer, root, map)?;

    Ok(writer.into_inner().into_inner())
}

fn write_map<W: Write>(writer: &mut Writer<W>, name: &str, map: &XmlMap) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(write_error)?;

    for (key, value) in map.iter() {
        write_value(writer, key, value)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(write_error)?;
    Ok(())
}

fn write_value<W: Write>(writer: &mut Writer<W>, name: &str, value: &XmlValue) -> Result<()> {
    match value {
        XmlValue::Text(text) => {
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(write_error)?;
            if !text.is_empty() {
                writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .map_err(write_error)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(write_error)?;
            Ok(())
        }
        XmlValue::Map(map) => write_map(writer, name, map),
        XmlValue::List(items) => {
            for item in items {
                if let XmlValue::List(_) = item {
                    return Err(Error::invalid_input(format!(
                        "element <{}> holds a nested list",
                        name
                    )));
                }
                write_value(writer, name, item)?;
            }
            Ok(())
        }
    }
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn write_error(err: impl std::fmt::Display) -> Error {
    Error::parse(format!("failed to write XML: {}", err))
}
