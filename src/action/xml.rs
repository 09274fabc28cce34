//! Element data documents.
//!
//! Inside a package archive, each action lives at `elements/<id>/data` as a
//! `<dunes-script-module>` XML document, encoded UTF-16BE with a BOM. This
//! module generates that document from an [`Action`] (build path) and parses
//! it back into its parts (expand path), plus the encoding helpers the
//! package layer needs to read and write the files.
//!
//! Text nodes are CDATA-wrapped on the way out, so scripts and descriptions
//! never need XML escaping.

use crate::action::{Action, ActionParam};
use crate::error::{Result, VrocliError};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;

/// Root element name identifying an action inside a package.
const SCRIPT_MODULE: &str = "dunes-script-module";

/// Fixed attribute values vRO stamps on exported actions.
const API_VERSION: &str = "6.0.0";
const ELEMENT_VERSION: &str = "0.0.1";
const ALLOWED_OPERATIONS: &str = "vef";

fn write_err<E: std::fmt::Display>(e: E) -> VrocliError {
    VrocliError::XmlError(format!("failed to write element data: {}", e))
}

fn parse_err<E: std::fmt::Display>(e: E) -> VrocliError {
    VrocliError::XmlError(format!("failed to parse element data: {}", e))
}

/// Parsed contents of an element `data` document.
///
/// This is everything the document itself knows; the category comes from the
/// sibling `categories` file and is attached by the package layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub name: String,
    pub result_type: String,
    pub description: Option<String>,
    pub params: Vec<ActionParam>,
    pub script: String,
}

/// Render the `data` document for an action.
///
/// Fails with [`InvalidSpec`](crate::error::VrocliError::InvalidSpec) when
/// `name` or `script` is missing, mirroring the stub renderer: neither
/// representation of an action can exist without them.
pub fn render_element(action: &Action) -> Result<String> {
    action.validate()?;

    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-16"), Some("yes"))))
        .map_err(write_err)?;

    let mut root = BytesStart::new(SCRIPT_MODULE);
    root.push_attribute(("name", action.name.as_str()));
    root.push_attribute(("result-type", action.result.element()));
    root.push_attribute(("api-version", API_VERSION));
    root.push_attribute(("id", action.id.as_str()));
    root.push_attribute(("version", ELEMENT_VERSION));
    root.push_attribute(("allowed-operations", ALLOWED_OPERATIONS));
    writer.write_event(Event::Start(root)).map_err(write_err)?;

    if let Some(description) = &action.description {
        writer
            .write_event(Event::Start(BytesStart::new("description")))
            .map_err(write_err)?;
        writer
            .write_event(Event::CData(BytesCData::new(description.as_str())))
            .map_err(write_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("description")))
            .map_err(write_err)?;
    }

    for param in &action.params {
        let mut elem = BytesStart::new("param");
        elem.push_attribute(("n", param.name.as_str()));
        elem.push_attribute(("t", param.param_type.as_str()));
        match &param.desc {
            Some(desc) => {
                writer.write_event(Event::Start(elem)).map_err(write_err)?;
                writer
                    .write_event(Event::CData(BytesCData::new(desc.as_str())))
                    .map_err(write_err)?;
                writer
                    .write_event(Event::End(BytesEnd::new("param")))
                    .map_err(write_err)?;
            }
            None => {
                writer.write_event(Event::Empty(elem)).map_err(write_err)?;
            }
        }
    }

    let mut script = BytesStart::new("script");
    script.push_attribute(("encoded", "false"));
    writer.write_event(Event::Start(script)).map_err(write_err)?;
    writer
        .write_event(Event::CData(BytesCData::new(action.script.as_str())))
        .map_err(write_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("script")))
        .map_err(write_err)?;

    writer
        .write_event(Event::End(BytesEnd::new(SCRIPT_MODULE)))
        .map_err(write_err)?;

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| VrocliError::XmlError(format!("generated element data is not UTF-8: {}", e)))
}

/// What the parser is currently collecting text for.
#[derive(PartialEq)]
enum Capture {
    Idle,
    Description,
    Param,
    Script,
}

/// Parse an element `data` document.
///
/// Returns `Ok(None)` when the document is well-formed XML but not a script
/// module (packages also carry workflows, configuration elements, and
/// resources) or carries no `name` attribute. Malformed XML is an error.
pub fn parse_element(xml: &str) -> Result<Option<ElementData>> {
    let mut reader = Reader::from_str(xml);

    let mut name: Option<String> = None;
    let mut result_type = String::new();
    let mut description: Option<String> = None;
    let mut params: Vec<ActionParam> = Vec::new();
    let mut script: Option<String> = None;

    let mut saw_root = false;
    let mut capture = Capture::Idle;
    let mut text = String::new();
    // (n, t) of the param element currently being read.
    let mut pending_param: Option<(String, String)> = None;

    loop {
        match reader.read_event().map_err(parse_err)? {
            Event::Start(e) => match e.name().as_ref() {
                b"dunes-script-module" => {
                    saw_root = true;
                    let (n, r) = root_attributes(&e)?;
                    name = n;
                    result_type = r;
                }
                b"description" if saw_root => {
                    capture = Capture::Description;
                    text.clear();
                }
                b"script" if saw_root => {
                    capture = Capture::Script;
                    text.clear();
                }
                b"param" if saw_root => {
                    pending_param = Some(param_attributes(&e)?);
                    capture = Capture::Param;
                    text.clear();
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"dunes-script-module" => {
                    saw_root = true;
                    let (n, r) = root_attributes(&e)?;
                    name = n;
                    result_type = r;
                }
                // A self-closing <param .../> has no description.
                b"param" if saw_root => {
                    let (n, t) = param_attributes(&e)?;
                    params.push(ActionParam::new(n, t, None));
                }
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"description" => {
                    let collected = text.trim().to_string();
                    if !collected.is_empty() {
                        description = Some(collected);
                    }
                    capture = Capture::Idle;
                }
                b"script" => {
                    script = Some(std::mem::take(&mut text));
                    capture = Capture::Idle;
                }
                b"param" => {
                    if let Some((n, t)) = pending_param.take() {
                        let desc = text.trim().to_string();
                        params.push(ActionParam::new(n, t, (!desc.is_empty()).then_some(desc)));
                    }
                    capture = Capture::Idle;
                }
                _ => {}
            },
            Event::Text(t) => {
                if capture != Capture::Idle {
                    text.push_str(&t.unescape().map_err(parse_err)?);
                }
            }
            Event::CData(c) => {
                if capture != Capture::Idle {
                    let raw = c.into_inner().into_owned();
                    text.push_str(&String::from_utf8(raw).map_err(|e| {
                        VrocliError::XmlError(format!("element data CDATA is not UTF-8: {}", e))
                    })?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Ok(None);
    }
    let Some(name) = name else {
        return Ok(None);
    };

    Ok(Some(ElementData {
        name,
        result_type,
        description,
        params,
        script: script.unwrap_or_default(),
    }))
}

/// Read `name` and `result-type` from the root element.
fn root_attributes(e: &BytesStart<'_>) -> Result<(Option<String>, String)> {
    let mut name = None;
    let mut result_type = String::new();
    for attr in e.attributes() {
        let attr = attr
            .map_err(|e| VrocliError::XmlError(format!("bad attribute in element data: {}", e)))?;
        let value = attr
            .unescape_value()
            .map_err(|e| VrocliError::XmlError(format!("bad attribute in element data: {}", e)))?
            .into_owned();
        match attr.key.as_ref() {
            b"name" => name = Some(value),
            b"result-type" => result_type = value,
            _ => {}
        }
    }
    Ok((name, result_type))
}

/// Read `n` and `t` from a param element.
fn param_attributes(e: &BytesStart<'_>) -> Result<(String, String)> {
    let mut n = String::new();
    let mut t = String::new();
    for attr in e.attributes() {
        let attr = attr
            .map_err(|e| VrocliError::XmlError(format!("bad attribute in element data: {}", e)))?;
        let value = attr
            .unescape_value()
            .map_err(|e| VrocliError::XmlError(format!("bad attribute in element data: {}", e)))?
            .into_owned();
        match attr.key.as_ref() {
            b"n" => n = value,
            b"t" => t = value,
            _ => {}
        }
    }
    Ok((n, t))
}

/// Parse an element's `categories` document and return the category names.
///
/// The file sits beside `data` and lists the categories the element belongs
/// to:
///
/// ```text
/// <categories>
///   <category name="ScriptModuleCategory">
///     <name><![CDATA[com.corp.tools]]></name>
///   </category>
/// </categories>
/// ```
pub fn parse_categories(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);

    let mut names = Vec::new();
    let mut in_name = false;
    let mut text = String::new();

    loop {
        match reader.read_event().map_err(parse_err)? {
            Event::Start(e) if e.name().as_ref() == b"name" => {
                in_name = true;
                text.clear();
            }
            Event::End(e) if e.name().as_ref() == b"name" => {
                let collected = text.trim().to_string();
                if !collected.is_empty() {
                    names.push(collected);
                }
                in_name = false;
            }
            Event::Text(t) => {
                if in_name {
                    text.push_str(&t.unescape().map_err(parse_err)?);
                }
            }
            Event::CData(c) => {
                if in_name {
                    let raw = c.into_inner().into_owned();
                    text.push_str(&String::from_utf8(raw).map_err(|e| {
                        VrocliError::XmlError(format!("categories CDATA is not UTF-8: {}", e))
                    })?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(names)
}

/// Encode text as UTF-16BE with a leading byte-order mark, the encoding vRO
/// uses for element `data` files.
pub fn encode_utf16be(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + text.len() * 2);
    out.extend_from_slice(&[0xFE, 0xFF]);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out
}

/// Decode the bytes of an element `data` file.
///
/// Sniffs the byte-order mark: UTF-16BE and UTF-16LE are accepted, as is
/// plain UTF-8 (with or without BOM) for files produced by other tooling.
pub fn decode_data_bytes(bytes: &[u8]) -> Result<String> {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xEF, 0xBB, 0xBF, rest @ ..] => decode_utf8(rest),
        _ => decode_utf8(bytes),
    }
}

fn decode_utf16(bytes: &[u8], combine: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(VrocliError::XmlError(
            "element data has an odd byte count for UTF-16".to_string(),
        ));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| combine([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units)
        .map_err(|e| VrocliError::XmlError(format!("element data is not valid UTF-16: {}", e)))
}

fn decode_utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| VrocliError::XmlError(format!("element data is not valid UTF-8: {}", e)))
}
