//! MARCXML parsing.
//!
//! Stored bibliographic payloads are MARCXML documents (a bare `<record>` or a
//! `<collection>` holding one). Elements are matched by local name, so both
//! default-namespace and `marc:`-prefixed documents parse. Text is taken
//! verbatim, without whitespace trimming, because fixed-position control
//! fields such as 008 carry meaningful trailing blanks.

use super::error::{MarcError, Result};
use super::leader::Leader;
use super::record::{DataField, Field, Record};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

enum Capture {
    Nothing,
    Leader,
    Control(String),
    Subfield(char),
}

/// Parses the first record of a MARCXML document.
///
/// # Errors
///
/// Returns an error if the XML is malformed, no `<record>` is present, the
/// leader is missing, or a field lacks its tag or code attributes.
pub fn parse_marcxml(xml: &str) -> Result<Record> {
    let mut reader = Reader::from_str(xml);

    let mut in_record = false;
    let mut leader: Option<Leader> = None;
    let mut fields: Vec<Field> = Vec::new();
    let mut datafield: Option<DataField> = None;
    let mut capture = Capture::Nothing;
    let mut text = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| MarcError::Xml(format!("at byte {}: {e}", reader.buffer_position())))?;

        match event {
            Event::Start(e) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"record" => in_record = true,
                    b"leader" if in_record => {
                        capture = Capture::Leader;
                        text.clear();
                    }
                    b"controlfield" if in_record => {
                        capture = Capture::Control(field_tag(&e)?);
                        text.clear();
                    }
                    b"datafield" if in_record => {
                        datafield = Some(start_datafield(&e)?);
                    }
                    b"subfield" if datafield.is_some() => {
                        capture = Capture::Subfield(subfield_code(&e)?);
                        text.clear();
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"controlfield" if in_record => fields.push(Field::Control {
                        tag: field_tag(&e)?,
                        value: String::new(),
                    }),
                    b"datafield" if in_record => {
                        fields.push(Field::Data(start_datafield(&e)?));
                    }
                    b"subfield" => {
                        if let Some(field) = datafield.as_mut() {
                            field.add_subfield(subfield_code(&e)?, "");
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(t) => {
                if !matches!(capture, Capture::Nothing) {
                    let value = t
                        .unescape()
                        .map_err(|e| MarcError::Xml(format!("bad text content: {e}")))?;
                    text.push_str(&value);
                }
            }
            Event::CData(c) => {
                if !matches!(capture, Capture::Nothing) {
                    let raw = c.into_inner();
                    let value = std::str::from_utf8(&raw)
                        .map_err(|e| MarcError::Encoding(format!("CDATA section: {e}")))?;
                    text.push_str(value);
                }
            }
            Event::End(e) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"leader" | b"controlfield" | b"subfield" => {
                        match std::mem::replace(&mut capture, Capture::Nothing) {
                            Capture::Leader => leader = Some(Leader::from_text(&text)?),
                            Capture::Control(tag) => fields.push(Field::Control {
                                tag,
                                value: std::mem::take(&mut text),
                            }),
                            Capture::Subfield(code) => {
                                if let Some(field) = datafield.as_mut() {
                                    field.add_subfield(code, std::mem::take(&mut text));
                                }
                            }
                            Capture::Nothing => {}
                        }
                    }
                    b"datafield" => {
                        if let Some(field) = datafield.take() {
                            fields.push(Field::Data(field));
                        }
                    }
                    b"record" if in_record => break,
                    _ => {}
                }
            }
            Event::Eof => {
                if !in_record {
                    return Err(MarcError::Xml("no <record> element found".to_string()));
                }
                return Err(MarcError::Xml("unterminated <record> element".to_string()));
            }
            _ => {}
        }
    }

    let leader = leader.ok_or_else(|| MarcError::InvalidLeader("missing <leader>".to_string()))?;
    let mut record = Record::new(leader);
    for field in fields {
        record.push(field);
    }
    Ok(record)
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<String> {
    let attr = element
        .try_get_attribute(name)
        .map_err(|e| MarcError::Xml(format!("bad attribute: {e}")))?
        .ok_or_else(|| {
            MarcError::Xml(format!(
                "<{}> missing '{name}' attribute",
                String::from_utf8_lossy(element.local_name().as_ref())
            ))
        })?;
    let value = attr
        .unescape_value()
        .map_err(|e| MarcError::Xml(format!("bad attribute value: {e}")))?;
    Ok(value.into_owned())
}

fn optional_char(element: &BytesStart<'_>, name: &str) -> Result<char> {
    match element.try_get_attribute(name) {
        Ok(Some(attr)) => Ok(String::from_utf8_lossy(&attr.value)
            .chars()
            .next()
            .unwrap_or(' ')),
        Ok(None) => Ok(' '),
        Err(e) => Err(MarcError::Xml(format!("bad attribute: {e}"))),
    }
}

/// A tag must fill exactly three bytes of a directory entry
fn field_tag(element: &BytesStart<'_>) -> Result<String> {
    let tag = attribute(element, "tag")?;
    if tag.len() != 3 || !tag.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(MarcError::InvalidField {
            tag,
            reason: "tag must be three ASCII characters".to_string(),
        });
    }
    Ok(tag)
}

fn start_datafield(element: &BytesStart<'_>) -> Result<DataField> {
    let tag = field_tag(element)?;
    Ok(DataField::new(
        tag,
        optional_char(element, "ind1")?,
        optional_char(element, "ind2")?,
    ))
}

fn subfield_code(element: &BytesStart<'_>) -> Result<char> {
    let code = attribute(element, "code")?;
    code.chars().next().ok_or_else(|| MarcError::InvalidField {
        tag: "subfield".to_string(),
        reason: "empty subfield code".to_string(),
    })
}
