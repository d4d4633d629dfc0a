// Entity export decoding — generic object/property graph.
//
// The export is a flat list of <object> nodes under an arbitrary root.
// Each object carries a class attribute, a nested <id> element, and
// <property> children whose text often arrives as CDATA. A property may
// reference another record through its own nested <id> element.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::EngineError;
use crate::model::{ObjectRecord, Property};

/// Innermost-element context. Text attaches only to the frame on top of
/// the stack, so stray nested markup never bleeds into a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Object,
    Property,
    Id,
    Other,
}

/// Decode an entity export into its flat object list.
///
/// Property order within each object is preserved. Objects of unknown
/// class are retained as opaque records; projection decides what to keep.
/// Malformed markup is fatal — no partial results. The root element name
/// is not validated.
pub fn parse_export(xml: &str) -> Result<Vec<ObjectRecord>, EngineError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut records: Vec<ObjectRecord> = Vec::new();
    let mut object: Option<ObjectRecord> = None;
    let mut property: Option<Property> = None;
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let frame = classify_element(e.name().as_ref(), &stack, &object, &property);
                match frame {
                    Frame::Object => {
                        object = Some(ObjectRecord {
                            id: String::new(),
                            class: attr_string(e, b"class"),
                            properties: Vec::new(),
                        });
                    }
                    Frame::Property => {
                        property = Some(Property {
                            name: attr_string(e, b"name"),
                            ref_id: None,
                            text: String::new(),
                        });
                    }
                    Frame::Id | Frame::Other => {}
                }
                stack.push(frame);
            }
            Ok(Event::Empty(ref e)) => {
                // Self-closing element: open and finalize in one step.
                match classify_element(e.name().as_ref(), &stack, &object, &property) {
                    Frame::Object => records.push(ObjectRecord {
                        id: String::new(),
                        class: attr_string(e, b"class"),
                        properties: Vec::new(),
                    }),
                    Frame::Property => {
                        if let Some(ref mut obj) = object {
                            obj.properties.push(Property {
                                name: attr_string(e, b"name"),
                                ref_id: None,
                                text: String::new(),
                            });
                        }
                    }
                    Frame::Id | Frame::Other => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().map_err(|err| EngineError::ExportParse {
                    position: reader.buffer_position(),
                    detail: err.to_string(),
                })?;
                append_text(&stack, &mut object, &mut property, &text);
            }
            Ok(Event::CData(ref e)) => {
                // CDATA is taken verbatim, no entity resolution.
                let text = String::from_utf8_lossy(e.as_ref());
                append_text(&stack, &mut object, &mut property, &text);
            }
            Ok(Event::End(_)) => match stack.pop() {
                Some(Frame::Property) => {
                    if let (Some(obj), Some(prop)) = (object.as_mut(), property.take()) {
                        obj.properties.push(prop);
                    }
                }
                Some(Frame::Object) => {
                    if let Some(obj) = object.take() {
                        records.push(obj);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(EngineError::ExportParse {
                    position: reader.buffer_position(),
                    detail: e.to_string(),
                });
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(records)
}

/// Decide what an opening element means in the current context. Objects
/// never nest; a <property> only counts directly under an object.
fn classify_element(
    name: &[u8],
    stack: &[Frame],
    object: &Option<ObjectRecord>,
    property: &Option<Property>,
) -> Frame {
    match name {
        b"object" if object.is_none() => Frame::Object,
        b"property" if matches!(stack.last(), Some(Frame::Object)) && property.is_none() => {
            Frame::Property
        }
        b"id" => Frame::Id,
        _ => Frame::Other,
    }
}

fn attr_string(e: &BytesStart, key: &[u8]) -> String {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return String::from_utf8_lossy(&attr.value).to_string();
        }
    }
    String::new()
}

/// Route a text chunk to the innermost open element. An <id> under the
/// object names the record; under a property it is the foreign key.
fn append_text(
    stack: &[Frame],
    object: &mut Option<ObjectRecord>,
    property: &mut Option<Property>,
    text: &str,
) {
    match stack.last() {
        Some(Frame::Id) => {
            let parent = stack.len().checked_sub(2).and_then(|i| stack.get(i));
            match parent {
                Some(Frame::Object) => {
                    if let Some(obj) = object {
                        obj.id.push_str(text);
                    }
                }
                Some(Frame::Property) => {
                    if let Some(prop) = property {
                        match prop.ref_id {
                            Some(ref mut id) => id.push_str(text),
                            None => prop.ref_id = Some(text.to_string()),
                        }
                    }
                }
                _ => {}
            }
        }
        Some(Frame::Property) => {
            if let Some(prop) = property {
                prop.text.push_str(text);
            }
        }
        _ => {}
    }
}
