//! # XML Documents
//!
//! XML has no native numbers, booleans or lists, so every element written
//! here carries a `type` attribute naming the kind of its content:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <config type="object">
//!   <name type="string">Anmol</name>
//!   <skills type="list">
//!     <item type="string">python</item>
//!   </skills>
//! </config>
//! ```
//!
//! Documents from other tools may omit the attribute. An untyped element
//! with children is a mapping (repeated children become a list), and an
//! untyped leaf is a string.

use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde_json::{Map, Number, Value as JsonValue};

use crate::value::ValueKind;

const ROOT_ELEMENT: &str = "config";
const LIST_ITEM: &str = "item";
const TYPE_ATTRIBUTE: &str = "type";

/// Render a plain document as an XML string.
pub(crate) fn to_xml_string(plain: &JsonValue) -> Result<String, String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, ROOT_ELEMENT, plain)?;

    let mut text = String::from_utf8(writer.into_inner()).map_err(|e| e.to_string())?;
    text.push('\n');
    Ok(text)
}

/// Parse an XML document into the plain structure.
pub(crate) fn from_xml_str(text: &str) -> Result<JsonValue, String> {
    let mut reader = Reader::from_str(text);
    let mut open: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(start) => open.push(Element::open(&start)?),
            Event::Empty(start) => {
                let element = Element::open(&start)?;
                close(element, &mut open, &mut root)?;
            }
            Event::End(_) => {
                let element = open
                    .pop()
                    .ok_or_else(|| "closing tag without an open element".to_string())?;
                close(element, &mut open, &mut root)?;
            }
            Event::Text(text) => {
                if let Some(element) = open.last_mut() {
                    element.text.push_str(&text.unescape().map_err(|e| e.to_string())?);
                }
            }
            Event::CData(data) => {
                if let Some(element) = open.last_mut() {
                    element.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(element) = open.last() {
        return Err(format!("unclosed element <{}>", element.name));
    }
    root.ok_or_else(|| "document has no root element".to_string())
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), String> {
    writer.write_event(event).map_err(|e| e.to_string())
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &JsonValue) -> Result<(), String> {
    let mut start = BytesStart::new(name);
    start.push_attribute((TYPE_ATTRIBUTE, ValueKind::of_plain(value).name()));

    match value {
        JsonValue::Object(map) if !map.is_empty() => {
            emit(writer, Event::Start(start))?;
            for (key, child) in map {
                if !is_element_name(key) {
                    return Err(format!("key '{key}' is not a valid XML element name"));
                }
                write_element(writer, key, child)?;
            }
        }
        JsonValue::Array(items) if !items.is_empty() => {
            emit(writer, Event::Start(start))?;
            for item in items {
                write_element(writer, LIST_ITEM, item)?;
            }
        }
        JsonValue::Bool(b) => {
            emit(writer, Event::Start(start))?;
            emit(writer, Event::Text(BytesText::new(if *b { "true" } else { "false" })))?;
        }
        JsonValue::Number(n) => {
            emit(writer, Event::Start(start))?;
            emit(writer, Event::Text(BytesText::new(&n.to_string())))?;
        }
        JsonValue::String(s) if !s.is_empty() => {
            emit(writer, Event::Start(start))?;
            emit(writer, Event::Text(BytesText::new(s)))?;
        }
        // null, empty strings and empty containers
        _ => return emit(writer, Event::Empty(start)),
    }

    emit(writer, Event::End(BytesEnd::new(name)))
}

fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// An element whose closing tag has not been read yet.
struct Element {
    name: String,
    kind: Option<String>,
    children: Vec<(String, JsonValue)>,
    text: String,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self, String> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let kind = match start.try_get_attribute(TYPE_ATTRIBUTE).map_err(|e| e.to_string())? {
            Some(attribute) => Some(
                attribute
                    .unescape_value()
                    .map_err(|e| e.to_string())?
                    .into_owned(),
            ),
            None => None,
        };
        Ok(Self {
            name,
            kind,
            children: Vec::new(),
            text: String::new(),
        })
    }

    fn finish(self, is_root: bool) -> Result<JsonValue, String> {
        let Self {
            name,
            kind,
            children,
            text,
        } = self;
        let invalid = |what: &str, raw: &str| format!("invalid {what} in <{name}>: '{}'", raw.trim());

        match kind.as_deref() {
            Some("object" | "dict") => Ok(JsonValue::Object(children.into_iter().collect())),
            Some("list") => Ok(JsonValue::Array(
                children.into_iter().map(|(_, value)| value).collect(),
            )),
            Some("null") => Ok(JsonValue::Null),
            Some("string") => Ok(JsonValue::String(text)),
            Some("bool") => match text.trim() {
                "true" => Ok(JsonValue::Bool(true)),
                "false" => Ok(JsonValue::Bool(false)),
                other => Err(invalid("bool", other)),
            },
            Some("int") => {
                let digits = text.trim();
                digits
                    .parse::<i64>()
                    .map(JsonValue::from)
                    .or_else(|_| digits.parse::<u64>().map(JsonValue::from))
                    .map_err(|_| invalid("int", digits))
            }
            Some("float") => text
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(JsonValue::Number)
                .ok_or_else(|| invalid("float", &text)),
            Some(other) => Err(format!("unknown type '{other}' on <{name}>")),
            None if is_root || !children.is_empty() => Ok(group_children(children)),
            None => Ok(JsonValue::String(text.trim().to_string())),
        }
    }
}

fn close(
    element: Element,
    open: &mut [Element],
    root: &mut Option<JsonValue>,
) -> Result<(), String> {
    let name = element.name.clone();
    let value = element.finish(open.is_empty())?;
    match open.last_mut() {
        Some(parent) => parent.children.push((name, value)),
        None if root.is_some() => return Err("document has more than one root element".to_string()),
        None => *root = Some(value),
    }
    Ok(())
}

/// Mapping for an untyped element; repeated child names collect into a list.
fn group_children(children: Vec<(String, JsonValue)>) -> JsonValue {
    let mut grouped: IndexMap<String, Vec<JsonValue>> = IndexMap::new();
    for (name, value) in children {
        grouped.entry(name).or_default().push(value);
    }

    let map: Map<String, JsonValue> = grouped
        .into_iter()
        .map(|(name, mut values)| {
            let value = if values.len() == 1 {
                values.remove(0)
            } else {
                JsonValue::Array(values)
            };
            (name, value)
        })
        .collect();
    JsonValue::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_keeps_types() {
        let plain = json!({
            "name": "Anmol",
            "age": 21,
            "id": u64::MAX,
            "version": 1.0,
            "enabled": true,
            "nothing": null,
            "empty": "",
            "skill": {"language": ["python", "c++"], "experience": {"years": 3}},
            "records": [{"host": "a"}, [1, 2], []],
            "meta": {}
        });
        let xml = to_xml_string(&plain).unwrap();
        assert_eq!(from_xml_str(&xml).unwrap(), plain);
    }

    #[test]
    fn test_written_layout() {
        let xml = to_xml_string(&json!({"name": "Anmol", "tags": ["x"]})).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<config type=\"object\">"));
        assert!(xml.contains("<name type=\"string\">Anmol</name>"));
        assert!(xml.contains("<item type=\"string\">x</item>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let plain = json!({"expr": "a < b && c > \"d\"", "padded": "  spaced  "});
        let xml = to_xml_string(&plain).unwrap();
        assert!(xml.contains("&lt;"));
        assert_eq!(from_xml_str(&xml).unwrap(), plain);
    }

    #[test]
    fn test_key_must_be_element_name() {
        let err = to_xml_string(&json!({"c++": 1})).unwrap_err();
        assert!(err.contains("'c++'"));
        assert!(to_xml_string(&json!({"1st": 1})).is_err());
        assert!(to_xml_string(&json!({"font-size": 1, "_x.y": 2})).is_ok());
    }

    #[test]
    fn test_untyped_document() {
        let xml = r#"
<settings>
  <host>localhost</host>
  <server><port>80</port></server>
  <user>a</user>
  <user>b</user>
</settings>
"#;
        assert_eq!(
            from_xml_str(xml).unwrap(),
            json!({"host": "localhost", "server": {"port": "80"}, "user": ["a", "b"]})
        );
        assert_eq!(from_xml_str("<config/>").unwrap(), json!({}));
    }

    #[test]
    fn test_invalid_documents() {
        assert!(from_xml_str("<config><a type=\"int\">x</a></config>").is_err());
        assert!(from_xml_str("<config><a type=\"date\">x</a></config>").is_err());
        assert!(from_xml_str("<config><a></b></config>").is_err());
        assert!(from_xml_str("<config>").is_err());
        assert!(from_xml_str("just text").is_err());
    }
}
