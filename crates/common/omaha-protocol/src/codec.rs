//! XML encoding and decoding of Omaha documents.

use quick_xml::{Reader, events::Event, se::Serializer};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{ProtocolError, Result},
    types::{Request, Response},
};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// A top-level Omaha document with a fixed root element.
pub trait Document: Serialize + DeserializeOwned {
    const ROOT: &'static str;
}

impl Document for Request {
    const ROOT: &'static str = "request";
}

impl Document for Response {
    const ROOT: &'static str = "response";
}

/// Output layout for [`encode_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Indent {
    /// Everything on one line.
    #[default]
    None,
    /// One element per line, nested by the given number of spaces.
    Spaces(usize),
}

/// Parses `bytes` into a document of type `T`.
///
/// Fails with [`ProtocolError::MalformedDocument`] when the input is not
/// UTF-8, is not a single well-formed XML document, has a different root
/// element, or lacks a required attribute.
pub fn decode<T: Document>(bytes: &[u8]) -> Result<T> {
    let xml = std::str::from_utf8(bytes)
        .map_err(|e| ProtocolError::MalformedDocument(format!("invalid UTF-8: {}", e)))?;

    let root = check_structure(xml)?;
    if root != T::ROOT {
        return Err(ProtocolError::MalformedDocument(format!(
            "expected <{}> root element, found <{}>",
            T::ROOT,
            root
        )));
    }

    quick_xml::de::from_str(xml).map_err(|e| ProtocolError::MalformedDocument(e.to_string()))
}

/// Parses a client `<request>`.
pub fn decode_request(bytes: &[u8]) -> Result<Request> {
    decode(bytes)
}

/// Parses a server `<response>`.
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    decode(bytes)
}

/// Serializes `doc` on a single line, prefixed with an XML declaration.
pub fn encode<T: Document>(doc: &T) -> Result<String> {
    encode_with(doc, Indent::None)
}

/// Serializes `doc` with the requested layout. Indentation never changes
/// the decoded value.
pub fn encode_with<T: Document>(doc: &T, indent: Indent) -> Result<String> {
    let mut out = String::from(XML_DECLARATION);
    if matches!(indent, Indent::Spaces(_)) {
        out.push('\n');
    }

    let mut serializer = Serializer::with_root(&mut out, Some(T::ROOT))?;
    if let Indent::Spaces(width) = indent {
        serializer.indent(' ', width);
    }
    doc.serialize(serializer)?;

    Ok(out)
}

fn malformed(reason: impl Into<String>) -> ProtocolError {
    ProtocolError::MalformedDocument(reason.into())
}

fn element_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

/// Walks the whole document and returns the name of its single root element.
///
/// Outside the root only the prolog, comments, processing instructions and
/// whitespace are allowed.
fn check_structure(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut root: Option<String> = None;
    let mut depth = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| malformed(e.to_string()))?;
        match event {
            Event::Eof => break,
            Event::Start(_) if depth > 0 => depth += 1,
            Event::End(_) if depth > 0 => depth -= 1,
            _ if depth > 0 => {}

            Event::Start(e) if root.is_none() => {
                root = Some(element_name(e.local_name().as_ref()));
                depth = 1;
            }
            Event::Empty(e) if root.is_none() => {
                root = Some(element_name(e.local_name().as_ref()));
            }
            Event::Start(e) | Event::Empty(e) => {
                return Err(malformed(format!(
                    "second root element <{}>",
                    element_name(e.local_name().as_ref())
                )));
            }

            Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
            Event::Comment(_) | Event::PI(_) => {}
            Event::Decl(_) | Event::DocType(_) if root.is_none() => {}
            _ if root.is_some() => {
                return Err(malformed("content after the root element"));
            }
            _ => return Err(malformed("content before the root element")),
        }
    }

    if depth > 0 {
        return Err(malformed("root element is not closed"));
    }
    root.ok_or_else(|| malformed("document has no root element"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_skips_prolog_and_epilog() {
        let xml = "<?xml version=\"1.0\"?><!-- client -->\n<request protocol=\"3.0\"/>\n<!-- end -->\n";
        assert_eq!(check_structure(xml).unwrap(), "request");
    }

    #[test]
    fn test_structure_rejects_empty_input() {
        assert!(matches!(
            check_structure("   "),
            Err(ProtocolError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_structure_rejects_content_after_root() {
        let cases = [
            r#"<request protocol="3.0"><app appid="a"/></request><junk"#,
            r#"<request protocol="3.0"><app appid="a"/></request><request protocol="1"/>"#,
            r#"<request protocol="3.0"><app appid="a"/></request>hello"#,
            r#"<request protocol="3.0"/><?xml version="1.0"?>"#,
        ];
        for xml in cases {
            assert!(
                matches!(check_structure(xml), Err(ProtocolError::MalformedDocument(_))),
                "accepted {xml:?}"
            );
        }
    }

    #[test]
    fn test_structure_rejects_text_before_root() {
        let err = check_structure(r#"oops<request protocol="3.0"/>"#).unwrap_err();
        assert!(err.to_string().contains("before the root"));
    }

    #[test]
    fn test_structure_rejects_unclosed_root() {
        assert!(check_structure(r#"<request protocol="3.0"><app appid="a"/>"#).is_err());
    }

    #[test]
    fn test_decode_rejects_wrong_root() {
        let err = decode_request(br#"<response protocol="3.0" server="x"/>"#).unwrap_err();
        assert!(err.to_string().contains("expected <request>"));
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let err = decode_request(&[0x3c, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedDocument(_)));
    }

    #[test]
    fn test_encode_starts_with_declaration() {
        let request = Request {
            protocol: "3.0".to_owned(),
            ..Default::default()
        };
        let xml = encode(&request).unwrap();
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains(r#"<request protocol="3.0"/>"#));
    }
}
