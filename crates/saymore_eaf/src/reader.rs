//! Streaming parser from EAF XML to [`AnnotationDocument`].
//!
//! Only the parts SayMore works with are modelled. Top-level elements
//! other than `HEADER`, `TIME_ORDER` and `TIER` become [`Declaration`]s;
//! children of those declarations, and any unknown nested element, are
//! skipped.

use crate::document::AnnotationDocument;
use crate::error::{EafError, EafResult};
use crate::model::{
    AlignableAnnotation, Annotation, Declaration, Header, MediaDescriptor, Property,
    RefAnnotation, Tier, TimeSlot,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const ROOT: &str = "ANNOTATION_DOCUMENT";

type Attributes = Vec<(String, String)>;

pub(crate) fn parse(xml: &str) -> EafResult<AnnotationDocument> {
    // No trimming: annotation and property values keep edge whitespace.
    let mut reader = Reader::from_str(xml);

    let mut parser = Parser::default();
    let mut buf = Vec::new();

    loop {
        let position = reader.buffer_position();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                parser.open(e, position)?;
            }
            Ok(Event::Empty(ref e)) => {
                parser.open(e, position)?;
                parser.close();
            }
            Ok(Event::End(_)) => parser.close(),
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().map_err(|err| EafError::xml(position, err))?;
                parser.text(&text);
            }
            Ok(Event::CData(ref e)) => {
                parser.text(&String::from_utf8_lossy(e));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(EafError::xml(reader.buffer_position(), e)),
            _ => {}
        }
        buf.clear();
    }

    parser.finish(reader.buffer_position())
}

#[derive(Default)]
struct Parser {
    doc: AnnotationDocument,
    seen_root: bool,
    /// Names of the currently open elements, root first.
    stack: Vec<String>,
    text: String,
    annotation: Option<Annotation>,
}

impl Parser {
    fn open(&mut self, e: &BytesStart<'_>, position: usize) -> EafResult<()> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let attrs = read_attributes(e, position)?;
        self.text.clear();

        let parent = self.stack.last().cloned();
        match (self.stack.len(), parent.as_deref(), name.as_str()) {
            (0, _, ROOT) => {
                self.seen_root = true;
                self.doc.attributes = attrs;
            }
            (0, _, other) => {
                return Err(EafError::invalid_structure(format!(
                    "root element is {other}, expected {ROOT}"
                )));
            }
            (1, _, "HEADER") => self.open_header(attrs),
            (1, _, "TIME_ORDER") => {}
            (1, _, "TIER") => self.open_tier(attrs)?,
            (1, _, _) => self.doc.declarations.push(Declaration {
                name: name.clone(),
                attributes: attrs,
            }),
            (2, Some("HEADER"), "MEDIA_DESCRIPTOR") => self.open_media_descriptor(attrs),
            (2, Some("HEADER"), "PROPERTY") => self.open_property(attrs),
            (2, Some("TIME_ORDER"), "TIME_SLOT") => self.open_time_slot(attrs)?,
            (3, Some("ANNOTATION"), "ALIGNABLE_ANNOTATION") => {
                self.annotation = Some(Annotation::Alignable(AlignableAnnotation {
                    id: attribute(&attrs, "ANNOTATION_ID"),
                    time_slot_ref1: attribute(&attrs, "TIME_SLOT_REF1"),
                    time_slot_ref2: attribute(&attrs, "TIME_SLOT_REF2"),
                    value: String::new(),
                }));
            }
            (3, Some("ANNOTATION"), "REF_ANNOTATION") => {
                self.annotation = Some(Annotation::Reference(RefAnnotation {
                    id: attribute(&attrs, "ANNOTATION_ID"),
                    annotation_ref: attribute(&attrs, "ANNOTATION_REF"),
                    value: String::new(),
                }));
            }
            _ => {}
        }

        self.stack.push(name);
        Ok(())
    }

    fn close(&mut self) {
        let Some(name) = self.stack.pop() else {
            return;
        };
        let parent = self.stack.last().map(String::as_str);

        match (self.stack.len(), parent, name.as_str()) {
            (2, Some("HEADER"), "PROPERTY") => {
                if let Some(property) = self
                    .doc
                    .header
                    .as_mut()
                    .and_then(|h| h.properties.last_mut())
                {
                    property.value = std::mem::take(&mut self.text);
                }
            }
            (4, Some("ALIGNABLE_ANNOTATION" | "REF_ANNOTATION"), "ANNOTATION_VALUE") => {
                if let Some(annotation) = self.annotation.as_mut() {
                    annotation.set_value(std::mem::take(&mut self.text));
                }
            }
            (3, Some("ANNOTATION"), "ALIGNABLE_ANNOTATION" | "REF_ANNOTATION") => {
                if let (Some(annotation), Some(tier)) =
                    (self.annotation.take(), self.doc.tiers.last_mut())
                {
                    tier.annotations.push(annotation);
                }
            }
            _ => {}
        }
        self.text.clear();
    }

    fn text(&mut self, text: &str) {
        if matches!(
            self.stack.last().map(String::as_str),
            Some("PROPERTY" | "ANNOTATION_VALUE")
        ) {
            self.text.push_str(text);
        }
    }

    fn finish(self, position: usize) -> EafResult<AnnotationDocument> {
        if !self.seen_root {
            return Err(EafError::invalid_structure(format!(
                "document has no {ROOT} element"
            )));
        }
        if let Some(open) = self.stack.last() {
            return Err(EafError::xml(
                position,
                format!("unexpected end of document inside {open}"),
            ));
        }
        Ok(self.doc)
    }

    fn open_header(&mut self, mut attrs: Attributes) {
        self.doc.header = Some(Header {
            media_file: take_opt(&mut attrs, "MEDIA_FILE"),
            time_units: take_opt(&mut attrs, "TIME_UNITS"),
            media_descriptors: Vec::new(),
            properties: Vec::new(),
        });
    }

    fn open_media_descriptor(&mut self, mut attrs: Attributes) {
        let descriptor = MediaDescriptor {
            media_url: take_opt(&mut attrs, "MEDIA_URL"),
            mime_type: take_opt(&mut attrs, "MIME_TYPE"),
            attributes: attrs,
        };
        if let Some(header) = self.doc.header.as_mut() {
            header.media_descriptors.push(descriptor);
        }
    }

    fn open_property(&mut self, mut attrs: Attributes) {
        let property = Property {
            name: take_opt(&mut attrs, "NAME"),
            value: String::new(),
        };
        if let Some(header) = self.doc.header.as_mut() {
            header.properties.push(property);
        }
    }

    fn open_time_slot(&mut self, mut attrs: Attributes) -> EafResult<()> {
        let id = take(&mut attrs, "TIME_SLOT_ID");
        let value_ms = match take_opt(&mut attrs, "TIME_VALUE") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                EafError::InvalidTimeValue {
                    slot_id: id.clone(),
                    value: raw.clone(),
                }
            })?),
            None => None,
        };
        self.doc.time_slots.push(TimeSlot { id, value_ms });
        Ok(())
    }

    fn open_tier(&mut self, mut attrs: Attributes) -> EafResult<()> {
        let id = take_opt(&mut attrs, "TIER_ID")
            .ok_or_else(|| EafError::invalid_structure("TIER without TIER_ID"))?;
        self.doc.tiers.push(Tier {
            id,
            linguistic_type_ref: take(&mut attrs, "LINGUISTIC_TYPE_REF"),
            parent_ref: take_opt(&mut attrs, "PARENT_REF"),
            attributes: attrs,
            annotations: Vec::new(),
        });
        Ok(())
    }
}

fn read_attributes(e: &BytesStart<'_>, position: usize) -> EafResult<Attributes> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| EafError::xml(position, err))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| EafError::xml(position, err))?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(attrs)
}

fn take_opt(attrs: &mut Attributes, key: &str) -> Option<String> {
    let index = attrs.iter().position(|(k, _)| k == key)?;
    Some(attrs.remove(index).1)
}

fn take(attrs: &mut Attributes, key: &str) -> String {
    take_opt(attrs, key).unwrap_or_default()
}

fn attribute(attrs: &Attributes, key: &str) -> String {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            parse(""),
            Err(EafError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn values_keep_surrounding_whitespace() {
        let xml = "<ANNOTATION_DOCUMENT>\n  <HEADER>\n    <PROPERTY NAME=\"note\"> padded </PROPERTY>\n  </HEADER>\n  <TIER TIER_ID=\"Transcription\">\n    <ANNOTATION>\n      <ALIGNABLE_ANNOTATION ANNOTATION_ID=\"a1\">\n        <ANNOTATION_VALUE>  hi </ANNOTATION_VALUE>\n      </ALIGNABLE_ANNOTATION>\n    </ANNOTATION>\n  </TIER>\n</ANNOTATION_DOCUMENT>\n";
        let doc = parse(xml).unwrap();

        let header = doc.header.as_ref().unwrap();
        assert_eq!(header.properties[0].value, " padded ");
        assert_eq!(doc.tiers[0].annotations[0].value(), "  hi ");
    }

    #[test]
    fn wrong_root_is_an_error() {
        assert!(matches!(
            parse("<root/>"),
            Err(EafError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn mismatched_tags_are_an_error() {
        assert!(matches!(
            parse("<ANNOTATION_DOCUMENT><HEADER></TIER></ANNOTATION_DOCUMENT>"),
            Err(EafError::Xml { .. })
        ));
    }

    #[test]
    fn bad_time_value_is_an_error() {
        let xml = r#"<ANNOTATION_DOCUMENT><TIME_ORDER><TIME_SLOT TIME_SLOT_ID="ts1" TIME_VALUE="soon"/></TIME_ORDER></ANNOTATION_DOCUMENT>"#;
        match parse(xml) {
            Err(EafError::InvalidTimeValue { slot_id, value }) => {
                assert_eq!(slot_id, "ts1");
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unaligned_time_slot_has_no_value() {
        let xml = r#"<ANNOTATION_DOCUMENT><TIME_ORDER><TIME_SLOT TIME_SLOT_ID="ts1"/></TIME_ORDER></ANNOTATION_DOCUMENT>"#;
        let doc = parse(xml).unwrap();
        assert_eq!(doc.time_slots[0].value_ms, None);
    }

    #[test]
    fn escaped_text_is_unescaped() {
        let xml = r#"<ANNOTATION_DOCUMENT>
            <TIER TIER_ID="Transcription" LINGUISTIC_TYPE_REF="Transcription">
              <ANNOTATION>
                <ALIGNABLE_ANNOTATION ANNOTATION_ID="a1" TIME_SLOT_REF1="ts1" TIME_SLOT_REF2="ts2">
                  <ANNOTATION_VALUE>fish &amp; chips</ANNOTATION_VALUE>
                </ALIGNABLE_ANNOTATION>
              </ANNOTATION>
            </TIER>
        </ANNOTATION_DOCUMENT>"#;
        let doc = parse(xml).unwrap();
        assert_eq!(doc.tiers[0].annotations[0].value(), "fish & chips");
    }

    #[test]
    fn empty_annotation_value() {
        let xml = r#"<ANNOTATION_DOCUMENT>
            <TIER TIER_ID="Transcription" LINGUISTIC_TYPE_REF="Transcription">
              <ANNOTATION>
                <ALIGNABLE_ANNOTATION ANNOTATION_ID="a1" TIME_SLOT_REF1="ts1" TIME_SLOT_REF2="ts2">
                  <ANNOTATION_VALUE/>
                </ALIGNABLE_ANNOTATION>
              </ANNOTATION>
            </TIER>
        </ANNOTATION_DOCUMENT>"#;
        let doc = parse(xml).unwrap();
        assert_eq!(doc.tiers[0].annotations[0].value(), "");
    }

    #[test]
    fn tier_attributes_are_preserved() {
        let xml = r#"<ANNOTATION_DOCUMENT><TIER TIER_ID="Notes" LINGUISTIC_TYPE_REF="Translation" PARENT_REF="Transcription" PARTICIPANT="mary"/></ANNOTATION_DOCUMENT>"#;
        let doc = parse(xml).unwrap();
        let tier = &doc.tiers[0];
        assert_eq!(tier.id, "Notes");
        assert_eq!(tier.parent_ref.as_deref(), Some("Transcription"));
        assert_eq!(
            tier.attributes,
            vec![("PARTICIPANT".to_string(), "mary".to_string())]
        );
    }

    #[test]
    fn unknown_top_level_elements_become_declarations() {
        let xml = r#"<ANNOTATION_DOCUMENT><LOCALE LANGUAGE_CODE="en"/><CONTROLLED_VOCABULARY CV_ID="x"><CV_ENTRY>y</CV_ENTRY></CONTROLLED_VOCABULARY></ANNOTATION_DOCUMENT>"#;
        let doc = parse(xml).unwrap();
        assert_eq!(doc.declarations.len(), 2);
        assert_eq!(doc.declarations[0].attribute("LANGUAGE_CODE"), Some("en"));
        assert_eq!(doc.declarations[1].name, "CONTROLLED_VOCABULARY");
    }

    #[test]
    fn tier_without_id_is_an_error() {
        assert!(parse("<ANNOTATION_DOCUMENT><TIER/></ANNOTATION_DOCUMENT>").is_err());
    }
}
