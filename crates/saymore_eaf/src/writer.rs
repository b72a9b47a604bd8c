//! Serializes an [`AnnotationDocument`] back to EAF XML.

use crate::document::AnnotationDocument;
use crate::error::{EafError, EafResult};
use crate::model::{Annotation, Header, Tier};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

type XmlWriter = Writer<Vec<u8>>;

pub(crate) fn write(doc: &AnnotationDocument) -> EafResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;

    let root = start("ANNOTATION_DOCUMENT", pairs(&doc.attributes));
    emit(&mut writer, Event::Start(root))?;

    if let Some(header) = &doc.header {
        write_header(&mut writer, header)?;
    }

    if doc.time_slots.is_empty() {
        emit(&mut writer, Event::Empty(BytesStart::new("TIME_ORDER")))?;
    } else {
        emit(&mut writer, Event::Start(BytesStart::new("TIME_ORDER")))?;
        for slot in &doc.time_slots {
            let value = slot.value_ms.map(|ms| ms.to_string());
            let mut attrs = vec![("TIME_SLOT_ID", slot.id.as_str())];
            if let Some(value) = value.as_deref() {
                attrs.push(("TIME_VALUE", value));
            }
            emit(&mut writer, Event::Empty(start("TIME_SLOT", attrs)))?;
        }
        emit(&mut writer, Event::End(BytesEnd::new("TIME_ORDER")))?;
    }

    for tier in &doc.tiers {
        write_tier(&mut writer, tier)?;
    }

    for declaration in &doc.declarations {
        let element = start(&declaration.name, pairs(&declaration.attributes));
        emit(&mut writer, Event::Empty(element))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("ANNOTATION_DOCUMENT")))?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(EafError::write)?;
    xml.push('\n');
    Ok(xml)
}

fn write_header(writer: &mut XmlWriter, header: &Header) -> EafResult<()> {
    let mut attrs = Vec::new();
    if let Some(media_file) = header.media_file.as_deref() {
        attrs.push(("MEDIA_FILE", media_file));
    }
    if let Some(time_units) = header.time_units.as_deref() {
        attrs.push(("TIME_UNITS", time_units));
    }
    emit(writer, Event::Start(start("HEADER", attrs)))?;

    for descriptor in &header.media_descriptors {
        let mut attrs = Vec::new();
        if let Some(url) = descriptor.media_url.as_deref() {
            attrs.push(("MEDIA_URL", url));
        }
        if let Some(mime) = descriptor.mime_type.as_deref() {
            attrs.push(("MIME_TYPE", mime));
        }
        attrs.extend(pairs(&descriptor.attributes));
        emit(writer, Event::Empty(start("MEDIA_DESCRIPTOR", attrs)))?;
    }

    for property in &header.properties {
        let attrs: Vec<_> = property
            .name
            .as_deref()
            .map(|name| ("NAME", name))
            .into_iter()
            .collect();
        text_element(writer, start("PROPERTY", attrs), &property.value)?;
    }

    emit(writer, Event::End(BytesEnd::new("HEADER")))
}

fn write_tier(writer: &mut XmlWriter, tier: &Tier) -> EafResult<()> {
    let mut attrs = vec![
        ("TIER_ID", tier.id.as_str()),
        ("LINGUISTIC_TYPE_REF", tier.linguistic_type_ref.as_str()),
    ];
    if let Some(parent) = tier.parent_ref.as_deref() {
        attrs.push(("PARENT_REF", parent));
    }
    attrs.extend(pairs(&tier.attributes));

    if tier.annotations.is_empty() {
        return emit(writer, Event::Empty(start("TIER", attrs)));
    }

    emit(writer, Event::Start(start("TIER", attrs)))?;
    for annotation in &tier.annotations {
        emit(writer, Event::Start(BytesStart::new("ANNOTATION")))?;
        let (name, element) = match annotation {
            Annotation::Alignable(a) => (
                "ALIGNABLE_ANNOTATION",
                start(
                    "ALIGNABLE_ANNOTATION",
                    vec![
                        ("ANNOTATION_ID", a.id.as_str()),
                        ("TIME_SLOT_REF1", a.time_slot_ref1.as_str()),
                        ("TIME_SLOT_REF2", a.time_slot_ref2.as_str()),
                    ],
                ),
            ),
            Annotation::Reference(r) => (
                "REF_ANNOTATION",
                start(
                    "REF_ANNOTATION",
                    vec![
                        ("ANNOTATION_ID", r.id.as_str()),
                        ("ANNOTATION_REF", r.annotation_ref.as_str()),
                    ],
                ),
            ),
        };
        emit(writer, Event::Start(element))?;
        text_element(
            writer,
            BytesStart::new("ANNOTATION_VALUE"),
            annotation.value(),
        )?;
        emit(writer, Event::End(BytesEnd::new(name)))?;
        emit(writer, Event::End(BytesEnd::new("ANNOTATION")))?;
    }
    emit(writer, Event::End(BytesEnd::new("TIER")))
}

/// Writes `<name ...>text</name>`, keeping the start and end tags even
/// when `text` is empty.
fn text_element(writer: &mut XmlWriter, element: BytesStart<'_>, text: &str) -> EafResult<()> {
    let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
    emit(writer, Event::Start(element))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn start<'a>(name: &'a str, attrs: Vec<(&'a str, &'a str)>) -> BytesStart<'a> {
    BytesStart::new(name).with_attributes(attrs)
}

fn pairs(attrs: &[(String, String)]) -> Vec<(&str, &str)> {
    attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

fn emit(writer: &mut XmlWriter, event: Event<'_>) -> EafResult<()> {
    writer.write_event(event).map_err(EafError::write)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FREE_TRANSLATION_TIER_ID;

    #[test]
    fn new_document_round_trips() {
        let doc = AnnotationDocument::new_for_media("Recording.wav");
        let xml = write(&doc).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));

        let reparsed = AnnotationDocument::from_xml(&xml).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn annotations_and_slots_round_trip() {
        let mut doc = AnnotationDocument::new_for_media("Recording.wav");
        let a1 = doc.add_transcription_annotation(0.0, 2.121, Some("one")).unwrap();
        doc.add_transcription_annotation(2.121, 3.5, None).unwrap();
        doc.set_dependent_annotation_value(FREE_TRANSLATION_TIER_ID, &a1, Some("uno"))
            .unwrap();

        let reparsed = AnnotationDocument::from_xml(&write(&doc).unwrap()).unwrap();
        assert_eq!(reparsed, doc);
        assert_eq!(reparsed.time_slot_seconds("ts2"), Some(2.121));
        assert_eq!(
            reparsed.dependent_annotations(FREE_TRANSLATION_TIER_ID)[a1.as_str()].value,
            "uno"
        );
    }

    #[test]
    fn empty_values_keep_their_element() {
        let mut doc = AnnotationDocument::new_for_media("Recording.wav");
        doc.add_transcription_annotation(0.0, 1.0, None).unwrap();
        let xml = write(&doc).unwrap();
        assert!(xml.contains("<ANNOTATION_VALUE></ANNOTATION_VALUE>"));
    }

    #[test]
    fn edge_whitespace_in_values_round_trips() {
        let mut doc = AnnotationDocument::new_for_media("Recording.wav");
        let a1 = doc
            .add_transcription_annotation(0.0, 1.0, Some(" two  spaces "))
            .unwrap();
        doc.set_dependent_annotation_value(FREE_TRANSLATION_TIER_ID, &a1, Some("\tdos "))
            .unwrap();

        let reparsed = AnnotationDocument::from_xml(&write(&doc).unwrap()).unwrap();
        assert_eq!(reparsed.transcription_annotations()[0].value, " two  spaces ");
        assert_eq!(
            reparsed.dependent_annotations(FREE_TRANSLATION_TIER_ID)[a1.as_str()].value,
            "\tdos "
        );
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn special_characters_are_escaped() {
        let mut doc = AnnotationDocument::new_for_media("Tom & Jerry.wav");
        doc.add_transcription_annotation(0.0, 1.0, Some("<a> & \"b\""))
            .unwrap();
        let xml = write(&doc).unwrap();
        assert!(xml.contains("Tom &amp; Jerry.wav"));

        let reparsed = AnnotationDocument::from_xml(&xml).unwrap();
        assert_eq!(reparsed.media_file_name(), Some("Tom & Jerry.wav"));
        assert_eq!(reparsed.transcription_annotations()[0].value, "<a> & \"b\"");
    }

    #[test]
    fn unaligned_slot_omits_time_value() {
        let xml = r#"<ANNOTATION_DOCUMENT><TIME_ORDER><TIME_SLOT TIME_SLOT_ID="ts1"/></TIME_ORDER></ANNOTATION_DOCUMENT>"#;
        let doc = AnnotationDocument::from_xml(xml).unwrap();
        let written = write(&doc).unwrap();
        assert!(written.contains(r#"<TIME_SLOT TIME_SLOT_ID="ts1"/>"#));
    }
}
