//! Boundaries survive annotation files and segment file names exactly.

use proptest::prelude::*;
use saymore_core::{
    parse_segment_file_name, segment_file_name, AnnotationFile, OralAnnotationType, TierConfig,
    TimeRange,
};
use saymore_eaf::{AnnotationDocument, FREE_TRANSLATION_TIER_ID, TRANSCRIPTION_TIER_ID};
use saymore_testkit::prelude::*;

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn boundaries_survive_save_and_load(ranges in contiguous_ranges_strategy(600_000, 30)) {
        prop_assume!(!ranges.is_empty());
        let session = TestSession::new(1.0);
        let file = AnnotationFile::create_from_segments(
            session.media_file(),
            &ranges,
            session.config(),
        )
        .unwrap();

        let reloaded = AnnotationDocument::load(file.path()).unwrap();
        let loaded: Vec<TimeRange> = reloaded
            .transcription_annotations()
            .iter()
            .map(|a| {
                TimeRange::new(
                    reloaded.time_slot_seconds(&a.time_slot_ref1).unwrap(),
                    reloaded.time_slot_seconds(&a.time_slot_ref2).unwrap(),
                )
            })
            .collect();
        prop_assert_eq!(loaded, ranges);
    }

    #[test]
    fn boundaries_survive_file_names(ranges in contiguous_ranges_strategy(600_000, 30)) {
        let config = TierConfig::default();
        for range in ranges {
            for kind in OralAnnotationType::ALL {
                let name = segment_file_name(kind, range.start, range.end, &config);
                prop_assert_eq!(parse_segment_file_name(&name, &config), Some((kind, range)));
            }
        }
    }
}

#[test]
fn edited_session_reloads_with_texts_and_files() {
    let session = TestSession::new(10.0);
    session.create_annotation_file(&["2", "5", "10"]);
    session.write_segment_file(OralAnnotationType::CarefulSpeech, TimeRange::new(2.0, 5.0));

    let (mut file, mut collection) = session.load();
    assert_eq!(collection.time_tier().total_time(), 10.0);
    assert!(collection.time_tier().is_fully_segmented());
    assert!(collection.time_tier().segments()[1]
        .has_oral_annotation(OralAnnotationType::CarefulSpeech));

    collection.set_text(TRANSCRIPTION_TIER_ID, 1, "second").unwrap();
    collection.set_text(FREE_TRANSLATION_TIER_ID, 2, "third").unwrap();
    assert!(collection.change_end_boundary_at(2.0, 1.5).is_success());
    assert!(collection.remove_segment_at(0));
    file.save(&collection).unwrap();

    let (_, reloaded) = session.load();
    assert_eq!(
        reloaded.time_tier().ranges(),
        vec![TimeRange::new(0.0, 5.0), TimeRange::new(5.0, 10.0)]
    );
    assert_eq!(
        reloaded.transcription_tier().unwrap().texts(),
        ["second", ""]
    );
    assert_eq!(
        reloaded.free_translation_tier().unwrap().texts(),
        ["", "third"]
    );
    // The careful speech file followed its segment through both edits.
    assert!(reloaded.time_tier().segments()[0]
        .has_oral_annotation(OralAnnotationType::CarefulSpeech));
    assert_eq!(segment_file_names(reloaded.time_tier()), ["0_to_5_Careful.wav"]);
    assert!(reloaded.time_tier().verify_invariants().is_empty());
}
