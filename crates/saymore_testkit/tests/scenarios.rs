//! End-to-end boundary editing scenarios.

use saymore_core::{
    careful_speech_file_name, BackupToFolder, BoundaryModificationResult, CoreError,
    ObsoleteReason, OralAnnotationType, TierConfig, TimeRange,
};
use saymore_storage::SegmentFileStore;
use saymore_testkit::prelude::*;
use std::sync::Arc;

fn ranges(tier: &saymore_core::TimeTier) -> Vec<(f32, f32)> {
    tier.ranges().iter().map(|r| (r.start, r.end)).collect()
}

#[test]
fn append_extends_from_last_end_and_rejects_non_increasing_end() {
    let (mut tier, _store) = memory_tier(10.0, &[], 100);

    assert_eq!(tier.append_segment(3.0).unwrap(), TimeRange::new(0.0, 3.0));
    assert_eq!(tier.append_segment(5.9).unwrap(), TimeRange::new(3.0, 5.9));
    assert!(matches!(
        tier.append_segment(5.9),
        Err(CoreError::InvalidArgument { .. })
    ));
    assert!(tier.append_segment(4.0).is_err());
    assert_eq!(ranges(&tier), [(0.0, 3.0), (3.0, 5.9)]);
}

#[test]
fn moving_end_boundary_rejects_short_next_segment() {
    let (mut tier, store) = memory_tier(10.0, &[(0.0, 2.0), (2.0, 5.0)], 1000);
    add_all_segment_files(&store, &tier);
    let files = store.paths();

    let result = tier.change_segments_end_boundary(TimeRange::new(0.0, 2.0), 4.5);

    assert_eq!(result, BoundaryModificationResult::NextSegmentWillBeTooShort);
    assert_eq!(ranges(&tier), [(0.0, 2.0), (2.0, 5.0)]);
    assert_eq!(store.paths(), files);
}

#[test]
fn moving_end_boundary_renames_both_segments_files() {
    let (mut tier, store) = memory_tier(10.0, &[(0.0, 2.0), (2.0, 5.0)], 1000);
    add_all_segment_files(&store, &tier);

    assert!(tier.change_end_boundary_at(2.0, 3.0).is_success());

    assert_eq!(ranges(&tier), [(0.0, 3.0), (3.0, 5.0)]);
    assert_eq!(
        segment_file_names(&tier),
        [
            "0_to_3_Careful.wav",
            "0_to_3_Translation.wav",
            "3_to_5_Careful.wav",
            "3_to_5_Translation.wav"
        ]
    );
}

#[test]
fn inserting_boundary_splits_enclosing_segment() {
    let (mut tier, _store) = memory_tier(10.0, &[(0.0, 2.0), (2.0, 5.0)], 1000);

    assert_eq!(
        tier.insert_segment_boundary(3.5),
        BoundaryModificationResult::Success
    );
    assert_eq!(ranges(&tier), [(0.0, 2.0), (2.0, 3.5), (3.5, 5.0)]);

    // Both halves of a further split must be long enough.
    assert_eq!(
        tier.insert_segment_boundary(2.5),
        BoundaryModificationResult::SegmentWillBeTooShort
    );
    assert_eq!(
        tier.insert_segment_boundary(4.8),
        BoundaryModificationResult::NextSegmentWillBeTooShort
    );
    assert_eq!(tier.len(), 3);
}

#[test]
fn removing_middle_segment_lets_next_absorb_gap() {
    let (mut tier, store) = memory_tier(10.0, &[(0.0, 2.0), (2.0, 5.0), (5.0, 8.0)], 500);
    add_all_segment_files(&store, &tier);

    assert!(tier.remove_segment(TimeRange::new(2.0, 5.0)));

    assert_eq!(ranges(&tier), [(0.0, 2.0), (2.0, 8.0)]);
    assert_eq!(
        segment_file_names(&tier),
        [
            "0_to_2_Careful.wav",
            "0_to_2_Translation.wav",
            "2_to_8_Careful.wav",
            "2_to_8_Translation.wav"
        ]
    );
}

#[test]
fn shared_boundary_belongs_to_later_segment() {
    let (tier, _store) = memory_tier(2.0, &[(0.0, 1.0), (1.0, 2.0)], 100);

    let enclosing = tier.segment_enclosing_time(1.0).unwrap();
    assert_eq!(enclosing.index(), 1);
    assert_eq!(enclosing.range(), TimeRange::new(1.0, 2.0));
    assert!(tier.segment_enclosing_time(2.0).is_none());
    assert_eq!(tier.segment_enclosing_time(0.0).unwrap().index(), 0);
}

#[test]
fn careful_speech_file_name_is_stable() {
    let config = TierConfig::default();
    let first = careful_speech_file_name(2.5, 4.0, &config);
    for _ in 0..100 {
        assert_eq!(careful_speech_file_name(2.5, 4.0, &config), first);
    }
    assert_eq!(first, "2.5_to_4_Careful.wav");

    let custom = TierConfig::new().careful_speech_suffix("_CS.wav");
    assert_eq!(careful_speech_file_name(2.5, 4.0, &custom), "2.5_to_4_CS.wav");
}

#[test]
fn removal_renames_next_files_before_deleting_removed_files() {
    let (tier, store) = memory_tier(10.0, &[(0.0, 2.0), (2.0, 5.0), (5.0, 8.0)], 500);
    let observer = Arc::new(RecordingObserver::new());
    let mut tier = tier.with_observer(observer.clone());
    add_all_segment_files(&store, &tier);

    assert!(tier.remove_segment_at(1));

    assert_eq!(
        observer.file_names(),
        vec![
            ("5_to_8_Careful.wav".to_string(), ObsoleteReason::Renamed),
            ("5_to_8_Translation.wav".to_string(), ObsoleteReason::Renamed),
            ("2_to_5_Careful.wav".to_string(), ObsoleteReason::Deleted),
            ("2_to_5_Translation.wav".to_string(), ObsoleteReason::Deleted),
        ]
    );
    assert_eq!(
        segment_file_names(&tier),
        [
            "0_to_2_Careful.wav",
            "0_to_2_Translation.wav",
            "2_to_8_Careful.wav",
            "2_to_8_Translation.wav"
        ]
    );
}

#[test]
fn locked_file_does_not_block_boundary_edit() {
    let (mut tier, store) = memory_tier(10.0, &[(0.0, 2.0), (2.0, 5.0)], 500);
    add_all_segment_files(&store, &tier);
    let locked = tier
        .segment_file_path(OralAnnotationType::CarefulSpeech, TimeRange::new(2.0, 5.0));
    store.lock(&locked);

    assert!(tier.change_end_boundary_at(2.0, 3.0).is_success());

    assert_eq!(ranges(&tier), [(0.0, 3.0), (3.0, 5.0)]);
    assert!(store.exists(&locked));
    assert!(store.exists(&tier.segment_file_path(
        OralAnnotationType::Translation,
        TimeRange::new(3.0, 5.0)
    )));
    assert_eq!(
        tier.find_orphaned_segment_files().unwrap(),
        vec![locked]
    );
}

#[test]
fn backup_policy_keeps_copies_on_disk() {
    let session = TestSession::new(8.0);
    session.write_segment_file(OralAnnotationType::CarefulSpeech, TimeRange::new(0.0, 2.0));
    session.write_segment_file(OralAnnotationType::Translation, TimeRange::new(2.0, 5.0));
    let backup = session.folder().join("backup");
    std::fs::create_dir(&backup).unwrap();

    let mut tier = session
        .tier(&[(0.0, 2.0), (2.0, 5.0), (5.0, 8.0)])
        .with_observer(Arc::new(BackupToFolder::new(&backup)));

    assert!(tier.change_end_boundary_at(2.0, 3.0).is_success());
    assert!(tier.remove_segment(TimeRange::new(3.0, 5.0)));

    assert!(backup.join("0_to_2_Careful.wav").is_file());
    assert!(backup.join("2_to_5_Translation.wav").is_file());
    assert_eq!(segment_file_names(&tier), ["0_to_3_Careful.wav"]);
    assert!(!session
        .segment_folder()
        .join("3_to_5_Translation.wav")
        .exists());
    assert!(tier.store().exists(&session.segment_folder().join("0_to_3_Careful.wav")));
}
