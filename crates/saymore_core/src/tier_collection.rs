//! A time tier together with its dependent text tiers.

use crate::error::{CoreError, CoreResult};
use crate::segment::Segment;
use crate::text_tier::{TextTier, TextTierType};
use crate::time_tier::TimeTier;
use crate::types::{BoundaryModificationResult, TimeRange};

/// One time tier and the text tiers aligned with it.
///
/// Structural edits go through the collection so that every text tier
/// keeps exactly one text per segment: a split inserts an empty text
/// after the split segment, an append adds an empty text at the end, and
/// a removal drops the removed segment's text.
#[derive(Debug)]
pub struct TierCollection {
    time_tier: TimeTier,
    text_tiers: Vec<TextTier>,
}

impl TierCollection {
    /// Creates a collection with an empty transcription tier.
    #[must_use]
    pub fn new(time_tier: TimeTier) -> Self {
        let mut transcription = TextTier::new(
            saymore_eaf::TRANSCRIPTION_TIER_ID,
            TextTierType::Transcription,
        );
        transcription.resize(time_tier.len());
        Self {
            time_tier,
            text_tiers: vec![transcription],
        }
    }

    /// Adds a dependent text tier, padding it with empty texts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the tier has more texts than there are
    /// segments, or a tier with the same id already exists.
    pub fn add_text_tier(&mut self, mut tier: TextTier) -> CoreResult<()> {
        if tier.len() > self.time_tier.len() {
            return Err(CoreError::invalid_argument(format!(
                "text tier {} has {} texts for {} segments",
                tier.id(),
                tier.len(),
                self.time_tier.len()
            )));
        }
        if self.text_tier(tier.id()).is_some() {
            return Err(CoreError::invalid_argument(format!(
                "duplicate text tier {}",
                tier.id()
            )));
        }
        tier.resize(self.time_tier.len());
        self.text_tiers.push(tier);
        Ok(())
    }

    /// The time tier.
    #[must_use]
    pub fn time_tier(&self) -> &TimeTier {
        &self.time_tier
    }

    /// Consumes the collection, returning the time tier.
    #[must_use]
    pub fn into_time_tier(self) -> TimeTier {
        self.time_tier
    }

    /// All text tiers; the transcription tier comes first.
    #[must_use]
    pub fn text_tiers(&self) -> &[TextTier] {
        &self.text_tiers
    }

    /// A text tier by id.
    #[must_use]
    pub fn text_tier(&self, id: &str) -> Option<&TextTier> {
        self.text_tiers.iter().find(|t| t.id() == id)
    }

    /// The transcription text tier.
    #[must_use]
    pub fn transcription_tier(&self) -> Option<&TextTier> {
        self.text_tiers
            .iter()
            .find(|t| t.tier_type() == TextTierType::Transcription)
    }

    /// The free translation text tier, if present.
    #[must_use]
    pub fn free_translation_tier(&self) -> Option<&TextTier> {
        self.text_tiers
            .iter()
            .find(|t| t.tier_type() == TextTierType::FreeTranslation)
    }

    /// Sets the text of segment `index` in tier `tier_id`.
    ///
    /// Transcription text is mirrored onto the segment itself.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an unknown tier or segment index.
    pub fn set_text(&mut self, tier_id: &str, index: usize, text: &str) -> CoreResult<()> {
        let tier = self
            .text_tiers
            .iter_mut()
            .find(|t| t.id() == tier_id)
            .ok_or_else(|| CoreError::invalid_argument(format!("no text tier {tier_id}")))?;
        if !tier.set_text(index, text) {
            return Err(CoreError::invalid_argument(format!(
                "segment {index} is out of range"
            )));
        }
        if tier.tier_type() == TextTierType::Transcription {
            if let Some(segment) = self.time_tier.segment_mut(index) {
                segment.set_text((!text.is_empty()).then(|| text.to_string()));
            }
        }
        Ok(())
    }

    /// Mutable access to a segment's text and annotation flags.
    pub fn segment_mut(&mut self, index: usize) -> Option<&mut Segment> {
        self.time_tier.segment_mut(index)
    }

    /// Re-derives segment annotation flags from disk.
    pub fn refresh_oral_annotation_flags(&mut self) {
        self.time_tier.refresh_oral_annotation_flags();
    }

    /// Returns true if every text tier has one text per segment.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        let len = self.time_tier.len();
        self.text_tiers.iter().all(|t| t.len() == len)
    }

    // ------------------------------------------------------------------
    // Structural edits
    // ------------------------------------------------------------------

    /// Appends a segment ending at `end`.
    ///
    /// # Errors
    ///
    /// See [`TimeTier::append_segment`].
    pub fn append_segment(&mut self, end: f32) -> CoreResult<TimeRange> {
        let range = self.time_tier.append_segment(end)?;
        self.text_tiers.iter_mut().for_each(TextTier::push_empty);
        Ok(range)
    }

    /// Adds a boundary, splitting a segment or appending one.
    pub fn insert_segment_boundary(&mut self, boundary: f32) -> BoundaryModificationResult {
        let split = self.time_tier.index_of_segment_strictly_containing(boundary);
        let result = self.time_tier.insert_segment_boundary(boundary);
        if result.is_success() {
            for tier in &mut self.text_tiers {
                match split {
                    Some(index) => tier.insert_empty(index + 1),
                    None => tier.push_empty(),
                }
            }
        }
        result
    }

    /// Moves the end boundary of the segment at `range`.
    pub fn change_segments_end_boundary(
        &mut self,
        range: TimeRange,
        new_end: f32,
    ) -> BoundaryModificationResult {
        self.time_tier.change_segments_end_boundary(range, new_end)
    }

    /// Moves the end boundary of the segment ending at `old_end`.
    pub fn change_end_boundary_at(
        &mut self,
        old_end: f32,
        new_end: f32,
    ) -> BoundaryModificationResult {
        self.time_tier.change_end_boundary_at(old_end, new_end)
    }

    /// Removes the segment at `index` and its texts.
    pub fn remove_segment_at(&mut self, index: usize) -> bool {
        let removed = self.time_tier.remove_segment_at(index);
        if removed {
            for tier in &mut self.text_tiers {
                tier.remove(index);
            }
        }
        removed
    }

    /// Removes the segment whose range equals `range`.
    pub fn remove_segment(&mut self, range: TimeRange) -> bool {
        match self.time_tier.index_of_segment(range) {
            Some(index) => self.remove_segment_at(index),
            None => false,
        }
    }

    /// Removes the first segment ending at `boundary`.
    pub fn remove_segment_having_end_boundary(&mut self, boundary: f32) -> bool {
        match self
            .time_tier
            .segment_having_end_boundary(boundary)
            .map(|s| s.index())
        {
            Some(index) => self.remove_segment_at(index),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saymore_storage::InMemoryFileStore;
    use std::sync::Arc;

    fn collection(ranges: &[(f32, f32)]) -> TierCollection {
        let tier = TimeTier::new("a.wav", 10.0, Arc::new(InMemoryFileStore::new()))
            .with_segments(ranges.iter().map(|&(s, e)| TimeRange::new(s, e)));
        let mut collection = TierCollection::new(tier);
        collection
            .add_text_tier(TextTier::new(
                saymore_eaf::FREE_TRANSLATION_TIER_ID,
                TextTierType::FreeTranslation,
            ))
            .unwrap();
        for (i, _) in ranges.iter().enumerate() {
            collection
                .set_text(saymore_eaf::TRANSCRIPTION_TIER_ID, i, &format!("t{i}"))
                .unwrap();
        }
        collection
    }

    fn transcription(collection: &TierCollection) -> Vec<&str> {
        collection
            .transcription_tier()
            .unwrap()
            .texts()
            .iter()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn new_collection_is_aligned() {
        let collection = collection(&[(0.0, 2.0), (2.0, 5.0)]);
        assert!(collection.is_aligned());
        assert_eq!(transcription(&collection), ["t0", "t1"]);
        assert_eq!(collection.free_translation_tier().unwrap().texts(), ["", ""]);
        assert_eq!(collection.time_tier().segments()[1].text(), Some("t1"));
    }

    #[test]
    fn split_inserts_empty_text_after_split_segment() {
        let mut collection = collection(&[(0.0, 2.0), (2.0, 5.0)]);
        assert!(collection.insert_segment_boundary(3.5).is_success());
        assert_eq!(transcription(&collection), ["t0", "t1", ""]);
        assert!(collection.is_aligned());

        assert!(collection.insert_segment_boundary(1.0).is_success());
        assert_eq!(transcription(&collection), ["t0", "", "t1", ""]);
    }

    #[test]
    fn rejected_split_keeps_texts() {
        let mut collection = collection(&[(0.0, 2.0), (2.0, 5.0)]);
        assert!(!collection.insert_segment_boundary(2.1).is_success());
        assert_eq!(transcription(&collection), ["t0", "t1"]);
    }

    #[test]
    fn append_pushes_empty_text() {
        let mut collection = collection(&[(0.0, 2.0)]);
        collection.append_segment(4.0).unwrap();
        assert!(collection.insert_segment_boundary(6.0).is_success());
        assert_eq!(transcription(&collection), ["t0", "", ""]);
        assert!(collection.append_segment(6.0).is_err());
        assert!(collection.is_aligned());
    }

    #[test]
    fn removal_drops_text() {
        let mut collection = collection(&[(0.0, 2.0), (2.0, 5.0), (5.0, 8.0)]);
        assert!(collection.remove_segment(TimeRange::new(2.0, 5.0)));
        assert_eq!(transcription(&collection), ["t0", "t2"]);
        assert!(collection.remove_segment_having_end_boundary(8.0));
        assert_eq!(transcription(&collection), ["t0"]);
        assert!(!collection.remove_segment_at(4));
    }

    #[test]
    fn add_text_tier_validation() {
        let mut collection = collection(&[(0.0, 2.0)]);
        let too_long =
            TextTier::new("Notes", TextTierType::Other).with_texts(vec!["a".into(), "b".into()]);
        assert!(collection.add_text_tier(too_long).is_err());

        let duplicate = TextTier::new(saymore_eaf::FREE_TRANSLATION_TIER_ID, TextTierType::Other);
        assert!(collection.add_text_tier(duplicate).is_err());

        assert!(collection.set_text("Nope", 0, "x").is_err());
        assert!(collection.set_text(saymore_eaf::TRANSCRIPTION_TIER_ID, 3, "x").is_err());
    }
}
