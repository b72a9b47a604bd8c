//! Text tiers: one string per time-tier segment.

/// What a text tier holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTierType {
    /// The transcription of each segment.
    Transcription,
    /// The free translation of each segment.
    FreeTranslation,
    /// A user-defined dependent tier.
    Other,
}

/// A tier of strings aligned one-to-one with a time tier's segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTier {
    id: String,
    tier_type: TextTierType,
    texts: Vec<String>,
}

impl TextTier {
    /// Creates an empty text tier.
    pub fn new(id: impl Into<String>, tier_type: TextTierType) -> Self {
        Self {
            id: id.into(),
            tier_type,
            texts: Vec::new(),
        }
    }

    /// Sets the texts.
    #[must_use]
    pub fn with_texts(mut self, texts: Vec<String>) -> Self {
        self.texts = texts;
        self
    }

    /// Tier id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Tier type.
    #[must_use]
    pub fn tier_type(&self) -> TextTierType {
        self.tier_type
    }

    /// All texts, in segment order.
    #[must_use]
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// The text of segment `index`.
    #[must_use]
    pub fn text(&self, index: usize) -> Option<&str> {
        self.texts.get(index).map(String::as_str)
    }

    /// Number of texts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Returns true if the tier has no texts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Replaces the text of segment `index`. Returns false if out of range.
    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.texts.get_mut(index) {
            Some(slot) => {
                *slot = text.into();
                true
            }
            None => false,
        }
    }

    pub(crate) fn insert_empty(&mut self, index: usize) {
        let index = index.min(self.texts.len());
        self.texts.insert(index, String::new());
    }

    pub(crate) fn push_empty(&mut self) {
        self.texts.push(String::new());
    }

    pub(crate) fn remove(&mut self, index: usize) {
        if index < self.texts.len() {
            self.texts.remove(index);
        }
    }

    pub(crate) fn resize(&mut self, len: usize) {
        self.texts.resize(len, String::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut tier = TextTier::new("Transcription", TextTierType::Transcription)
            .with_texts(vec!["a".into(), "b".into()]);
        assert!(tier.set_text(1, "c"));
        assert!(!tier.set_text(2, "d"));
        assert_eq!(tier.text(1), Some("c"));
        assert_eq!(tier.text(2), None);
    }

    #[test]
    fn structural_edits() {
        let mut tier = TextTier::new("x", TextTierType::Other).with_texts(vec!["a".into()]);
        tier.insert_empty(1);
        tier.push_empty();
        assert_eq!(tier.texts(), ["a", "", ""]);
        tier.remove(0);
        tier.remove(9);
        assert_eq!(tier.len(), 2);
    }
}
