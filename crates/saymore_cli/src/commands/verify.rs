//! Verify command implementation.

use super::load_session;
use saymore_core::{TierCollection, TierConfig};
use std::path::Path;

/// Verification result.
#[derive(Debug)]
pub struct VerifyResult {
    /// Number of segments checked.
    pub segments_checked: usize,
    /// Broken tier invariants.
    pub violations: Vec<String>,
    /// Segment files that belong to no segment.
    pub orphaned_files: Vec<String>,
}

impl VerifyResult {
    /// Checks a loaded annotation file.
    pub fn check(collection: &TierCollection) -> Result<Self, Box<dyn std::error::Error>> {
        let tier = collection.time_tier();
        Ok(Self {
            segments_checked: tier.len(),
            violations: tier
                .verify_invariants()
                .iter()
                .map(ToString::to_string)
                .collect(),
            orphaned_files: tier
                .find_orphaned_segment_files()?
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        })
    }

    fn is_ok(&self) -> bool {
        self.violations.is_empty() && self.orphaned_files.is_empty()
    }
}

/// Runs the verify command.
pub fn run(path: &Path, config: TierConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying annotation file at {:?}", path);
    println!();

    let (_, collection) = load_session(path, config)?;
    let result = VerifyResult::check(&collection)?;

    println!("  Segments checked: {}", result.segments_checked);
    for violation in &result.violations {
        println!("    ERROR: {}", violation);
    }
    for file in &result.orphaned_files {
        println!("    ORPHAN: {}", file);
    }

    println!();
    if result.is_ok() {
        println!("✓ Annotation file verification passed");
        Ok(())
    } else {
        println!("✗ Annotation file verification failed");
        Err("Verification failed".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saymore_core::AnnotationFile;
    use tempfile::tempdir;

    #[test]
    fn reports_short_segments_and_orphans() {
        let dir = tempdir().unwrap();
        let media = dir.path().join("Rec.wav");
        let config = TierConfig::default();
        let file =
            AnnotationFile::create_from_time_strings(&media, &["1", "1.2", "3"], &config).unwrap();

        let folder = dir.path().join("Rec.wav_Annotations");
        std::fs::create_dir(&folder).unwrap();
        std::fs::write(folder.join("1.2_to_3_Careful.wav"), b"x").unwrap();
        std::fs::write(folder.join("5_to_6_Careful.wav"), b"x").unwrap();

        let (_, collection) = load_session(file.path(), config.clone()).unwrap();
        let result = VerifyResult::check(&collection).unwrap();
        assert_eq!(result.segments_checked, 3);
        assert_eq!(result.violations.len(), 1);
        assert!(result.violations[0].contains("shorter than the minimum"));
        assert_eq!(result.orphaned_files.len(), 1);
        assert!(result.orphaned_files[0].ends_with("5_to_6_Careful.wav"));
        assert!(!result.is_ok());

        assert!(run(file.path(), config).is_err());
    }

    #[test]
    fn clean_file_passes() {
        let dir = tempdir().unwrap();
        let media = dir.path().join("Rec.wav");
        let config = TierConfig::default();
        let file = AnnotationFile::create_from_time_strings(&media, &["1", "3"], &config).unwrap();
        assert!(run(file.path(), config).is_ok());
    }
}
