//! MIME types written into `MEDIA_DESCRIPTOR`.

const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wma", "ogg", "oga", "flac", "aif", "aiff", "aac", "m4a", "opus",
];

const VIDEO_EXTENSIONS: &[&str] = &[
    "wmv", "mov", "avi", "mp4", "m4v", "mkv", "flv", "3gp", "webm", "mts",
];

/// Returns the MIME type ELAN expects for a media file name.
///
/// WAV and MPEG get their exact types; other known audio and video
/// extensions get the `audio/*` and `video/*` wildcards. Unknown
/// extensions return `None`.
///
/// ```
/// use saymore_eaf::mime_type_for;
///
/// assert_eq!(mime_type_for("Alathea.wav"), Some("audio/x-wav"));
/// assert_eq!(mime_type_for("Alathea.mpeg"), Some("video/mpeg"));
/// assert_eq!(mime_type_for("Alathea.mp3"), Some("audio/*"));
/// assert_eq!(mime_type_for("Alathea.txt"), None);
/// ```
#[must_use]
pub fn mime_type_for(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();

    match ext.as_str() {
        "wav" => Some("audio/x-wav"),
        "mpg" | "mpeg" => Some("video/mpeg"),
        e if AUDIO_EXTENSIONS.contains(&e) => Some("audio/*"),
        e if VIDEO_EXTENSIONS.contains(&e) => Some("video/*"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_file() {
        assert_eq!(mime_type_for("Alathea.WAV"), Some("audio/x-wav"));
    }

    #[test]
    fn non_wave_audio() {
        assert_eq!(mime_type_for("Alathea.mp3"), Some("audio/*"));
        assert_eq!(mime_type_for("Alathea.wma"), Some("audio/*"));
    }

    #[test]
    fn mpeg_video() {
        assert_eq!(mime_type_for("Alathea.mpg"), Some("video/mpeg"));
        assert_eq!(mime_type_for("Alathea.mpeg"), Some("video/mpeg"));
    }

    #[test]
    fn non_mpeg_video() {
        assert_eq!(mime_type_for("Alathea.wmv"), Some("video/*"));
        assert_eq!(mime_type_for("Alathea.mov"), Some("video/*"));
        assert_eq!(mime_type_for("Alathea.avi"), Some("video/*"));
    }

    #[test]
    fn no_extension() {
        assert_eq!(mime_type_for("Alathea"), None);
    }
}
