/// Request-level failures, each mapping to one HTTP status class
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("Could not extract a YouTube video ID from URL.")]
    InvalidUrl,

    #[error(
        "No transcript available for video {video_id} (tried: {}){}",
        .tried.join(", "),
        detail_suffix(.detail)
    )]
    NotFound {
        video_id: String,
        tried: Vec<&'static str>,
        detail: Option<String>,
    },

    #[error("Transcript provider error: {0}")]
    Internal(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_ref().map(|d| format!(". {d}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_lists_pathways() {
        let err = TranscriptError::NotFound {
            video_id: "dQw4w9WgXcQ".to_string(),
            tried: vec!["manual-in-language", "any-generated"],
            detail: None,
        };
        assert_eq!(
            err.to_string(),
            "No transcript available for video dQw4w9WgXcQ (tried: manual-in-language, any-generated)"
        );
    }

    #[test]
    fn test_not_found_message_with_detail() {
        let err = TranscriptError::NotFound {
            video_id: "dQw4w9WgXcQ".to_string(),
            tried: vec!["direct-fetch"],
            detail: Some("transcripts are disabled for video dQw4w9WgXcQ".to_string()),
        };
        assert!(err.to_string().ends_with(". transcripts are disabled for video dQw4w9WgXcQ"));
    }
}
