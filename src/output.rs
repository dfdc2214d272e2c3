use crate::Segment;

/// Render segments as a single line of text: segment texts that are not blank,
/// joined by a single space, in original order
pub fn render_text(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
