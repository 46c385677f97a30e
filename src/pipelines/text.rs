use crate::url_to_text::text::{truncate_chars, MAX_TEXT_LENGTH};

/// Prepare transcript text for the provider: whitespace collapsed and cut
/// to the provider input limit.
pub fn transcript_content(transcript: &str) -> String {
    let collapsed = transcript.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, MAX_TEXT_LENGTH).to_string()
}
