use scraper::{ElementRef, Html, Node};

/// Upper bound, in characters, on text handed to an AI provider.
pub const MAX_TEXT_LENGTH: usize = 15_000;

/// Reduce page markup to plain text: script and style content is dropped,
/// tags are stripped, entities decoded and whitespace collapsed. The result
/// is capped at [`MAX_TEXT_LENGTH`] characters.
pub fn reduce_html(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut texts = Vec::new();
    collect_text(&document.root_element(), &mut texts);

    let collapsed = texts
        .iter()
        .flat_map(|text| text.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ");
    truncate_chars(&collapsed, MAX_TEXT_LENGTH).to_string()
}

/// The first `max` characters of `text`, never splitting a character.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn collect_text<'a>(element: &ElementRef<'a>, texts: &mut Vec<&'a str>) {
    if should_skip_element(element) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => texts.push(text),
            Node::Element(_) => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(&child_ref, texts);
                }
            }
            _ => {}
        }
    }
}

fn should_skip_element(element: &ElementRef) -> bool {
    matches!(
        element.value().name(),
        "script" | "style" | "noscript" | "template"
    )
}
