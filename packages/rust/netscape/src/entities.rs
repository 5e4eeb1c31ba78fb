//! HTML entity decoding for text captured from export markup.

use scraper::Html;

/// Decode HTML entities (`&amp;`, `&#39;`, `&quot;`, ...) in a text fragment.
///
/// Exports escape titles, folder names and descriptions; the captured text is
/// run through the HTML5 parser so every named and numeric entity resolves the
/// same way a browser would resolve it.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let fragment = Html::parse_fragment(text);
    fragment.root_element().text().collect::<String>()
}
