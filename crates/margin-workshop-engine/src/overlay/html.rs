use html_escape::{encode_double_quoted_attribute, encode_text};

use super::presentation::class_list;
use super::segment::Segment;

/// Render segments as HTML for a web host.
///
/// Saved highlights carry `data-annotation-id` so the host can route clicks
/// back to the comment; drafts carry no id and are not clickable.
pub fn render_html(segments: &[Segment<'_>]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Plain { text, .. } => out.push_str(&encode_text(text)),
            Segment::Highlight(h) => {
                let classes = class_list(h.presentation(), h.kind);
                match h.click_target() {
                    Some(id) => out.push_str(&format!(
                        r#"<span class="{}" data-annotation-id="{}">{}</span>"#,
                        classes,
                        encode_double_quoted_attribute(id.as_str()),
                        encode_text(h.text)
                    )),
                    None => out.push_str(&format!(
                        r#"<span class="{}">{}</span>"#,
                        classes,
                        encode_text(h.text)
                    )),
                }
            }
        }
    }
    out
}
