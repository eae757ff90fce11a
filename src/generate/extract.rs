const DOCTYPE_MARKER: &str = "<!DOCTYPE";
const HTML_MARKER: &str = "<html";
const END_MARKER: &str = "</html>";

/// Extract the HTML document from raw model output.
///
/// Code fences are removed, narration before the first `<!DOCTYPE` (or
/// `<html` when there is no doctype) and after the last `</html>` is dropped.
/// Returns `None` when no start marker survives. Markers are case-sensitive.
pub fn extract_document(raw: &str) -> Option<String> {
    let stripped = raw.trim().replace("```html", "").replace("```", "");

    let start = stripped
        .find(DOCTYPE_MARKER)
        .or_else(|| stripped.find(HTML_MARKER))?;
    let mut doc = &stripped[start..];

    if let Some(end) = doc.rfind(END_MARKER) {
        doc = &doc[..end + END_MARKER.len()];
    }

    Some(doc.trim().to_owned())
}
