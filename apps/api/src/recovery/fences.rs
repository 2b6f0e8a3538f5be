//! Markdown fence stripping for model output.

/// Strips a leading ```` ```lang ```` fence and its trailing ```` ``` ````.
/// Text that does not begin with a fence is only trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    // Language tag: json, JSON, javascript, ...
    let tag_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());
    let body = rest[tag_len..].trim_start();

    body.strip_suffix("```")
        .map(str::trim_end)
        .unwrap_or(body)
        .trim()
}
