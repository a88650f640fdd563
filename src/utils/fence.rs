const FENCE: &str = "```";
const JSON_TAG: &str = "json";

/// Removes a markdown code fence wrapped around a model reply.
///
/// A leading fence (optionally tagged `json`, any case) and a trailing fence
/// are stripped together with surrounding whitespace. Text that does not open
/// with a fence is only trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    let rest = match rest.get(..JSON_TAG.len()) {
        Some(tag) if tag.eq_ignore_ascii_case(JSON_TAG) => &rest[JSON_TAG.len()..],
        _ => rest,
    };

    let rest = rest.trim();
    rest.strip_suffix(FENCE).unwrap_or(rest).trim()
}
