//! Language identifiers from spreadsheet header cells.

/// English language names that translators commonly put in header cells,
/// mapped to their ISO 639-1 codes.
const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("arabic", "ar"),
    ("catalan", "ca"),
    ("chinese", "zh"),
    ("czech", "cs"),
    ("danish", "da"),
    ("dutch", "nl"),
    ("english", "en"),
    ("finnish", "fi"),
    ("french", "fr"),
    ("german", "de"),
    ("greek", "el"),
    ("hebrew", "he"),
    ("hindi", "hi"),
    ("hungarian", "hu"),
    ("indonesian", "id"),
    ("italian", "it"),
    ("japanese", "ja"),
    ("korean", "ko"),
    ("malay", "ms"),
    ("norwegian", "nb"),
    ("polish", "pl"),
    ("portuguese", "pt"),
    ("romanian", "ro"),
    ("russian", "ru"),
    ("slovak", "sk"),
    ("spanish", "es"),
    ("swedish", "sv"),
    ("thai", "th"),
    ("turkish", "tr"),
    ("ukrainian", "uk"),
    ("vietnamese", "vi"),
];

/// Returns the ISO 639-1 code for an English language name, ignoring case.
pub fn code_for_name(name: &str) -> Option<&'static str> {
    LANGUAGE_NAMES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, code)| *code)
}

/// First whitespace-separated token of a header cell.
pub fn header_token(header: &str) -> Option<&str> {
    header.split_whitespace().next()
}

/// Derives the language identifier for a header cell.
///
/// Only the text before the first space is used, so `English (US)` and
/// `en (source)` both reduce to their first word. With `map_names`, a known
/// English language name becomes its ISO code; anything else is kept as
/// written. Returns `None` when no usable token remains, including tokens
/// that could not name a single directory (`.`, `..`, or containing a path
/// separator).
pub fn identifier_from_header(header: &str, map_names: bool) -> Option<String> {
    let token = header_token(header)?;
    if token == "." || token == ".." || token.contains(['/', '\\']) {
        return None;
    }
    if map_names && let Some(code) = code_for_name(token) {
        return Some(code.to_string());
    }
    Some(token.to_string())
}
