// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Produce safe object-key components from user-provided file names.

/// Fallback used when nothing usable survives sanitization.
const FALLBACK_NAME: &str = "avatar";

/// Produce an object-key-safe path component.
///
/// # Steps
/// - Transliterate Unicode to ASCII with `deunicode` (e.g., "Å" → "A").
/// - Allow ASCII alphanumerics plus `-`, `_`, and `.`; treat other characters as `_`.
/// - Collapse runs of `_` and `.`; trim leading and trailing dots.
/// - Fall back to `avatar` for empty or dot-only names.
///
/// Slashes never survive, so a picked file name cannot escape the key prefix.
pub fn sanitize_component(value: &str) -> String {
    let transliterated = deunicode::deunicode(value);
    let mut out = String::with_capacity(transliterated.len());
    let mut last: Option<char> = None;

    for ch in transliterated.chars() {
        let mapped = if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.' {
            ch
        } else {
            '_'
        };

        // Collapse repeated separators.
        if matches!(mapped, '_' | '.') && last == Some(mapped) {
            continue;
        }
        out.push(mapped);
        last = Some(mapped);
    }

    // Avoid a stray underscore immediately before a dot.
    while let Some(pos) = out.find("_.") {
        out.remove(pos);
    }

    // Leading dots would make hidden objects on filesystem-backed buckets.
    let out = out.trim_start_matches('.').trim_end_matches('.').to_string();

    if out.is_empty() || out.chars().all(|c| c == '.' || c == '_') {
        return FALLBACK_NAME.to_string();
    }

    out
}
