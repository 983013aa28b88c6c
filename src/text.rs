//! Small text helpers shared by posts, categories and tags.

/// Lowercase alphanumeric words (any script) joined by single dashes.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_dash = true;
        }
    }

    slug
}

/// `slugify(input)`, or the first segment of `id` when nothing in the input
/// is slug-worthy (punctuation-only titles, emoji).
pub fn slug_or_id(input: &str, id: &str) -> String {
    let slug = slugify(input);
    if slug.is_empty() {
        id.split('-').next().unwrap_or(id).to_lowercase()
    } else {
        slug
    }
}

/// First `max_chars` characters of `content`, cut at a word boundary when
/// possible, with an ellipsis if anything was dropped.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }

    let cut: String = trimmed.chars().take(max_chars).collect();
    let cut = match cut.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}...", cut.trim_end())
}

/// Case-insensitive equality, folding the same way as `normalize_tags`.
pub fn eq_ci(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Case-insensitive substring match.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Trim, drop empties and duplicates (case-insensitive), keep first spelling.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        let lower = tag.to_lowercase();
        if !seen.contains(&lower) {
            seen.push(lower);
            out.push(tag.to_string());
        }
    }
    out
}
