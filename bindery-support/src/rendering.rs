//! Text rendering utilities for human-friendly error messages.
//!
//! Helpers to shorten fully qualified type names and to score
//! "did you mean?" candidates when a lookup misses.

/// Shortens a fully qualified type name for display.
///
/// Keeps only the last segment of each `::` path, including inside
/// generic arguments.
///
/// ```
/// use bindery_support::rendering::shorten_type_name;
///
/// let short = shorten_type_name("my_app::services::user::UserService");
/// assert_eq!(short, "UserService");
///
/// let short = shorten_type_name("alloc::sync::Arc<dyn my_app::ports::Clock>");
/// assert_eq!(short, "Arc<dyn Clock>");
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut chars = full_name.chars().peekable();
    let mut current_segment = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                current_segment.clear(); // discard path prefix
            }
            '<' | '>' | ',' | ' ' => {
                result.push_str(&current_segment);
                result.push(ch);
                current_segment.clear();
            }
            _ => {
                current_segment.push(ch);
            }
        }
    }

    result.push_str(&current_segment);
    result
}

/// Scores `available` type names against a requested one and returns
/// the indices of the closest matches, best first.
///
/// Used to build "did you mean?" suggestions for lookups that missed:
/// the caller keeps whatever per-entry data it has and only hands the
/// display names in.
///
/// ```
/// use bindery_support::rendering::suggest_similar;
///
/// let available = ["my_app::UserService", "my_app::Database"];
/// let hits = suggest_similar("UserServise", &available, 3);
/// assert_eq!(hits, vec![0]);
/// ```
pub fn suggest_similar(requested: &str, available: &[&str], max_suggestions: usize) -> Vec<usize> {
    let requested_lower = requested.to_lowercase();
    let requested_short = shorten_type_name(requested).to_lowercase();

    let mut scored: Vec<(usize, usize)> = available
        .iter()
        .enumerate()
        .filter_map(|(index, &name)| {
            let name_lower = name.to_lowercase();
            let name_short = shorten_type_name(name).to_lowercase();

            // Exact substring match outranks everything
            if name_lower.contains(&requested_lower) || requested_lower.contains(&name_lower) {
                return Some((index, 100));
            }

            if name_short.contains(&requested_short) || requested_short.contains(&name_short) {
                return Some((index, 80));
            }

            // Fall back to a shared prefix of the short names
            let common = name_short
                .chars()
                .zip(requested_short.chars())
                .take_while(|(a, b)| a == b)
                .count();

            if common >= 3 {
                return Some((index, common * 10));
            }

            None
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(index, _)| index)
        .collect()
}
