//! Formatting helpers for log lines.

use std::fmt::Display;

/// Joins a sequence of displayable values into a comma-separated list.
/// Empty sequences render as `(none)` so log lines stay readable.
pub fn comma_list<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let parts: Vec<String> = items.into_iter().map(|item| item.to_string()).collect();
    if parts.is_empty() {
        "(none)".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::comma_list;

    #[test]
    fn joins_with_commas() {
        assert_eq!(comma_list(["a", "b", "c"]), "a, b, c");
    }

    #[test]
    fn empty_renders_placeholder() {
        assert_eq!(comma_list(Vec::<String>::new()), "(none)");
    }
}
