//! Dotenv-style `KEY=value` file parsing.

/// Parse dotenv content into ordered key/value pairs.
///
/// Skips blank lines and `#` comments, accepts an optional `export ` prefix, and
/// strips one layer of matching single or double quotes. Later duplicates win
/// but keep the position of the first occurrence.
pub fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = unquote(value.trim());

        match pairs.iter_mut().find(|(existing, _)| existing == key) {
            Some(entry) => entry.1 = value,
            None => pairs.push((key.to_string(), value)),
        }
    }

    pairs
}

fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].to_string();
        }
    }
    // Unquoted values may carry a trailing ` # comment`.
    match value.find(" #") {
        Some(index) => value[..index].trim_end().to_string(),
        None => value.to_string(),
    }
}
