//! Front matter block handling
//!
//! A note's front matter is a YAML mapping between a `---` line at the very
//! start of the file and the next `---` line. Everything after the closing
//! line is the body and is never modified.

use serde_yaml::Value;

use super::Frontmatter;

/// Split a note into its raw front matter YAML and body
///
/// Returns `(None, content)` if the note has no front matter block.
pub fn split(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content.strip_prefix("---") else {
        return (None, content);
    };
    let rest = match rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')) {
        Some(rest) => rest,
        None => return (None, content),
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(|c| c == '\r' || c == '\n') == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, content)
}

/// Parse raw YAML into a mapping
///
/// An empty block is an empty mapping. Anything other than a mapping is
/// rejected with a description of what was found.
pub fn parse(yaml: &str) -> Result<Frontmatter, String> {
    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Null) => Ok(Frontmatter::new()),
        Ok(Value::Mapping(mapping)) => Ok(mapping),
        Ok(other) => Err(format!("expected a mapping, found {}", kind(&other))),
        Err(e) => Err(e.to_string()),
    }
}

/// Re-assemble a note from front matter and body
///
/// An empty mapping drops the block entirely.
pub fn compose(frontmatter: &Frontmatter, body: &str) -> Result<String, String> {
    if frontmatter.is_empty() {
        return Ok(body.to_string());
    }
    let yaml = serde_yaml::to_string(frontmatter).map_err(|e| e.to_string())?;
    Ok(format!("---\n{}---\n{}", yaml, body))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_with_frontmatter() {
        let note = "---\ntitle: Hello\nuid: abc\n---\n# Body\n\ntext\n";
        let (yaml, body) = split(note);
        assert_eq!(yaml, Some("title: Hello\nuid: abc\n"));
        assert_eq!(body, "# Body\n\ntext\n");
    }

    #[test]
    fn test_split_crlf() {
        let note = "---\r\nuid: abc\r\n---\r\nbody\r\n";
        let (yaml, body) = split(note);
        assert_eq!(yaml, Some("uid: abc\r\n"));
        assert_eq!(body, "body\r\n");
    }

    #[test]
    fn test_split_without_frontmatter() {
        assert_eq!(split("# Just a heading\n"), (None, "# Just a heading\n"));
        // Opening fence must be alone on the first line
        assert_eq!(split("---title\n---\n"), (None, "---title\n---\n"));
        // Unterminated block is body
        assert_eq!(split("---\nuid: abc\n"), (None, "---\nuid: abc\n"));
    }

    #[test]
    fn test_split_empty_block() {
        assert_eq!(split("---\n---\nbody"), (Some(""), "body"));
    }

    #[test]
    fn test_split_closing_fence_at_eof() {
        assert_eq!(split("---\nuid: x\n---"), (Some("uid: x\n"), ""));
    }

    #[test]
    fn test_parse() {
        assert!(parse("").unwrap().is_empty());
        let mapping = parse("uid: abc\ntags: [a, b]\n").unwrap();
        assert_eq!(mapping.len(), 2);
        assert!(parse("- a\n- b\n").unwrap_err().contains("a list"));
        assert!(parse("key: [unclosed").is_err());
    }

    #[test]
    fn test_compose() {
        let mut mapping = Frontmatter::new();
        mapping.insert(Value::from("uid"), Value::from("abc"));
        assert_eq!(compose(&mapping, "body\n").unwrap(), "---\nuid: abc\n---\nbody\n");
        assert_eq!(compose(&Frontmatter::new(), "body\n").unwrap(), "body\n");
    }
}
