//! Identifier generation
//!
//! UIDs are random UUID v4 values in their canonical hyphenated form.

use uuid::Uuid;

/// Generate a new random identifier
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}

/// Check that a string has the canonical UUID v4 textual layout
///
/// 8-4-4-4-12 lowercase hex digits, version nibble `4`, variant `8`-`b`.
pub fn is_uuid_v4(s: &str) -> bool {
    let groups: Vec<&str> = s.split('-').collect();
    if groups.len() != 5 {
        return false;
    }
    let lengths = [8, 4, 4, 4, 12];
    let well_formed = groups.iter().zip(lengths).all(|(group, len)| {
        group.len() == len
            && group
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    });
    if !well_formed {
        return false;
    }
    groups[2].starts_with('4') && matches!(groups[3].chars().next(), Some('8' | '9' | 'a' | 'b'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_layout() {
        let uid = generate();
        assert_eq!(uid.len(), 36);
        assert!(is_uuid_v4(&uid), "bad layout: {}", uid);
    }

    #[test]
    fn test_generate_distinct() {
        let ids: HashSet<String> = (0..10_000).map(|_| generate()).collect();
        assert_eq!(ids.len(), 10_000);
        assert!(ids.iter().all(|id| is_uuid_v4(id)));
    }

    #[test]
    fn test_is_uuid_v4_rejects() {
        assert!(!is_uuid_v4(""));
        assert!(!is_uuid_v4("not-a-uuid"));
        // Version 1
        assert!(!is_uuid_v4("6ba7b810-9dad-11d1-80b4-00c04fd430c8"));
        // Bad variant
        assert!(!is_uuid_v4("123e4567-e89b-42d3-c456-426614174000"));
        // Uppercase
        assert!(!is_uuid_v4("123E4567-E89B-42D3-A456-426614174000"));
        assert!(is_uuid_v4("123e4567-e89b-42d3-a456-426614174000"));
    }
}
