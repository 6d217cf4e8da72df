//! VDV 300 character substitutions
//!
//! Telegrams carry plain 7-bit characters, which leaves no room for
//! German umlauts. VDV 300 (p. 50) reassigns seven bracket/punctuation
//! code points the protocol never transmits otherwise. The substitution
//! is one-directional and one-to-one; this crate never decodes.

/// The substitution table, original character first
pub const SUBSTITUTIONS: [(char, char); 7] = [
    ('ä', '{'),
    ('ö', '|'),
    ('ü', '}'),
    ('ß', '~'),
    ('Ä', '['),
    ('Ö', '\\'),
    ('Ü', ']'),
];

/// Remap a single character onto the bus alphabet
///
/// Characters outside the table pass through unchanged.
pub fn remap_char(c: char) -> char {
    match c {
        'ä' => '{',
        'ö' => '|',
        'ü' => '}',
        'ß' => '~',
        'Ä' => '[',
        'Ö' => '\\',
        'Ü' => ']',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remap_str(text: &str) -> heapless::String<64> {
        let mut out = heapless::String::new();
        for c in text.chars() {
            out.push(remap_char(c)).unwrap();
        }
        out
    }

    #[test]
    fn test_all_table_entries() {
        for (from, to) in SUBSTITUTIONS {
            assert_eq!(remap_char(from), to);
        }
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(remap_str("Hauptbahnhof 12").as_str(), "Hauptbahnhof 12");
    }

    #[test]
    fn test_umlaut_substitution() {
        assert_eq!(remap_str("Müde").as_str(), "M}de");
        assert_eq!(remap_str("Straße Süd").as_str(), "Stra~e S}d");
        assert_eq!(remap_str("ÄÖÜ").as_str(), "[\\]");
    }

    #[test]
    fn test_idempotent_on_remapped_text() {
        let once = remap_str("Müde");
        let twice = remap_str(once.as_str());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_substitution_preserves_character_count() {
        let text = "Gärtnerstraße";
        let remapped = remap_str(text);
        assert_eq!(text.chars().count(), remapped.chars().count());
    }
}
