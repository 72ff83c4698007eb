use std::collections::HashMap;

use serde::Deserialize;

/// One entry of `wtp_names.json`.
#[derive(Clone, Debug, Deserialize)]
pub struct CreatureEntry {
    pub number: u32,
    /// Localized names keyed by language code
    pub names: HashMap<Box<str>, Box<str>>,
}

impl CreatureEntry {
    pub fn english_name(&self) -> Option<&str> {
        self.names.get("en").map(Box::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::CreatureEntry;

    #[test]
    fn deserialize_names() {
        let json = r#"[{"number":25,"names":{"en":"pikachu","ja":"ピカチュウ","fr":"pikachu"}}]"#;
        let entries: Vec<CreatureEntry> = serde_json::from_str(json).unwrap();

        assert_eq!(entries[0].number, 25);
        assert_eq!(entries[0].english_name(), Some("pikachu"));
        assert_eq!(entries[0].names.len(), 3);
    }
}
