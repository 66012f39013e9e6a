//! MARC record model.
//!
//! Fields are kept in a single ordered list so that serializing a parsed
//! record reproduces the original field order.

use super::leader::Leader;

/// A subfield: one-character code plus value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subfield {
    /// Subfield code (`a`, `b`, ...)
    pub code: char,
    /// Subfield value
    pub value: String,
}

impl Subfield {
    /// Creates a new subfield
    pub fn new(code: char, value: impl Into<String>) -> Self {
        Self {
            code,
            value: value.into(),
        }
    }
}

/// Variable data field (tags 010 and above)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataField {
    /// Three-character tag
    pub tag: String,
    /// First indicator
    pub indicator1: char,
    /// Second indicator
    pub indicator2: char,
    /// Subfields in order
    pub subfields: Vec<Subfield>,
}

impl DataField {
    /// Creates a data field with no subfields
    pub fn new(tag: impl Into<String>, indicator1: char, indicator2: char) -> Self {
        Self {
            tag: tag.into(),
            indicator1,
            indicator2,
            subfields: Vec::new(),
        }
    }

    /// Appends a subfield
    pub fn add_subfield(&mut self, code: char, value: impl Into<String>) {
        self.subfields.push(Subfield::new(code, value));
    }

    /// Builder-style [`DataField::add_subfield`]
    pub fn with_subfield(mut self, code: char, value: impl Into<String>) -> Self {
        self.add_subfield(code, value);
        self
    }

    /// Values of every subfield with the given code
    pub fn subfield_values(&self, code: char) -> Vec<&str> {
        self.subfields
            .iter()
            .filter(|sf| sf.code == code)
            .map(|sf| sf.value.as_str())
            .collect()
    }
}

/// A field of a MARC record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// Control field (001-009): tag and raw value
    Control {
        /// Three-character tag
        tag: String,
        /// Field value
        value: String,
    },
    /// Data field (010+)
    Data(DataField),
}

impl Field {
    /// Tag of the field
    pub fn tag(&self) -> &str {
        match self {
            Field::Control { tag, .. } => tag,
            Field::Data(field) => &field.tag,
        }
    }
}

/// Returns true for control-field tags (`001`-`009`)
pub fn is_control_tag(tag: &str) -> bool {
    tag.len() == 3 && tag.starts_with("00") && tag.bytes().all(|b| b.is_ascii_digit())
}

/// A MARC bibliographic record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 24-byte leader
    pub leader: Leader,
    fields: Vec<Field>,
}

impl Record {
    /// Creates a record with no fields
    pub fn new(leader: Leader) -> Self {
        Self {
            leader,
            fields: Vec::new(),
        }
    }

    /// Appends a field at the end of the record
    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// All fields in order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Value of the first control field with the given tag
    pub fn control_field(&self, tag: &str) -> Option<&str> {
        self.fields.iter().find_map(|field| match field {
            Field::Control { tag: t, value } if t == tag => Some(value.as_str()),
            _ => None,
        })
    }

    /// Data fields with the given tag, in order
    pub fn data_fields<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a DataField> + 'a {
        self.fields.iter().filter_map(move |field| match field {
            Field::Data(data) if data.tag == tag => Some(data),
            _ => None,
        })
    }

    /// Removes every field with the given tag, returning how many were removed
    pub fn remove_fields(&mut self, tag: &str) -> usize {
        let before = self.fields.len();
        self.fields.retain(|field| field.tag() != tag);
        before - self.fields.len()
    }

    /// Inserts a field before the first field whose tag sorts after it.
    ///
    /// Fields sharing a tag keep insertion order, so repeated calls with the
    /// same tag append after earlier ones.
    pub fn insert_in_tag_order(&mut self, field: Field) {
        let position = self
            .fields
            .iter()
            .position(|existing| existing.tag() > field.tag())
            .unwrap_or(self.fields.len());
        self.fields.insert(position, field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_tags(tags: &[&str]) -> Record {
        let mut record = Record::new(Leader::from_bytes(b"00000nam a2200000 a 4500").unwrap());
        for tag in tags {
            if is_control_tag(tag) {
                record.push(Field::Control {
                    tag: tag.to_string(),
                    value: "x".to_string(),
                });
            } else {
                record.push(Field::Data(DataField::new(*tag, ' ', ' ')));
            }
        }
        record
    }

    fn tags(record: &Record) -> Vec<&str> {
        record.fields().iter().map(Field::tag).collect()
    }

    #[test]
    fn test_is_control_tag() {
        assert!(is_control_tag("001"));
        assert!(is_control_tag("008"));
        assert!(!is_control_tag("010"));
        assert!(!is_control_tag("852"));
        assert!(!is_control_tag("00A"));
    }

    #[test]
    fn test_insert_in_tag_order() {
        let mut record = record_with_tags(&["001", "245", "650", "901"]);
        record.insert_in_tag_order(Field::Data(DataField::new("852", '4', ' ')));
        record.insert_in_tag_order(Field::Data(
            DataField::new("852", '4', ' ').with_subfield('b', "second"),
        ));
        assert_eq!(tags(&record), vec!["001", "245", "650", "852", "852", "901"]);
        let second: Vec<_> = record.data_fields("852").collect();
        assert_eq!(second[1].subfield_values('b'), vec!["second"]);
    }

    #[test]
    fn test_insert_appends_when_no_later_tag() {
        let mut record = record_with_tags(&["001", "245"]);
        record.insert_in_tag_order(Field::Data(DataField::new("852", '4', ' ')));
        assert_eq!(tags(&record), vec!["001", "245", "852"]);
    }

    #[test]
    fn test_remove_fields() {
        let mut record = record_with_tags(&["001", "852", "245", "852"]);
        assert_eq!(record.remove_fields("852"), 2);
        assert_eq!(tags(&record), vec!["001", "245"]);
    }

    #[test]
    fn test_control_field_lookup() {
        let record = record_with_tags(&["001", "245"]);
        assert_eq!(record.control_field("001"), Some("x"));
        assert_eq!(record.control_field("003"), None);
    }
}
