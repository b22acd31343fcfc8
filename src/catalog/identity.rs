use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Identifier of a single tag value inside a category (e.g. a treaty id).
///
/// Ids are compared verbatim; the glossary maps them to display labels.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(pub String);

impl TagId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty ids never become filter controls.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for TagId {
    fn from(value: &str) -> Self {
        TagId(value.to_string())
    }
}

impl From<String> for TagId {
    fn from(value: String) -> Self {
        TagId(value)
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Multi-valued tag dimension carried by every record.
///
/// Declaration order is the order controls are generated in.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Category {
    Treaties,
    Memberships,
    Situations,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Treaties,
        Category::Memberships,
        Category::Situations,
    ];

    /// Field name used by the catalog JSON and by control output.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Treaties => "treaties",
            Category::Memberships => "memberships",
            Category::Situations => "situations",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "treaties" => Some(Category::Treaties),
            "memberships" => Some(Category::Memberships),
            "situations" => Some(Category::Situations),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Category::parse(&value).ok_or_else(|| {
            de::Error::unknown_variant(&value, &["treaties", "memberships", "situations"])
        })
    }
}

/// Death-penalty status of a record, stored as `deathPenalty` (0, 1 or 2).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Status {
    Abolished,
    DeFactoAbolished,
    InUse,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Abolished, Status::DeFactoAbolished, Status::InUse];

    pub fn code(self) -> u8 {
        match self {
            Status::Abolished => 0,
            Status::DeFactoAbolished => 1,
            Status::InUse => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Status::Abolished),
            1 => Some(Status::DeFactoAbolished),
            2 => Some(Status::InUse),
            _ => None,
        }
    }

    /// Fallback label when the glossary has no entry for the status code.
    pub fn default_label(self) -> &'static str {
        match self {
            Status::Abolished => "Abolished",
            Status::DeFactoAbolished => "Abolished in practice",
            Status::InUse => "In use",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

// Source data sometimes carries the code as a string ("2") or as an integral
// float (2.0); all forms are read as base-10 integers.
impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let code = match &value {
            Value::Number(number) => number.as_i64().or_else(|| {
                number
                    .as_f64()
                    .filter(|code| code.fract() == 0.0)
                    .map(|code| code as i64)
            }),
            Value::String(text) => text.trim().parse::<i64>().ok(),
            _ => None,
        };
        code.and_then(Status::from_code).ok_or_else(|| {
            de::Error::invalid_value(
                Unexpected::Other(&value.to_string()),
                &"a death penalty status of 0, 1 or 2",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accepts_integers_and_numeric_strings() {
        let parsed: Status = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, Status::InUse);
        let parsed: Status = serde_json::from_str("\"1\"").unwrap();
        assert_eq!(parsed, Status::DeFactoAbolished);
        let parsed: Status = serde_json::from_str("2.0").unwrap();
        assert_eq!(parsed, Status::InUse);
        assert!(serde_json::from_str::<Status>("1.5").is_err());
        assert_eq!(serde_json::to_string(&Status::Abolished).unwrap(), "0");
    }

    #[test]
    fn status_rejects_out_of_range_codes() {
        let err = serde_json::from_str::<Status>("3").expect_err("3 is not a status");
        assert!(err.to_string().contains("0, 1 or 2"));
        assert!(serde_json::from_str::<Status>("\"abolished\"").is_err());
        assert!(serde_json::from_str::<Status>("null").is_err());
    }

    #[test]
    fn category_names_match_catalog_fields() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json.trim_matches('"'), category.as_str());
            let back: Category = serde_json::from_str(&json).unwrap();
            assert_eq!(back, category);
        }
        assert!(serde_json::from_str::<Category>("\"deathPenalty\"").is_err());
    }

    #[test]
    fn tag_id_is_transparent() {
        let id = TagId::from("iccpr_op2");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"iccpr_op2\"");
        assert!(TagId::from("").is_empty());
    }
}
