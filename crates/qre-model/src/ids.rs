use std::fmt;

use crate::SchemaError;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, SchemaError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(SchemaError::InvalidIdentifier(value));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a questionnaire version.
    QuestionnaireId
);
string_id!(
    /// Identifier of a question within a questionnaire.
    QuestionId
);
string_id!(
    /// Standardized vocabulary concept identifier (e.g. "3004249").
    ConceptCode
);
string_id!(
    /// Identifier of the vocabulary a concept belongs to (e.g. "SNOMED").
    VocabularyId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_rejects_empty() {
        let id = QuestionId::new("  q1  ").unwrap();
        assert_eq!(id.as_str(), "q1");
        assert!(matches!(
            QuestionId::new("   "),
            Err(SchemaError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ConceptCode::new("3004249").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"3004249\"");
    }
}
