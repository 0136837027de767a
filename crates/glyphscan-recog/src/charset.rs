//! Allowed character sets
//!
//! Restricts which catalog entries the matcher may emit. Sets other than
//! [`AllowedCharacters::Custom`] select entries by their catalog traits.

use serde::{Deserialize, Serialize};

use crate::catalog::CharacterDefinition;

/// Characters the matcher may choose from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AllowedCharacters {
    /// Every character in the catalog (default)
    #[default]
    All,
    /// Entries flagged `isDigit`
    Digits,
    /// Entries flagged `isLetter`
    Letters,
    /// Entries flagged `isAmount` (digits and amount punctuation)
    Amount,
    /// Entries flagged `isDate` (digits and date separators)
    Date,
    /// An explicit list of characters
    Custom(String),
}

impl AllowedCharacters {
    /// Check if a catalog entry belongs to this set
    pub fn allows(&self, definition: &CharacterDefinition) -> bool {
        let traits = definition.traits();
        match self {
            Self::All => true,
            Self::Digits => traits.is_digit,
            Self::Letters => traits.is_letter,
            Self::Amount => traits.is_amount,
            Self::Date => traits.is_date,
            Self::Custom(chars) => chars.contains(definition.character()),
        }
    }
}
