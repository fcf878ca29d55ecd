use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Name of a participant in a bill.
///
/// The name is the participant's identity. Two names are equal when they
/// match case-insensitively after trimming surrounding whitespace, while the
/// display form keeps the spelling first entered.
///
/// # Examples
///
/// ```
/// use bill_split::core::participant::ParticipantName;
///
/// let bob = ParticipantName::new("Bob");
/// assert_eq!(bob, ParticipantName::new("bob"));
/// assert_eq!(bob.to_string(), "Bob");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ParticipantName(String);

impl ParticipantName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    /// Returns the name as entered.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used for case-insensitive comparison.
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for ParticipantName {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ParticipantName {}

impl Hash for ParticipantName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ParticipantName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<ParticipantName> for String {
    fn from(name: ParticipantName) -> Self {
        name.0
    }
}

/// A person sharing the bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    name: ParticipantName,
    /// PromptPay id (phone or national id) the participant can be paid on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    promptpay: Option<String>,
}

impl Participant {
    pub fn new(name: impl Into<ParticipantName>) -> Self {
        Self {
            name: name.into(),
            promptpay: None,
        }
    }

    pub fn with_promptpay(mut self, promptpay: impl Into<String>) -> Self {
        self.promptpay = Some(promptpay.into());
        self
    }

    pub fn name(&self) -> &ParticipantName {
        &self.name
    }

    pub fn promptpay(&self) -> Option<&str> {
        self.promptpay.as_deref()
    }
}
