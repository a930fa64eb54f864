use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("console i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unsupported catalog version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("catalog has an intent with a blank id")]
    BlankIntentId,

    #[error("intent `{0}` is declared more than once")]
    DuplicateIntent(String),

    #[error("intent `{0}` has no trigger phrases")]
    EmptyPhrases(String),

    #[error("intent `{0}` has a blank trigger phrase")]
    BlankPhrase(String),

    #[error("catalog is missing the reserved `{0}` intent")]
    MissingControlIntent(&'static str),
}

/// `Display` text is shown to the user verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must contain at least 2 characters")]
    NameTooShort,

    #[error("phone number must contain exactly 10 digits")]
    InvalidPhone,

    #[error("invalid email format, expected something like example@domain.com")]
    InvalidEmail,

    #[error("birthday must be a valid date in dd-mm-yyyy format")]
    InvalidBirthday,

    #[error("address must contain at least 5 characters")]
    AddressTooShort,

    #[error("value must not be empty")]
    Empty,

    #[error("expected a non-negative whole number")]
    NotANumber,

    #[error("choose a number between 1 and {max}")]
    OutOfRange { max: usize },

    #[error("{0}")]
    Rejected(String),
}
