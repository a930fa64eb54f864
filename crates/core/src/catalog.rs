use std::{collections::HashSet, fmt};

use serde::Deserialize;

use crate::error::CatalogError;

pub const CATALOG_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Intent(String);

impl Intent {
    pub const CANCEL: &'static str = "cancel";
    pub const EXIT: &'static str = "exit";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn control(&self) -> Option<Control> {
        match self.0.as_str() {
            Self::CANCEL => Some(Control::Cancel),
            Self::EXIT => Some(Control::Exit),
            _ => None,
        }
    }

    pub fn is_control(&self) -> bool {
        self.control().is_some()
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Cancel,
    Exit,
}

impl Control {
    pub const ALL: [Control; 2] = [Control::Cancel, Control::Exit];

    pub fn id(self) -> &'static str {
        match self {
            Control::Cancel => Intent::CANCEL,
            Control::Exit => Intent::EXIT,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CatalogSpec {
    pub version: u32,
    #[serde(rename = "intent", default)]
    pub intents: Vec<IntentSpec>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IntentSpec {
    pub id: String,
    pub phrases: Vec<String>,
}

impl CatalogSpec {
    pub fn new(intents: Vec<IntentSpec>) -> Self {
        Self {
            version: CATALOG_VERSION,
            intents,
        }
    }
}

impl IntentSpec {
    pub fn new<I, S>(id: impl Into<String>, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntentEntry {
    intent: Intent,
    phrases: Vec<String>,
}

impl IntentEntry {
    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}

/// Entry order is declaration order and decides resolution ties.
#[derive(Debug, Clone)]
pub struct IntentCatalog {
    entries: Vec<IntentEntry>,
}

impl IntentCatalog {
    pub fn from_spec(spec: CatalogSpec) -> Result<Self, CatalogError> {
        if spec.version != CATALOG_VERSION {
            return Err(CatalogError::UnsupportedVersion {
                found: spec.version,
                expected: CATALOG_VERSION,
            });
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(spec.intents.len());

        for IntentSpec { id, phrases } in spec.intents {
            if id.trim().is_empty() {
                return Err(CatalogError::BlankIntentId);
            }
            if !seen.insert(id.clone()) {
                return Err(CatalogError::DuplicateIntent(id));
            }
            if phrases.is_empty() {
                return Err(CatalogError::EmptyPhrases(id));
            }
            if phrases.iter().any(|phrase| phrase.trim().is_empty()) {
                return Err(CatalogError::BlankPhrase(id));
            }

            entries.push(IntentEntry {
                intent: Intent::new(id),
                phrases,
            });
        }

        for control in Control::ALL {
            if !seen.contains(control.id()) {
                return Err(CatalogError::MissingControlIntent(control.id()));
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> impl Iterator<Item = &IntentEntry> {
        self.entries.iter()
    }

    pub fn get(&self, id: &str) -> Option<&IntentEntry> {
        self.entries.iter().find(|entry| entry.intent.as_str() == id)
    }

    pub fn domain_intents(&self) -> impl Iterator<Item = &Intent> {
        self.entries
            .iter()
            .map(|entry| &entry.intent)
            .filter(|intent| !intent.is_control())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> Vec<IntentSpec> {
        vec![
            IntentSpec::new("cancel", ["cancel"]),
            IntentSpec::new("exit", ["exit"]),
        ]
    }

    #[test]
    fn keeps_declaration_order() {
        let mut intents = vec![
            IntentSpec::new("b", ["bee"]),
            IntentSpec::new("a", ["ay"]),
        ];
        intents.extend(controls());

        let catalog = IntentCatalog::from_spec(CatalogSpec::new(intents)).unwrap();
        let ids: Vec<_> = catalog.entries().map(|e| e.intent().as_str()).collect();
        assert_eq!(ids, ["b", "a", "cancel", "exit"]);

        let domain: Vec<_> = catalog.domain_intents().map(Intent::as_str).collect();
        assert_eq!(domain, ["b", "a"]);
    }

    #[test]
    fn rejects_empty_phrase_set() {
        let mut intents = controls();
        intents.push(IntentSpec::new("add-note", Vec::<String>::new()));

        let err = IntentCatalog::from_spec(CatalogSpec::new(intents)).unwrap_err();
        assert_eq!(err, CatalogError::EmptyPhrases("add-note".into()));
    }

    #[test]
    fn rejects_blank_phrase_and_id() {
        let mut intents = controls();
        intents.push(IntentSpec::new("add-note", ["add note", "  "]));
        let err = IntentCatalog::from_spec(CatalogSpec::new(intents)).unwrap_err();
        assert_eq!(err, CatalogError::BlankPhrase("add-note".into()));

        let mut intents = controls();
        intents.push(IntentSpec::new(" ", ["anything"]));
        let err = IntentCatalog::from_spec(CatalogSpec::new(intents)).unwrap_err();
        assert_eq!(err, CatalogError::BlankIntentId);
    }

    #[test]
    fn rejects_missing_control_intents() {
        let spec = CatalogSpec::new(vec![IntentSpec::new("exit", ["exit"])]);
        let err = IntentCatalog::from_spec(spec).unwrap_err();
        assert_eq!(err, CatalogError::MissingControlIntent("cancel"));

        let spec = CatalogSpec::new(vec![IntentSpec::new("cancel", ["cancel"])]);
        let err = IntentCatalog::from_spec(spec).unwrap_err();
        assert_eq!(err, CatalogError::MissingControlIntent("exit"));
    }

    #[test]
    fn rejects_duplicates_and_unknown_versions() {
        let mut intents = controls();
        intents.push(IntentSpec::new("exit", ["quit"]));
        let err = IntentCatalog::from_spec(CatalogSpec::new(intents)).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateIntent("exit".into()));

        let spec = CatalogSpec {
            version: 2,
            intents: controls(),
        };
        let err = IntentCatalog::from_spec(spec).unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnsupportedVersion {
                found: 2,
                expected: CATALOG_VERSION
            }
        );
    }

    #[test]
    fn classifies_control_intents() {
        assert_eq!(Intent::new("exit").control(), Some(Control::Exit));
        assert_eq!(Intent::new("cancel").control(), Some(Control::Cancel));
        assert_eq!(Intent::new("add-contact").control(), None);
    }
}
