use tracing::debug;

use crate::{
    catalog::{Control, Intent, IntentCatalog},
    similarity,
};

pub const MIN_CONFIDENCE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'c> {
    pub intent: Option<&'c Intent>,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct IntentResolver {
    catalog: IntentCatalog,
}

impl IntentResolver {
    pub fn new(catalog: IntentCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &IntentCatalog {
        &self.catalog
    }

    pub fn resolve(&self, text: &str) -> Option<&Intent> {
        self.best_match(text).intent
    }

    /// Scans every phrase in catalog order and keeps the first strictly
    /// better score at or above [`MIN_CONFIDENCE`]. Equal scores never
    /// displace an earlier intent.
    pub fn best_match(&self, text: &str) -> MatchResult<'_> {
        let mut best = MatchResult {
            intent: None,
            score: 0.0,
        };

        for entry in self.catalog.entries() {
            for phrase in entry.phrases() {
                let score = similarity::score(text, phrase);
                if score > best.score && score >= MIN_CONFIDENCE {
                    best = MatchResult {
                        intent: Some(entry.intent()),
                        score,
                    };
                }
            }
        }

        debug!(
            input = text,
            intent = best.intent.map(Intent::as_str),
            score = best.score,
            "resolved intent"
        );
        best
    }

    pub fn control(&self, text: &str) -> Option<Control> {
        self.resolve(text).and_then(Intent::control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogSpec, IntentSpec};

    fn build(domain: Vec<IntentSpec>) -> IntentResolver {
        let mut intents = domain;
        intents.push(IntentSpec::new("cancel", ["cancel", "stop input"]));
        intents.push(IntentSpec::new("exit", ["exit", "close", "quit program"]));
        let catalog = IntentCatalog::from_spec(CatalogSpec::new(intents)).unwrap();
        IntentResolver::new(catalog)
    }

    fn contacts() -> IntentResolver {
        build(vec![
            IntentSpec::new("add-contact", ["add contact", "new contact", "create contact"]),
            IntentSpec::new("find-contact", ["find contact", "search contact"]),
            IntentSpec::new("show-contacts", ["show all contacts", "list contacts"]),
        ])
    }

    #[test]
    fn resolves_exact_and_approximate_phrases() {
        let resolver = contacts();
        assert_eq!(resolver.resolve("add contact").unwrap().as_str(), "add-contact");
        assert_eq!(resolver.resolve("Add Contakt").unwrap().as_str(), "add-contact");
        assert_eq!(resolver.resolve("serch contact").unwrap().as_str(), "find-contact");
        assert_eq!(resolver.resolve("show contacts").unwrap().as_str(), "show-contacts");
        assert_eq!(resolver.resolve("QUIT").unwrap().as_str(), "exit");
    }

    #[test]
    fn reports_the_winning_score() {
        let resolver = contacts();
        let result = resolver.best_match("new contact");
        assert_eq!(result.intent.map(Intent::as_str), Some("add-contact"));
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn below_threshold_resolves_to_nothing() {
        let resolver = contacts();
        let result = resolver.best_match("xyz123");
        assert!(result.intent.is_none());
        assert_eq!(result.score, 0.0);
        assert!(resolver.resolve("").is_none());
    }

    #[test]
    fn weak_best_match_is_still_rejected() {
        let resolver = build(vec![IntentSpec::new("add", ["abcdefghij"])]);
        // Shares a single character with "abcdefghij" (2/20 = 0.1) and
        // less than the threshold with every control phrase.
        let result = resolver.best_match("jzzzzzzzzz");
        assert!(result.intent.is_none());
    }

    #[test]
    fn first_intent_wins_on_equal_score() {
        let resolver = build(vec![
            IntentSpec::new("a", ["add item"]),
            IntentSpec::new("b", ["add items"]),
        ]);
        assert_eq!(resolver.resolve("add item").unwrap().as_str(), "a");

        let resolver = build(vec![
            IntentSpec::new("first", ["remove record"]),
            IntentSpec::new("second", ["remove record"]),
        ]);
        assert_eq!(resolver.resolve("remove recor").unwrap().as_str(), "first");
    }

    #[test]
    fn later_strictly_better_phrase_displaces_earlier_match() {
        let resolver = build(vec![
            IntentSpec::new("a", ["add items"]),
            IntentSpec::new("b", ["add item"]),
        ]);
        assert_eq!(resolver.resolve("add item").unwrap().as_str(), "b");
    }

    #[test]
    fn detects_control_intents() {
        let resolver = contacts();
        assert_eq!(resolver.control("exit"), Some(Control::Exit));
        assert_eq!(resolver.control("cancel"), Some(Control::Cancel));
        assert_eq!(resolver.control("add contact"), None);
        assert_eq!(resolver.control("0501234567"), None);
    }
}
