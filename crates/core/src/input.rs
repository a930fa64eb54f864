use tracing::debug;

use crate::{
    catalog::Control,
    console::Console,
    error::Error,
    resolver::IntentResolver,
    validation::FieldValidator,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopOutcome {
    Accepted(String),
    Cancelled,
    Exited,
}

impl LoopOutcome {
    pub fn accepted(self) -> Option<String> {
        match self {
            LoopOutcome::Accepted(value) => Some(value),
            LoopOutcome::Cancelled | LoopOutcome::Exited => None,
        }
    }

    pub fn control(&self) -> Option<Control> {
        match self {
            LoopOutcome::Accepted(_) => None,
            LoopOutcome::Cancelled => Some(Control::Cancel),
            LoopOutcome::Exited => Some(Control::Exit),
        }
    }
}

impl From<Control> for LoopOutcome {
    fn from(control: Control) -> Self {
        match control {
            Control::Cancel => LoopOutcome::Cancelled,
            Control::Exit => LoopOutcome::Exited,
        }
    }
}

/// Each line is checked for `cancel`/`exit` before the validator sees it.
/// Rejections repeat the prompt with no limit; end of input is `Exited`.
pub struct GuardedInput<'r, C> {
    resolver: &'r IntentResolver,
    console: C,
}

impl<'r, C> GuardedInput<'r, C>
where
    C: Console,
{
    pub fn new(resolver: &'r IntentResolver, console: C) -> Self {
        Self { resolver, console }
    }

    pub fn resolver(&self) -> &'r IntentResolver {
        self.resolver
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    pub fn run(
        &mut self,
        prompt: &str,
        validator: &dyn FieldValidator,
    ) -> Result<LoopOutcome, Error> {
        loop {
            let Some(line) = self.console.read_line(prompt)? else {
                debug!(prompt, "input closed while prompting");
                return Ok(LoopOutcome::Exited);
            };

            if let Some(control) = self.resolver.control(&line) {
                debug!(prompt, ?control, "control intent interrupted input");
                return Ok(control.into());
            }

            match validator.validate(&line) {
                Ok(value) => return Ok(LoopOutcome::Accepted(value)),
                Err(reason) => {
                    debug!(prompt, %reason, "input rejected");
                    self.console
                        .say(&format!("Invalid input: {reason}. Please try again."))?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{CatalogSpec, IntentCatalog, IntentSpec},
        console::ScriptedConsole,
        error::ValidationError,
        validation::FieldKind,
    };

    fn resolver() -> IntentResolver {
        let catalog = IntentCatalog::from_spec(CatalogSpec::new(vec![
            IntentSpec::new("add-contact", ["add contact"]),
            IntentSpec::new("cancel", ["cancel"]),
            IntentSpec::new("exit", ["exit", "quit"]),
        ]))
        .unwrap();
        IntentResolver::new(catalog)
    }

    #[test]
    fn retries_until_valid() {
        let resolver = resolver();
        let mut input = GuardedInput::new(&resolver, ScriptedConsole::new(["12345", "1234567890"]));

        let outcome = input.run("Phone: ", &FieldKind::Phone).unwrap();

        assert_eq!(outcome, LoopOutcome::Accepted("1234567890".into()));
        let console = input.into_console();
        assert_eq!(console.prompts(), ["Phone: ", "Phone: "]);
        assert_eq!(console.output().len(), 1);
        assert!(console.output()[0].contains("exactly 10 digits"));
    }

    #[test]
    fn exit_wins_over_a_validator_that_would_accept() {
        let resolver = resolver();
        let accept_all = |raw: &str| -> Result<String, ValidationError> { Ok(raw.to_string()) };
        let mut input = GuardedInput::new(&resolver, ScriptedConsole::new(["quit", "never read"]));

        let outcome = input.run("Note: ", &accept_all).unwrap();

        assert_eq!(outcome, LoopOutcome::Exited);
        assert_eq!(input.console().remaining(), 1);
        assert!(input.console().output().is_empty());
    }

    #[test]
    fn cancel_stops_after_rejections() {
        let resolver = resolver();
        let mut input = GuardedInput::new(&resolver, ScriptedConsole::new(["J", "CANCEL", "Anna"]));

        let outcome = input.run("Name: ", &FieldKind::Name).unwrap();

        assert_eq!(outcome, LoopOutcome::Cancelled);
        assert_eq!(input.console().prompts().len(), 2);
        assert_eq!(input.console().output().len(), 1);
        assert_eq!(input.console().remaining(), 1);
    }

    #[test]
    fn domain_intent_text_is_validated_not_dispatched() {
        let resolver = resolver();
        let mut input = GuardedInput::new(&resolver, ScriptedConsole::new(["add contact"]));

        let outcome = input.run("Note: ", &FieldKind::Text).unwrap();

        assert_eq!(outcome, LoopOutcome::Accepted("add contact".into()));
    }

    #[test]
    fn end_of_input_exits() {
        let resolver = resolver();
        let mut input = GuardedInput::new(&resolver, ScriptedConsole::new(["1"]));

        let outcome = input.run("Name: ", &FieldKind::Name).unwrap();

        assert_eq!(outcome, LoopOutcome::Exited);
        assert_eq!(input.console().output().len(), 1);
    }

    #[test]
    fn outcome_helpers() {
        assert_eq!(LoopOutcome::Accepted("a".into()).accepted(), Some("a".into()));
        assert_eq!(LoopOutcome::Cancelled.accepted(), None);
        assert_eq!(LoopOutcome::Exited.control(), Some(Control::Exit));
        assert_eq!(LoopOutcome::from(Control::Cancel), LoopOutcome::Cancelled);
    }
}
