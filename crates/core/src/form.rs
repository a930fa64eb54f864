use tracing::debug;

use crate::{
    catalog::Control,
    console::Console,
    error::Error,
    input::{GuardedInput, LoopOutcome},
    validation::FieldKind,
};

#[derive(Debug, Clone)]
struct Field {
    key: &'static str,
    prompt: String,
    kind: FieldKind,
}

#[derive(Debug, Clone, Default)]
pub struct Form {
    fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Completed(FormValues),
    /// A field was interrupted; every value accepted so far is dropped.
    Abandoned(Control),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(Vec<(&'static str, String)>);

impl FormValues {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(key, value)| (*key, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: &'static str, prompt: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(Field {
            key,
            prompt: prompt.into(),
            kind,
        });
        self
    }

    pub fn run<C>(&self, input: &mut GuardedInput<'_, C>) -> Result<FormOutcome, Error>
    where
        C: Console,
    {
        let mut values = Vec::with_capacity(self.fields.len());

        for field in &self.fields {
            let control = match input.run(&field.prompt, &field.kind)? {
                LoopOutcome::Accepted(value) => {
                    values.push((field.key, value));
                    continue;
                }
                LoopOutcome::Cancelled => Control::Cancel,
                LoopOutcome::Exited => Control::Exit,
            };

            debug!(
                field = field.key,
                discarded = values.len(),
                ?control,
                "form abandoned"
            );
            return Ok(FormOutcome::Abandoned(control));
        }

        Ok(FormOutcome::Completed(FormValues(values)))
    }
}
