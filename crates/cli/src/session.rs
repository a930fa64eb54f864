use chrono::{Local, NaiveDate};
use concierge_core::{
    Console, Control, Error, FieldKind, Form, FormOutcome, GuardedInput, Intent, IntentCatalog,
    IntentResolver, parse_birthday, split_tags,
};
use tracing::{error, info, warn};

use crate::store::{AddressBook, Contact, DataFiles, Note, NoteBook, SearchCriterion, StoreError};

const COMMAND_PROMPT: &str = "\nEnter a command >>> ";

/// Domain intents the assistant knows how to carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AddContact,
    FindContact,
    DeleteContact,
    EditContact,
    ShowContacts,
    Birthdays,
    AddNote,
    FindNote,
    EditNote,
    DeleteNote,
}

impl Command {
    pub const ALL: [Command; 10] = [
        Command::AddContact,
        Command::FindContact,
        Command::DeleteContact,
        Command::EditContact,
        Command::ShowContacts,
        Command::Birthdays,
        Command::AddNote,
        Command::FindNote,
        Command::EditNote,
        Command::DeleteNote,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Command::AddContact => "add-contact",
            Command::FindContact => "find-contact",
            Command::DeleteContact => "delete-contact",
            Command::EditContact => "edit-contact",
            Command::ShowContacts => "show-contacts",
            Command::Birthdays => "birthdays",
            Command::AddNote => "add-note",
            Command::FindNote => "find-note",
            Command::EditNote => "edit-note",
            Command::DeleteNote => "delete-note",
        }
    }

    pub fn from_intent(intent: &Intent) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|command| command.id() == intent.as_str())
    }
}

/// Domain intents declared in the catalog that no command handles.
pub fn unhandled_intents(catalog: &IntentCatalog) -> Vec<&Intent> {
    catalog
        .domain_intents()
        .filter(|intent| Command::from_intent(intent).is_none())
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Console(#[from] Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Runs `session` to the end and then saves both books, also when the
/// session stopped on a console error.
pub fn run_and_save<C>(mut session: Session<'_, C>, files: &DataFiles) -> Result<C, SessionError>
where
    C: Console,
{
    let outcome = session.run();
    let (book, notes, console) = session.into_parts();
    let saved = files.save(&book, &notes);

    if let (Err(err), Err(_)) = (&outcome, &saved) {
        error!(%err, "session failed and its data could not be saved");
    }
    saved?;
    outcome?;
    Ok(console)
}

/// Interactive loop over the address book and notebook.
///
/// Runs until the user resolves to `exit` at the command prompt or input
/// ends. `exit`/`cancel` typed inside a command only abandon that command.
pub struct Session<'r, C> {
    input: GuardedInput<'r, C>,
    book: AddressBook,
    notes: NoteBook,
    today: NaiveDate,
}

impl<'r, C> Session<'r, C>
where
    C: Console,
{
    pub fn new(
        resolver: &'r IntentResolver,
        console: C,
        book: AddressBook,
        notes: NoteBook,
    ) -> Self {
        Self {
            input: GuardedInput::new(resolver, console),
            book,
            notes,
            today: Local::now().date_naive(),
        }
    }

    /// Pins the date used for birthday countdowns.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn book(&self) -> &AddressBook {
        &self.book
    }

    pub fn notes(&self) -> &NoteBook {
        &self.notes
    }

    pub fn console(&self) -> &C {
        self.input.console()
    }

    pub fn into_parts(self) -> (AddressBook, NoteBook, C) {
        (self.book, self.notes, self.input.into_console())
    }

    pub fn run(&mut self) -> Result<(), Error> {
        self.say("Welcome! I can help you manage your contacts and notes.")?;

        loop {
            let Some(line) = self.input.console_mut().read_line(COMMAND_PROMPT)? else {
                info!("input closed, ending session");
                return Ok(());
            };

            let Some(intent) = self.input.resolver().resolve(&line) else {
                self.say("Sorry, I could not recognize that command. Please try again.")?;
                continue;
            };

            match intent.control() {
                Some(Control::Exit) => {
                    info!("exit requested");
                    return Ok(());
                }
                Some(Control::Cancel) => self.say("Nothing to cancel right now.")?,
                None => match Command::from_intent(intent) {
                    Some(command) => {
                        info!(command = command.id(), "dispatching command");
                        self.dispatch(command)?;
                    }
                    None => {
                        warn!(intent = intent.as_str(), "no handler for intent");
                        self.say("Sorry, that command is not supported yet.")?;
                    }
                },
            }
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<(), Error> {
        match command {
            Command::AddContact => self.add_contact(),
            Command::FindContact => self.find_contact(),
            Command::DeleteContact => self.delete_contact(),
            Command::EditContact => self.edit_contact(),
            Command::ShowContacts => self.show_contacts(),
            Command::Birthdays => self.birthdays(),
            Command::AddNote => self.add_note(),
            Command::FindNote => self.find_note(),
            Command::EditNote => self.edit_note(),
            Command::DeleteNote => self.delete_note(),
        }
    }

    fn add_contact(&mut self) -> Result<(), Error> {
        let form = Form::new()
            .field("name", "Name: ", FieldKind::Name)
            .field("phone", "Phone number: ", FieldKind::Phone)
            .field("address", "Address: ", FieldKind::Address)
            .field("email", "Email: ", FieldKind::Email)
            .field("birthday", "Birthday (dd-mm-yyyy): ", FieldKind::Birthday);

        let values = match form.run(&mut self.input)? {
            FormOutcome::Completed(values) => values,
            FormOutcome::Abandoned(control) => return self.abandon(control),
        };

        let name = values.get("name").unwrap_or_default();
        let mut contact = Contact::new(name);
        contact.phones.extend(values.get("phone").map(str::to_string));
        contact.address = values.get("address").map(str::to_string);
        contact.email = values.get("email").map(str::to_string);
        contact.birthday = values
            .get("birthday")
            .and_then(|raw| parse_birthday(raw).ok());
        self.book.add(contact);

        self.say(format!("Contact {name} added to your address book."))
    }

    fn find_contact(&mut self) -> Result<(), Error> {
        let options = ["name", "phone number", "email", "address"];
        let Some(choice) = self.choose("Search contacts by:", &options)? else {
            return Ok(());
        };
        let criterion = match choice {
            1 => SearchCriterion::Name,
            2 => SearchCriterion::Phone,
            3 => SearchCriterion::Email,
            _ => SearchCriterion::Address,
        };
        let Some(keyword) = self.ask("Search for: ", FieldKind::Text)? else {
            return Ok(());
        };

        let found = lines(self.book.search(&keyword, criterion));
        self.print_all(found, "No contacts matched your search.")
    }

    fn delete_contact(&mut self) -> Result<(), Error> {
        let Some(name) = self.ask("Name of the contact to delete: ", FieldKind::Text)? else {
            return Ok(());
        };
        match self.book.delete(&name) {
            Some(_) => self.say(format!("Contact {name} deleted.")),
            None => self.say("No contact with that name."),
        }
    }

    fn edit_contact(&mut self) -> Result<(), Error> {
        let Some(name) = self.ask("Name of the contact to edit: ", FieldKind::Text)? else {
            return Ok(());
        };
        if self.book.find(&name).is_none() {
            return self.say("Contact not found.");
        }

        let options = ["name", "phone number", "email", "address", "birthday"];
        let Some(choice) = self.choose("Choose a field to edit:", &options)? else {
            return Ok(());
        };

        match choice {
            1 => {
                let Some(new_name) = self.ask("New name: ", FieldKind::Name)? else {
                    return Ok(());
                };
                match self.book.rename(&name, new_name) {
                    Ok(()) => self.say("Name updated."),
                    Err(err) => self.say(format!("Name not changed: {err}.")),
                }
            }
            2 => {
                let Some(old) = self.ask("Phone number to replace: ", FieldKind::Phone)? else {
                    return Ok(());
                };
                let Some(new) = self.ask("New phone number: ", FieldKind::Phone)? else {
                    return Ok(());
                };
                let updated = self
                    .book
                    .find_mut(&name)
                    .is_some_and(|contact| contact.edit_phone(&old, new));
                if updated {
                    self.say("Phone number updated.")
                } else {
                    self.say("That phone number was not found.")
                }
            }
            3 => {
                let Some(email) = self.ask("New email: ", FieldKind::Email)? else {
                    return Ok(());
                };
                if let Some(contact) = self.book.find_mut(&name) {
                    contact.email = Some(email);
                }
                self.say("Email updated.")
            }
            4 => {
                let Some(address) = self.ask("New address: ", FieldKind::Address)? else {
                    return Ok(());
                };
                if let Some(contact) = self.book.find_mut(&name) {
                    contact.address = Some(address);
                }
                self.say("Address updated.")
            }
            _ => {
                let prompt = "New birthday (dd-mm-yyyy): ";
                let Some(raw) = self.ask(prompt, FieldKind::Birthday)? else {
                    return Ok(());
                };
                if let Some(contact) = self.book.find_mut(&name) {
                    contact.birthday = parse_birthday(&raw).ok();
                }
                self.say("Birthday updated.")
            }
        }
    }

    fn show_contacts(&mut self) -> Result<(), Error> {
        if self.book.is_empty() {
            return self.say("Your address book is empty.");
        }
        self.say("Your contacts:")?;
        let all = lines(self.book.iter());
        self.print_all(all, "")
    }

    fn birthdays(&mut self) -> Result<(), Error> {
        let Some(raw) = self.ask("Number of days ahead: ", FieldKind::Days)? else {
            return Ok(());
        };
        let Ok(days) = raw.parse::<i64>() else {
            return Ok(());
        };

        let upcoming = lines(self.book.upcoming_birthdays(days, self.today));
        if !upcoming.is_empty() {
            self.say(format!("Birthdays in the next {days} days:"))?;
        }
        self.print_all(upcoming, "No birthdays in that period.")
    }

    fn add_note(&mut self) -> Result<(), Error> {
        let form = Form::new()
            .field("text", "Note text: ", FieldKind::Text)
            .field("tags", "Tags (comma separated): ", FieldKind::Tags);

        let values = match form.run(&mut self.input)? {
            FormOutcome::Completed(values) => values,
            FormOutcome::Abandoned(control) => return self.abandon(control),
        };

        let text = values.get("text").unwrap_or_default();
        let tags = split_tags(values.get("tags").unwrap_or_default());
        self.notes.add(Note::new(text, tags));
        self.say("Note added.")
    }

    fn find_note(&mut self) -> Result<(), Error> {
        let Some(keyword) = self.ask("Keyword to search notes for: ", FieldKind::Text)? else {
            return Ok(());
        };
        let found = lines(self.notes.search(&keyword));
        self.print_all(found, "No notes matched your search.")
    }

    fn edit_note(&mut self) -> Result<(), Error> {
        let Some(text) = self.ask("Text of the note to edit: ", FieldKind::Text)? else {
            return Ok(());
        };
        if self.notes.find(&text).is_none() {
            return self.say("Note not found.");
        }

        let Some(choice) = self.choose("Choose what to edit:", &["text", "tags"])? else {
            return Ok(());
        };

        if choice == 1 {
            let Some(new_text) = self.ask("New note text: ", FieldKind::Text)? else {
                return Ok(());
            };
            match self.notes.edit_text(&text, new_text) {
                Ok(()) => self.say("Note text updated."),
                Err(err) => self.say(format!("Note not changed: {err}.")),
            }
        } else {
            let prompt = "New tags (comma separated): ";
            let Some(tags) = self.ask(prompt, FieldKind::Tags)? else {
                return Ok(());
            };
            self.notes.set_tags(&text, split_tags(&tags));
            self.say("Tags updated.")
        }
    }

    fn delete_note(&mut self) -> Result<(), Error> {
        let Some(text) = self.ask("Text of the note to delete: ", FieldKind::Text)? else {
            return Ok(());
        };
        match self.notes.delete(&text) {
            Some(_) => self.say("Note deleted."),
            None => self.say("No note with that text."),
        }
    }

    /// One guarded field; `None` when the user backed out (already reported).
    fn ask(&mut self, prompt: &str, kind: FieldKind) -> Result<Option<String>, Error> {
        let outcome = self.input.run(prompt, &kind)?;
        if let Some(control) = outcome.control() {
            self.abandon(control)?;
        }
        Ok(outcome.accepted())
    }

    fn choose(&mut self, title: &str, options: &[&str]) -> Result<Option<usize>, Error> {
        self.say(title)?;
        for (index, option) in options.iter().enumerate() {
            self.say(format!("{}. {option}", index + 1))?;
        }
        let choice = self.ask("Enter a number: ", FieldKind::Choice(options.len()))?;
        Ok(choice.and_then(|raw| raw.parse().ok()))
    }

    fn abandon(&mut self, control: Control) -> Result<(), Error> {
        match control {
            Control::Cancel => self.say("Action cancelled. Back to the main menu."),
            Control::Exit => self.say("Leaving the current action. Back to the main menu."),
        }
    }

    fn print_all(&mut self, lines: Vec<String>, empty: &str) -> Result<(), Error> {
        if lines.is_empty() && !empty.is_empty() {
            return self.say(empty);
        }
        for line in lines {
            self.say(line)?;
        }
        Ok(())
    }

    fn say(&mut self, message: impl AsRef<str>) -> Result<(), Error> {
        self.input.console_mut().say(message.as_ref())?;
        Ok(())
    }
}

fn lines<I, T>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    items.into_iter().map(|item| item.to_string()).collect()
}
