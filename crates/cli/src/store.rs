use std::{
    collections::BTreeMap,
    fmt, fs, io,
    path::{Path, PathBuf},
};

use chrono::{Datelike, NaiveDate};
use concierge_core::BIRTHDAY_FORMAT;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

pub const CONTACTS_FILE: &str = "addressbook.json";
pub const NOTES_FILE: &str = "notebook.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Why a record could not be re-keyed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenameError {
    #[error("`{0}` was not found")]
    NotFound(String),

    #[error("`{0}` already exists")]
    Taken(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phones: Vec<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
}

impl Contact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phones: Vec::new(),
            address: None,
            email: None,
            birthday: None,
        }
    }

    /// Replaces `old` with `new`; false if `old` is not one of the phones.
    pub fn edit_phone(&mut self, old: &str, new: impl Into<String>) -> bool {
        match self.phones.iter_mut().find(|phone| phone.as_str() == old) {
            Some(phone) => {
                *phone = new.into();
                true
            }
            None => false,
        }
    }

    /// Days from `today` until the next birthday, `0` when it is today.
    ///
    /// A 29 February birthday is celebrated on 1 March in non-leap years.
    pub fn days_to_birthday(&self, today: NaiveDate) -> Option<i64> {
        let birthday = self.birthday?;
        let mut next = anniversary(birthday, today.year())?;
        if next < today {
            next = anniversary(birthday, today.year() + 1)?;
        }
        Some((next - today).num_days())
    }
}

fn anniversary(birthday: NaiveDate, year: i32) -> Option<NaiveDate> {
    birthday
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let birthday = self
            .birthday
            .map(|date| date.format(BIRTHDAY_FORMAT).to_string());
        write!(
            f,
            "Contact: {}, phones: {}, address: {}, email: {}, birthday: {}",
            self.name,
            self.phones.join("; "),
            self.address.as_deref().unwrap_or("N/A"),
            self.email.as_deref().unwrap_or("N/A"),
            birthday.as_deref().unwrap_or("N/A"),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchCriterion {
    Name,
    Phone,
    Email,
    Address,
}

/// Contacts keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBook {
    contacts: BTreeMap<String, Contact>,
}

impl AddressBook {
    /// Inserts or replaces the contact with the same name.
    pub fn add(&mut self, contact: Contact) {
        self.contacts.insert(contact.name.clone(), contact);
    }

    pub fn find(&self, name: &str) -> Option<&Contact> {
        self.contacts.get(name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Contact> {
        self.contacts.get_mut(name)
    }

    pub fn delete(&mut self, name: &str) -> Option<Contact> {
        self.contacts.remove(name)
    }

    /// Re-keys a contact under a new name. Never replaces another contact.
    pub fn rename(&mut self, old: &str, new: impl Into<String>) -> Result<(), RenameError> {
        let new = new.into();
        if new != old && self.contacts.contains_key(&new) {
            return Err(RenameError::Taken(new));
        }
        let Some(mut contact) = self.contacts.remove(old) else {
            return Err(RenameError::NotFound(old.to_string()));
        };
        contact.name = new;
        self.add(contact);
        Ok(())
    }

    pub fn search(&self, keyword: &str, criterion: SearchCriterion) -> Vec<&Contact> {
        let needle = keyword.to_lowercase();
        let contains = |value: &str| value.to_lowercase().contains(&needle);

        self.contacts
            .values()
            .filter(|contact| match criterion {
                SearchCriterion::Name => contains(contact.name.as_str()),
                SearchCriterion::Phone => contact.phones.iter().any(|p| p.contains(keyword)),
                SearchCriterion::Email => contact.email.as_deref().is_some_and(contains),
                SearchCriterion::Address => contact.address.as_deref().is_some_and(contains),
            })
            .collect()
    }

    /// Contacts whose next birthday is at most `days` away.
    pub fn upcoming_birthdays(&self, days: i64, today: NaiveDate) -> Vec<&Contact> {
        self.contacts
            .values()
            .filter(|contact| {
                contact
                    .days_to_birthday(today)
                    .is_some_and(|remaining| remaining <= days)
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
    pub tags: Vec<String>,
}

impl Note {
    pub fn new(text: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            text: text.into(),
            tags,
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Note: {}, tags: {}", self.text, self.tags.join(", "))
    }
}

/// Notes keyed by their text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteBook {
    notes: BTreeMap<String, Note>,
}

impl NoteBook {
    pub fn add(&mut self, note: Note) {
        self.notes.insert(note.text.clone(), note);
    }

    pub fn find(&self, text: &str) -> Option<&Note> {
        self.notes.get(text)
    }

    pub fn delete(&mut self, text: &str) -> Option<Note> {
        self.notes.remove(text)
    }

    pub fn edit_text(&mut self, old: &str, new: impl Into<String>) -> Result<(), RenameError> {
        let new = new.into();
        if new != old && self.notes.contains_key(&new) {
            return Err(RenameError::Taken(new));
        }
        let Some(mut note) = self.notes.remove(old) else {
            return Err(RenameError::NotFound(old.to_string()));
        };
        note.text = new;
        self.add(note);
        Ok(())
    }

    pub fn set_tags(&mut self, text: &str, tags: Vec<String>) -> bool {
        match self.notes.get_mut(text) {
            Some(note) => {
                note.tags = tags;
                true
            }
            None => false,
        }
    }

    /// Notes whose text or any tag contains `keyword`, ignoring case.
    pub fn search(&self, keyword: &str) -> Vec<&Note> {
        let needle = keyword.to_lowercase();
        self.notes
            .values()
            .filter(|note| {
                note.text.to_lowercase().contains(&needle)
                    || note.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Loads a JSON blob, or the default value when the file does not exist yet.
pub fn load<T>(path: &Path) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&contents).map_err(|source| StoreError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save<T>(value: &T, path: &Path) -> Result<(), StoreError>
where
    T: Serialize,
{
    let write_err = |source: io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let contents = serde_json::to_string_pretty(value).map_err(|source| StoreError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, contents).map_err(write_err)
}

/// Where the address book and notebook live inside the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    pub contacts: PathBuf,
    pub notes: PathBuf,
}

impl DataFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            contacts: dir.join(CONTACTS_FILE),
            notes: dir.join(NOTES_FILE),
        }
    }

    pub fn load(&self) -> Result<(AddressBook, NoteBook), StoreError> {
        Ok((load(&self.contacts)?, load(&self.notes)?))
    }

    pub fn save(&self, book: &AddressBook, notes: &NoteBook) -> Result<(), StoreError> {
        save(book, &self.contacts)?;
        save(notes, &self.notes)
    }
}
