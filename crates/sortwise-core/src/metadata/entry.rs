use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::kernel::constants::TAG_REMOVAL_MARKER;
use crate::utils::{name_key, names_match};

/// Identity of a conditional entry's payload inside a set.
pub trait EntryKey {
    /// Name the entry is known by
    fn name(&self) -> &str;

    /// Normalized identity key
    fn key(&self) -> String {
        name_key(self.name())
    }
}

/// A piece of metadata that only applies while its condition holds.
///
/// An empty condition means the entry always applies. Identity inside an
/// [`EntrySet`] is the payload's [`EntryKey`]; the condition takes no part in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalEntry<T> {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub condition: String,
    #[serde(flatten)]
    pub payload: T,
}

impl<T> ConditionalEntry<T> {
    pub fn new(payload: T) -> Self {
        Self {
            condition: String::new(),
            payload,
        }
    }

    pub fn with_condition(mut self, condition: &str) -> Self {
        self.condition = condition.to_string();
        self
    }

    pub fn is_conditional(&self) -> bool {
        !self.condition.is_empty()
    }
}

impl<T: EntryKey> ConditionalEntry<T> {
    pub fn name(&self) -> &str {
        self.payload.name()
    }

    pub fn key(&self) -> String {
        self.payload.key()
    }

    /// True if both entries describe the same underlying fact, whatever
    /// their conditions.
    pub fn same_identity(&self, other: &Self) -> bool {
        names_match(self.name(), other.name())
    }
}

/// A named file, referenced as a load-after target, requirement or
/// incompatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
}

impl EntryKey for FileSpec {
    fn name(&self) -> &str {
        &self.name
    }
}

pub type FileReference = ConditionalEntry<FileSpec>;

impl ConditionalEntry<FileSpec> {
    /// Unconditional reference to `name`
    pub fn file(name: &str) -> Self {
        Self::new(FileSpec {
            name: name.to_string(),
            display_name: String::new(),
        })
    }

    /// Reference with a display name and condition
    pub fn conditional_file(name: &str, display_name: &str, condition: &str) -> Self {
        Self::new(FileSpec {
            name: name.to_string(),
            display_name: display_name.to_string(),
        })
        .with_condition(condition)
    }

    /// Display name, falling back to the file name
    pub fn display_name(&self) -> &str {
        if self.payload.display_name.is_empty() {
            &self.payload.name
        } else {
            &self.payload.display_name
        }
    }
}

/// A category label that is either added to or removed from a plugin.
///
/// Serialized as its prefixed name, so `-Delev` reads as the removal of
/// `Delev`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TagFields", into = "TagFields")]
pub struct TagSpec {
    pub name: String,
    pub is_addition: bool,
}

#[derive(Serialize, Deserialize)]
struct TagFields {
    name: String,
}

impl From<TagFields> for TagSpec {
    fn from(fields: TagFields) -> Self {
        TagSpec::parse(&fields.name)
    }
}

impl From<TagSpec> for TagFields {
    fn from(tag: TagSpec) -> Self {
        TagFields {
            name: tag.prefixed_name(),
        }
    }
}

impl TagSpec {
    /// Parse a tag string; a leading removal marker makes it a removal
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim();
        match tag.strip_prefix(TAG_REMOVAL_MARKER) {
            Some(name) => Self {
                name: name.trim().to_string(),
                is_addition: false,
            },
            None => Self {
                name: tag.to_string(),
                is_addition: true,
            },
        }
    }

    pub fn prefixed_name(&self) -> String {
        if self.is_addition {
            self.name.clone()
        } else {
            format!("{}{}", TAG_REMOVAL_MARKER, self.name)
        }
    }
}

impl EntryKey for TagSpec {
    fn name(&self) -> &str {
        &self.name
    }
}

pub type CategoryTag = ConditionalEntry<TagSpec>;

impl ConditionalEntry<TagSpec> {
    pub fn tag(tag: &str) -> Self {
        Self::new(TagSpec::parse(tag))
    }

    pub fn is_addition(&self) -> bool {
        self.payload.is_addition
    }
}

/// Severity of a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSeverity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for MessageSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageSeverity::Note => write!(f, "note"),
            MessageSeverity::Warning => write!(f, "warning"),
            MessageSeverity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub severity: MessageSeverity,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

pub type Message = ConditionalEntry<MessageBody>;

impl ConditionalEntry<MessageBody> {
    pub fn message(severity: MessageSeverity, text: &str) -> Self {
        Self::new(MessageBody {
            severity,
            text: text.to_string(),
            language: None,
        })
    }

    pub fn note(text: &str) -> Self {
        Self::message(MessageSeverity::Note, text)
    }

    pub fn warning(text: &str) -> Self {
        Self::message(MessageSeverity::Warning, text)
    }

    pub fn error(text: &str) -> Self {
        Self::message(MessageSeverity::Error, text)
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.payload.language = Some(language.to_string());
        self
    }

    pub fn severity(&self) -> MessageSeverity {
        self.payload.severity
    }

    pub fn text(&self) -> &str {
        &self.payload.text
    }

    /// Messages without a language are shown in every language
    pub fn is_for_language(&self, language: &str) -> bool {
        match &self.payload.language {
            Some(lang) => names_match(lang, language),
            None => true,
        }
    }
}

/// Conditional entries kept unique by identity key and iterated in key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySet<T> {
    entries: BTreeMap<String, ConditionalEntry<T>>,
}

impl<T> Default for EntrySet<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: EntryKey> EntrySet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any entry with the same identity.
    /// Returns the replaced entry.
    pub fn insert(&mut self, entry: ConditionalEntry<T>) -> Option<ConditionalEntry<T>> {
        self.entries.insert(entry.key(), entry)
    }

    /// Insert an entry only if no entry with the same identity exists.
    /// Returns true if it was inserted.
    pub fn insert_if_absent(&mut self, entry: ConditionalEntry<T>) -> bool {
        match self.entries.entry(entry.key()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name_key(name))
    }

    pub fn get(&self, name: &str) -> Option<&ConditionalEntry<T>> {
        self.entries.get(&name_key(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<ConditionalEntry<T>> {
        self.entries.remove(&name_key(name))
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&ConditionalEntry<T>) -> bool,
    {
        self.entries.retain(|_, entry| keep(entry));
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConditionalEntry<T>> {
        self.entries.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.name())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: EntryKey> FromIterator<ConditionalEntry<T>> for EntrySet<T> {
    fn from_iter<I: IntoIterator<Item = ConditionalEntry<T>>>(iter: I) -> Self {
        let mut set = Self::new();
        for entry in iter {
            set.insert(entry);
        }
        set
    }
}

impl<T: EntryKey> Extend<ConditionalEntry<T>> for EntrySet<T> {
    fn extend<I: IntoIterator<Item = ConditionalEntry<T>>>(&mut self, iter: I) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

impl<T> IntoIterator for EntrySet<T> {
    type Item = ConditionalEntry<T>;
    type IntoIter = btree_map::IntoValues<String, ConditionalEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

impl<T: Serialize> Serialize for EntrySet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}

impl<'de, T: EntryKey + Deserialize<'de>> Deserialize<'de> for EntrySet<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<ConditionalEntry<T>>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
