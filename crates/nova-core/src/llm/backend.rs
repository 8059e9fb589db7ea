//! Model alias table used to switch the local backend's active model.

use nova_types::error::ModelSwitchError;
use nova_types::intent::ModelAlias;

/// Immutable, ordered alias → model mapping loaded at startup.
///
/// Order matters twice: error messages list aliases in table order, and
/// [`ModelAliasTable::find_in`] returns the first alias found in an utterance.
#[derive(Debug, Clone, Default)]
pub struct ModelAliasTable {
    entries: Vec<ModelAlias>,
}

impl ModelAliasTable {
    pub fn new(entries: Vec<ModelAlias>) -> Self {
        Self { entries }
    }

    /// Backend model identifier for `alias`, if registered.
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.alias == alias)
            .map(|entry| entry.model.as_str())
    }

    /// Like [`resolve`](Self::resolve) but produces the user-facing miss error.
    pub fn lookup(&self, alias: &str) -> Result<&str, ModelSwitchError> {
        self.resolve(alias)
            .ok_or_else(|| ModelSwitchError::AliasNotFound {
                alias: alias.to_string(),
                available: self.aliases().map(str::to_string).collect(),
            })
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.alias.as_str())
    }

    pub fn entries(&self) -> &[ModelAlias] {
        &self.entries
    }

    /// First alias, in table order, that occurs as a substring of `text`.
    pub fn find_in(&self, text: &str) -> Option<&str> {
        self.aliases().find(|alias| text.contains(alias))
    }
}
