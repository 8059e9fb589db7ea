use nova_types::intent::SiteEntry;

/// Ordered registry of openable sites.
#[derive(Debug, Clone, Default)]
pub struct SiteRegistry {
    entries: Vec<SiteEntry>,
}

impl SiteRegistry {
    pub fn new(entries: Vec<SiteEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&SiteEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// First entry, in registration order, whose key is a substring of `text`.
    pub fn first_match(&self, text: &str) -> Option<&SiteEntry> {
        self.entries.iter().find(|entry| text.contains(&entry.key))
    }

    pub fn entries(&self) -> &[SiteEntry] {
        &self.entries
    }
}
