//! Address blacklist
//!
//! Address → reason table with case-insensitive lookup. Loaded once at
//! startup; in production the seed entries are replaced by an external
//! blocklist feed.

use std::collections::HashMap;

/// Known-bad address table.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    entries: HashMap<String, String>,
}

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blacklist seeded with the bundled demonstration entries.
    pub fn with_seed_entries() -> Self {
        let mut list = Self::new();
        list.insert("0xscammer1", "Known phishing scam");
        list.insert("0xrugpuller", "Rugpull operator");
        list.insert("0xfakecex", "Fake centralized exchange impersonation");
        list
    }

    /// Add an address with the reason it is blocked. Addresses are stored
    /// lowercased.
    pub fn insert(&mut self, address: impl AsRef<str>, reason: impl Into<String>) {
        self.entries
            .insert(address.as_ref().to_lowercase(), reason.into());
    }

    /// Reason the address is blacklisted, if it is.
    pub fn lookup(&self, address: &str) -> Option<&str> {
        self.entries.get(&address.to_lowercase()).map(String::as_str)
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

    #[test]
    fn test_seed_entries() {
        let list = Blacklist::with_seed_entries();
        assert_eq!(list.len(), 3);
        assert_eq!(list.lookup("0xscammer1"), Some("Known phishing scam"));
        assert_eq!(list.lookup("0xrugpuller"), Some("Rugpull operator"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let list = Blacklist::with_seed_entries();
        assert_eq!(list.lookup("0xSCAMMER1"), Some("Known phishing scam"));
        assert_eq!(list.lookup("0xScAmMeR1"), Some("Known phishing scam"));
    }

    #[test]
    fn test_unknown_address() {
        let list = Blacklist::with_seed_entries();
        assert!(list.lookup("0xhonest").is_none());
    }

    #[test]
    fn test_caller_added_entry() {
        let mut list = Blacklist::new();
        assert!(list.is_empty());
        list.insert("0xDrainer", "Wallet drainer cluster");
        assert_eq!(list.lookup("0xdrainer"), Some("Wallet drainer cluster"));
    }
}
