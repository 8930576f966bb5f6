//! Known top-level domain tables and membership lookups.
//!
//! Two frozen sets back the domain decomposer: generic TLDs (`com`, `dev`,
//! `xn--p1ai`, ...) and two-letter country-code TLDs (`tr`, `uk`, ...).
//! Both are built once on first use and only ever read afterwards, so they
//! can be shared freely between threads.

mod data;

use std::collections::HashSet;

use data::{COUNTRY_TLDS, GENERIC_TLDS};

lazy_static::lazy_static! {
    static ref GENERIC_SET: HashSet<&'static str> = GENERIC_TLDS.iter().copied().collect();
    static ref COUNTRY_SET: HashSet<&'static str> = COUNTRY_TLDS.iter().copied().collect();
}

/// Which suffix table to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuffixTable {
    /// Generic and sponsored top-level domains
    Generic,
    /// Two-letter country-code top-level domains
    Country,
}

impl SuffixTable {
    /// Membership test. Labels are expected to be lowercase ASCII.
    pub fn contains(&self, label: &str) -> bool {
        self.set().contains(label)
    }

    /// Number of entries in this table.
    pub fn len(&self) -> usize {
        self.set().len()
    }

    /// Always false; the tables are compiled in.
    pub fn is_empty(&self) -> bool {
        self.set().is_empty()
    }

    fn set(&self) -> &'static HashSet<&'static str> {
        match self {
            SuffixTable::Generic => &GENERIC_SET,
            SuffixTable::Country => &COUNTRY_SET,
        }
    }
}

impl std::fmt::Display for SuffixTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuffixTable::Generic => write!(f, "generic"),
            SuffixTable::Country => write!(f, "country-code"),
        }
    }
}

/// Whether `label` is a known generic TLD.
pub fn is_generic_tld(label: &str) -> bool {
    SuffixTable::Generic.contains(label)
}

/// Whether `label` is a known country-code TLD.
pub fn is_country_tld(label: &str) -> bool {
    SuffixTable::Country.contains(label)
}

/// Get every known suffix label from both tables.
///
/// # Returns
///
/// Deduplicated, alphabetically sorted vector of TLD strings.
pub fn get_all_known_tlds() -> Vec<String> {
    let mut tlds: Vec<String> = GENERIC_SET
        .union(&COUNTRY_SET)
        .map(|tld| tld.to_string())
        .collect();
    tlds.sort();
    tlds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_membership() {
        assert!(is_generic_tld("com"));
        assert!(is_generic_tld("dev"));
        assert!(is_generic_tld("app"));
        assert!(!is_generic_tld("randomwrongtld"));
        assert!(!is_generic_tld(""));
    }

    #[test]
    fn test_country_membership() {
        assert!(is_country_tld("tr"));
        assert!(is_country_tld("uk"));
        assert!(is_country_tld("de"));
        assert!(is_country_tld("fi"));
        assert!(!is_country_tld("com"));
        assert!(!is_country_tld("randomwrongctld"));
    }

    #[test]
    fn test_country_codes_are_two_letters() {
        for tld in COUNTRY_TLDS {
            assert_eq!(tld.len(), 2, "country code '{}' is not two letters", tld);
        }
    }

    #[test]
    fn test_tables_are_lowercase() {
        for tld in GENERIC_TLDS.iter().chain(COUNTRY_TLDS) {
            assert_eq!(*tld, tld.to_ascii_lowercase());
        }
    }

    #[test]
    fn test_punycode_entries_present() {
        assert!(GENERIC_TLDS.iter().any(|tld| tld.starts_with("xn--")));
    }

    #[test]
    fn test_all_known_tlds_sorted_and_deduplicated() {
        let tlds = get_all_known_tlds();
        let mut sorted = tlds.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(tlds, sorted);
        assert!(tlds.len() >= SuffixTable::Generic.len());
        assert!(tlds.contains(&"tr".to_string()));
        assert!(tlds.contains(&"com".to_string()));
    }
}
