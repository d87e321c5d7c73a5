// This file is part of Passgauge.
//
// Copyright (c) 2025  The Passgauge developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::sync::OnceLock;

const WEAK_PASSWORDS_DATA: &str = include_str!("../assets/weak_passwords.txt");
const COMMON_WORDS_DATA: &str = include_str!("../assets/common_words.txt");

#[cfg(test)]
const WEAK_PASSWORDS_SHA256: &str =
    "b203c00169fd175ee374996109f8ee4ab5a090bc14b8314ab1bd0bdbbac8ea59";
#[cfg(test)]
const COMMON_WORDS_SHA256: &str =
    "89957a8b6f8564f65ab9128b1a82e6d4ae57506057825db52bbcc220a7259d42";

/// Shorter entries are kept in the list but never matched.
pub const MIN_MATCH_LEN: usize = 3;

static DICTIONARY: OnceLock<Dictionary> = OnceLock::new();

/// Known weak passwords followed by common English words, deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    entries: Vec<&'static str>,
}

impl Dictionary {
    /// Builds a dictionary from lists scanned in the given order. The first
    /// occurrence of an entry wins.
    pub fn from_lists(lists: &[&[&'static str]]) -> Self {
        let mut entries: Vec<&'static str> = Vec::new();
        for word in lists.iter().flat_map(|list| list.iter()) {
            if !entries.contains(word) {
                entries.push(*word);
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[&'static str] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries eligible for substring matching, in scan order.
    pub fn matchable(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries
            .iter()
            .copied()
            .filter(|word| word.chars().count() >= MIN_MATCH_LEN)
    }
}

fn parse_list(data: &'static str) -> Vec<&'static str> {
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

pub fn weak_passwords() -> Vec<&'static str> {
    parse_list(WEAK_PASSWORDS_DATA)
}

pub fn common_words() -> Vec<&'static str> {
    parse_list(COMMON_WORDS_DATA)
}

pub fn dictionary() -> &'static Dictionary {
    DICTIONARY.get_or_init(|| {
        let weak = weak_passwords();
        let common = common_words();
        let dictionary = Dictionary::from_lists(&[weak.as_slice(), common.as_slice()]);
        log::debug!(
            "loaded dictionary: {} weak passwords, {} common words, {} unique entries",
            weak.len(),
            common.len(),
            dictionary.len()
        );
        dictionary
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};
    use std::collections::HashSet;

    fn sha256_hex(data: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data.as_bytes());
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    #[test]
    fn test_lists_loaded() {
        assert_eq!(weak_passwords().len(), 25);
        assert_eq!(common_words().len(), 83);
    }

    #[test]
    fn test_weak_passwords_integrity() {
        assert_eq!(
            sha256_hex(WEAK_PASSWORDS_DATA),
            WEAK_PASSWORDS_SHA256,
            "Weak password list SHA-256 mismatch; file may be corrupted"
        );
    }

    #[test]
    fn test_common_words_integrity() {
        assert_eq!(
            sha256_hex(COMMON_WORDS_DATA),
            COMMON_WORDS_SHA256,
            "Common word list SHA-256 mismatch; file may be corrupted"
        );
    }

    #[test]
    fn test_dictionary_deduplicated() {
        let dict = dictionary();
        assert_eq!(dict.len(), 95);

        let unique: HashSet<_> = dict.entries().iter().collect();
        assert_eq!(unique.len(), dict.len(), "Dictionary contains duplicates");
    }

    #[test]
    fn test_weak_passwords_scanned_first() {
        let dict = dictionary();
        assert_eq!(dict.entries()[0], "password");
        assert_eq!(dict.entries()[24], "sample");
        assert_eq!(dict.entries()[25], "the");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let first: &[&'static str] = &["her", "make", "her"];
        let second: &[&'static str] = &["make", "time"];
        let dict = Dictionary::from_lists(&[first, second]);
        assert_eq!(dict.entries(), &["her", "make", "time"]);
    }

    #[test]
    fn test_short_entries_are_inert() {
        let dict = dictionary();
        assert!(dict.entries().contains(&"so"));
        assert!(!dict.matchable().any(|w| w == "so"));
        assert_eq!(dict.matchable().count(), 94);
    }

    #[test]
    fn test_entries_are_lowercase() {
        for word in dictionary().entries() {
            assert_eq!(*word, word.to_lowercase(), "Entry {:?} is not lowercase", word);
        }
    }
}
