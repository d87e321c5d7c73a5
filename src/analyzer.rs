use crate::wordlist::{Dictionary, dictionary};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?~`";

pub const MIN_LENGTH: usize = 12;
pub const SHORT_LENGTH: usize = 8;
pub const LONG_BONUS_LENGTH: usize = 16;
pub const EXTRA_LONG_BONUS_LENGTH: usize = 20;
pub const SHORT_PENALTY: u32 = 2;
pub const MAX_RAW_SCORE: u32 = 10;
pub const MIN_REPEAT_RUN: usize = 3;

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";
const DIGIT_RUN: &str = "1234567890";

const LOWERCASE_CHARSET: u32 = 26;
const UPPERCASE_CHARSET: u32 = 26;
const DIGIT_CHARSET: u32 = 10;
const SYMBOL_CHARSET: u32 = 32;

pub const ALL_PASSED_MESSAGE: &str = "Excellent! Your password is very strong.";

static SEQUENCES: OnceLock<HashSet<String>> = OnceLock::new();

/// Every window of three consecutive letters ("abc".."xyz") or digits ("123".."890").
fn sequences() -> &'static HashSet<String> {
    SEQUENCES.get_or_init(|| {
        [ALPHABET, DIGIT_RUN]
            .iter()
            .flat_map(|run| {
                let chars: Vec<char> = run.chars().collect();
                chars
                    .windows(3)
                    .map(|w| w.iter().collect::<String>())
                    .collect::<Vec<_>>()
            })
            .collect()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Strength {
    #[serde(rename = "Very Weak")]
    VeryWeak,
    Weak,
    Fair,
    Good,
    Strong,
    #[serde(rename = "Very Strong")]
    VeryStrong,
}

/// Colour bucket a caller renders a strength with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Green,
    LightGreen,
    Blue,
    Yellow,
    Orange,
    Red,
}

impl Strength {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Strength::VeryStrong
        } else if score >= 75.0 {
            Strength::Strong
        } else if score >= 60.0 {
            Strength::Good
        } else if score >= 40.0 {
            Strength::Fair
        } else if score >= 20.0 {
            Strength::Weak
        } else {
            Strength::VeryWeak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strength::VeryWeak => "Very Weak",
            Strength::Weak => "Weak",
            Strength::Fair => "Fair",
            Strength::Good => "Good",
            Strength::Strong => "Strong",
            Strength::VeryStrong => "Very Strong",
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            Strength::VeryStrong => Tier::Green,
            Strength::Strong => Tier::LightGreen,
            Strength::Good => Tier::Blue,
            Strength::Fair => Tier::Yellow,
            Strength::Weak => Tier::Orange,
            Strength::VeryWeak => Tier::Red,
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    Length,
    Uppercase,
    Lowercase,
    Numbers,
    Symbols,
    CommonWords,
    RepeatedChars,
    Sequential,
}

impl CheckKind {
    /// Canonical order used for scoring, feedback and display.
    pub const ALL: [CheckKind; 8] = [
        CheckKind::Length,
        CheckKind::Uppercase,
        CheckKind::Lowercase,
        CheckKind::Numbers,
        CheckKind::Symbols,
        CheckKind::CommonWords,
        CheckKind::RepeatedChars,
        CheckKind::Sequential,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::Length => "At least 12 characters",
            CheckKind::Uppercase => "Uppercase letters",
            CheckKind::Lowercase => "Lowercase letters",
            CheckKind::Numbers => "Numbers",
            CheckKind::Symbols => "Special characters",
            CheckKind::CommonWords => "No common words",
            CheckKind::RepeatedChars => "No repeated characters",
            CheckKind::Sequential => "No sequential characters",
        }
    }

    pub fn remediation(&self) -> &'static str {
        match self {
            CheckKind::Length => "Use at least 12 characters",
            CheckKind::Uppercase => "Add uppercase letters",
            CheckKind::Lowercase => "Add lowercase letters",
            CheckKind::Numbers => "Add numbers",
            CheckKind::Symbols => "Add special characters",
            CheckKind::CommonWords => "Avoid common words",
            CheckKind::RepeatedChars => "Avoid repeated characters",
            CheckKind::Sequential => "Avoid sequential characters",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checks {
    pub length: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub numbers: bool,
    pub symbols: bool,
    pub common_words: bool,
    pub repeated_chars: bool,
    pub sequential: bool,
}

impl Checks {
    pub fn get(&self, kind: CheckKind) -> bool {
        match kind {
            CheckKind::Length => self.length,
            CheckKind::Uppercase => self.uppercase,
            CheckKind::Lowercase => self.lowercase,
            CheckKind::Numbers => self.numbers,
            CheckKind::Symbols => self.symbols,
            CheckKind::CommonWords => self.common_words,
            CheckKind::RepeatedChars => self.repeated_chars,
            CheckKind::Sequential => self.sequential,
        }
    }

    /// Each check paired with its outcome, in canonical order.
    pub fn results(&self) -> [(CheckKind, bool); 8] {
        CheckKind::ALL.map(|kind| (kind, self.get(kind)))
    }

    pub fn passed(&self) -> u32 {
        self.results().into_iter().filter(|(_, ok)| *ok).count() as u32
    }

    pub fn all_passed(&self) -> bool {
        self.passed() == CheckKind::ALL.len() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub score: f64,
    pub strength: Strength,
    pub feedback: Vec<String>,
    pub checks: Checks,
    pub dictionary_words: Vec<String>,
    pub entropy: f64,
    #[serde(skip)]
    raw_score: u32,
    #[serde(skip)]
    charset_size: u32,
    #[serde(skip)]
    length: usize,
}

impl Analysis {
    /// Integer tally in `0..=10` before normalization.
    pub fn raw_score(&self) -> u32 {
        self.raw_score
    }

    pub fn charset_size(&self) -> u32 {
        self.charset_size
    }

    /// Length in characters, not bytes.
    pub fn length(&self) -> usize {
        self.length
    }
}

fn is_symbol(c: char) -> bool {
    SYMBOLS.contains(c)
}

fn has_repeated_run(password: &str) -> bool {
    let mut run = 0;
    let mut previous = None;

    for c in password.chars() {
        if Some(c) == previous {
            run += 1;
        } else {
            run = 1;
            previous = Some(c);
        }
        if run >= MIN_REPEAT_RUN {
            return true;
        }
    }

    false
}

/// Only ASCII letters fold, so no non-ASCII character can complete a run.
fn has_sequence(password: &str) -> bool {
    let table = sequences();
    let chars: Vec<char> = password.to_ascii_lowercase().chars().collect();
    chars
        .windows(3)
        .any(|w| table.contains(&w.iter().collect::<String>()))
}

pub fn charset_size(password: &str) -> u32 {
    let mut size = 0;
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        size += LOWERCASE_CHARSET;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        size += UPPERCASE_CHARSET;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        size += DIGIT_CHARSET;
    }
    if password.chars().any(is_symbol) {
        size += SYMBOL_CHARSET;
    }
    size
}

/// Bits of entropy as `length * log2(charset)`, zero when no class is present.
pub fn entropy(length: usize, charset_size: u32) -> f64 {
    length as f64 * f64::from(charset_size.max(1)).log2()
}

/// Tally before normalization: one point per passed check, length bonuses,
/// then the short-password penalty.
pub fn raw_score(checks: &Checks, length: usize) -> u32 {
    let mut score = checks.passed();

    if length >= LONG_BONUS_LENGTH {
        score += 1;
    }
    if length >= EXTRA_LONG_BONUS_LENGTH {
        score += 1;
    }

    if length < SHORT_LENGTH {
        score = score.saturating_sub(SHORT_PENALTY);
    }

    score
}

pub fn normalize_score(raw: u32) -> f64 {
    (f64::from(raw) / f64::from(MAX_RAW_SCORE) * 100.0).min(100.0)
}

pub fn feedback(checks: &Checks) -> Vec<String> {
    let mut feedback: Vec<String> = checks
        .results()
        .into_iter()
        .filter(|(_, ok)| !ok)
        .map(|(kind, _)| kind.remediation().to_string())
        .collect();

    if feedback.is_empty() {
        feedback.push(ALL_PASSED_MESSAGE.to_string());
    }

    feedback
}

pub struct Analyzer<'a> {
    dictionary: &'a Dictionary,
}

impl Default for Analyzer<'static> {
    fn default() -> Self {
        Self::new(dictionary())
    }
}

impl<'a> Analyzer<'a> {
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self { dictionary }
    }

    /// Entries found as case-insensitive substrings, in scan order.
    pub fn dictionary_matches(&self, password: &str) -> Vec<String> {
        let lowered = password.to_lowercase();
        self.dictionary
            .matchable()
            .filter(|word| lowered.contains(&word.to_lowercase()))
            .map(str::to_string)
            .collect()
    }

    pub fn analyze(&self, password: &str) -> Analysis {
        let length = password.chars().count();
        let dictionary_words = self.dictionary_matches(password);

        let checks = Checks {
            length: length >= MIN_LENGTH,
            uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            numbers: password.chars().any(|c| c.is_ascii_digit()),
            symbols: password.chars().any(is_symbol),
            common_words: dictionary_words.is_empty(),
            repeated_chars: !has_repeated_run(password),
            sequential: !has_sequence(password),
        };

        let charset_size = charset_size(password);
        let entropy = entropy(length, charset_size);

        let raw_score = if password.is_empty() {
            0
        } else {
            raw_score(&checks, length)
        };
        let score = normalize_score(raw_score);
        let strength = Strength::from_score(score);

        log::debug!(
            "analyzed {} chars: {}/{} checks, raw score {}, {:.1} bits, {} dictionary matches",
            length,
            checks.passed(),
            CheckKind::ALL.len(),
            raw_score,
            entropy,
            dictionary_words.len()
        );

        Analysis {
            score,
            strength,
            feedback: feedback(&checks),
            checks,
            dictionary_words,
            entropy,
            raw_score,
            charset_size,
            length,
        }
    }
}

pub fn analyze(password: &str) -> Analysis {
    Analyzer::default().analyze(password)
}
