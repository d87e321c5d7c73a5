use crate::random::{KeystreamSource, RandomSource, ThreadSource};
use zeroize::Zeroizing;

pub const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &[u8] = b"0123456789";
pub const SYMBOL_CLASS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

pub const CLASSES: [&[u8]; 4] = [LOWERCASE, UPPERCASE, DIGITS, SYMBOL_CLASS];

pub const PASSWORD_LENGTH: usize = 16;

fn alphabet() -> Vec<u8> {
    CLASSES.concat()
}

/// Generates a 16-character password with at least one lowercase letter,
/// uppercase letter, digit and symbol.
///
/// One character is forced from each class, the remaining twelve are drawn
/// from the union of all classes, and the result is shuffled with
/// Fisher–Yates so the forced characters land anywhere.
pub fn generate_with<R: RandomSource + ?Sized>(rng: &mut R) -> Zeroizing<String> {
    let alphabet = alphabet();
    let mut password_bytes = Zeroizing::new(Vec::with_capacity(PASSWORD_LENGTH));

    for class in CLASSES {
        password_bytes.push(class[rng.below(class.len())]);
    }

    while password_bytes.len() < PASSWORD_LENGTH {
        password_bytes.push(alphabet[rng.below(alphabet.len())]);
    }

    for i in (1..password_bytes.len()).rev() {
        let j = rng.below(i + 1);
        password_bytes.swap(i, j);
    }

    log::trace!(
        "generated {} characters from a {}-character alphabet",
        password_bytes.len(),
        alphabet.len()
    );

    // Every class is ASCII, so each byte is one char.
    let result: String = password_bytes.iter().map(|&b| char::from(b)).collect();

    Zeroizing::new(result)
}

pub fn generate() -> Zeroizing<String> {
    generate_with(&mut ThreadSource::new())
}

/// Reproducible variant: the same seed always yields the same password.
pub fn generate_seeded(seed: &[u8; 32]) -> Zeroizing<String> {
    generate_with(&mut KeystreamSource::new(seed))
}
