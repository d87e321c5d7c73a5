pub mod analyzer;
pub mod generator;
pub mod random;
pub mod wordlist;

pub use analyzer::{analyze, Analysis, Analyzer, CheckKind, Checks, Strength};
pub use generator::{generate, generate_seeded, generate_with};
pub use random::{KeystreamSource, RandomSource, ThreadSource};
pub use wordlist::{dictionary, Dictionary};
