//! Generated display labels.
//!
//! The schematic carries a few cosmetic identifiers (tap numbers, output ids). They come from a
//! [`LabelSource`], so the layout engine stays deterministic for a given label sequence.
//! [`LabelGenerator`] is the default source, backed by a seeded `ChaCha8Rng`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Format of a generated label.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LabelKind {
    /// `n` followed by an integer in `10000..=999999`, e.g. `n48213`.
    NumericPrefix,
    /// `E` followed by an integer in `10000..=99999999`, e.g. `E1200345`.
    LetterPrefix,
    /// `logic` followed by an integer in `1000..=9999`, `_` and a digit in `1..=9`, e.g. `logic4821_3`.
    LogicSuffix,
}

/// Anything able to produce label text on request.
pub trait LabelSource {
    fn generate(&mut self, kind: LabelKind) -> String;
}

impl<S: LabelSource + ?Sized> LabelSource for &mut S {
    fn generate(&mut self, kind: LabelKind) -> String {
        (**self).generate(kind)
    }
}

/// Pseudo-random label generator.
///
/// Sequences are reproducible only when the generator is built with an explicit seed:
///
/// ```
/// use logic_schema::label::{LabelGenerator, LabelKind, LabelSource};
///
/// let mut a = LabelGenerator::with_seed(42);
/// let mut b = LabelGenerator::with_seed(42);
/// assert_eq!(a.generate(LabelKind::LogicSuffix), b.generate(LabelKind::LogicSuffix));
/// ```
#[derive(Debug, Clone)]
pub struct LabelGenerator {
    rng: ChaCha8Rng,
}

impl LabelGenerator {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from the thread-local entropy source.
    ///
    /// Intended for interactive use only; label sequences are not reproducible.
    pub fn from_entropy() -> Self {
        Self::with_seed(rand::random())
    }

    fn numeric_prefix(&mut self) -> String {
        format!("n{}", self.rng.random_range(10_000..=999_999))
    }

    fn letter_prefix(&mut self) -> String {
        format!("E{}", self.rng.random_range(10_000..=99_999_999))
    }

    fn logic_suffix(&mut self) -> String {
        let main = self.rng.random_range(1_000..=9_999);
        let suffix = self.rng.random_range(1..=9);
        format!("logic{}_{}", main, suffix)
    }
}

impl LabelSource for LabelGenerator {
    fn generate(&mut self, kind: LabelKind) -> String {
        match kind {
            LabelKind::NumericPrefix => self.numeric_prefix(),
            LabelKind::LetterPrefix => self.letter_prefix(),
            LabelKind::LogicSuffix => self.logic_suffix(),
        }
    }
}

/// Label source replaying fixed text, one per request, cycling through the list.
///
/// Useful where the exact label strings matter, e.g. golden tests.
#[derive(Debug, Clone)]
pub struct FixedLabels {
    labels: Vec<String>,
    next: usize,
}

impl FixedLabels {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            next: 0,
        }
    }
}

impl LabelSource for FixedLabels {
    fn generate(&mut self, _kind: LabelKind) -> String {
        if self.labels.is_empty() {
            return String::new();
        }
        let label = self.labels[self.next % self.labels.len()].clone();
        self.next += 1;
        label
    }
}
