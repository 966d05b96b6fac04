//! Random password generation.
//!
//! Each character class gets its own randomly drawn count, characters are
//! drawn with replacement, and the combined sequence is shuffled. With the
//! default config this always yields at least two digits and two symbols.

use crate::error::{PassError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::RangeInclusive;

const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%&*.";

/// A set of characters and how many of them to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClass {
    chars: Vec<char>,
    count: RangeInclusive<usize>,
}

impl CharClass {
    /// Create a class, rejecting ranges that cannot be drawn from.
    pub fn new(name: &str, chars: &str, count: RangeInclusive<usize>) -> Result<Self> {
        if count.start() > count.end() {
            return Err(PassError::InvalidConfig(format!(
                "{name} count range {}-{} has min greater than max",
                count.start(),
                count.end()
            )));
        }

        let mut set: Vec<char> = Vec::new();
        for ch in chars.chars() {
            if !set.contains(&ch) {
                set.push(ch);
            }
        }

        if set.is_empty() && *count.end() > 0 {
            return Err(PassError::InvalidConfig(format!(
                "{name} has no characters to draw from"
            )));
        }

        Ok(Self { chars: set, count })
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn count(&self) -> &RangeInclusive<usize> {
        &self.count
    }

    /// Whether `ch` belongs to this class.
    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    fn chars_string(&self) -> String {
        self.chars.iter().collect()
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut Vec<char>) {
        let n = rng.gen_range(self.count.clone());
        for _ in 0..n {
            out.push(self.chars[rng.gen_range(0..self.chars.len())]);
        }
    }
}

/// Generator settings: letters, symbols and digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordConfig {
    letters: CharClass,
    symbols: CharClass,
    digits: CharClass,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            letters: CharClass {
                chars: LETTERS.chars().collect(),
                count: 8..=10,
            },
            symbols: CharClass {
                chars: SYMBOLS.chars().collect(),
                count: 2..=4,
            },
            digits: CharClass {
                chars: DIGITS.chars().collect(),
                count: 2..=4,
            },
        }
    }
}

impl PasswordConfig {
    /// Build a config from explicit classes.
    pub fn new(letters: CharClass, symbols: CharClass, digits: CharClass) -> Self {
        Self {
            letters,
            symbols,
            digits,
        }
    }

    /// Change how many letters are drawn.
    pub fn with_letter_count(self, count: RangeInclusive<usize>) -> Result<Self> {
        let letters = CharClass::new("letters", &self.letters.chars_string(), count)?;
        Ok(Self { letters, ..self })
    }

    /// Change how many symbols are drawn.
    pub fn with_symbol_count(self, count: RangeInclusive<usize>) -> Result<Self> {
        let symbols = CharClass::new("symbols", &self.symbols.chars_string(), count)?;
        Ok(Self { symbols, ..self })
    }

    /// Change how many digits are drawn.
    pub fn with_digit_count(self, count: RangeInclusive<usize>) -> Result<Self> {
        let digits = CharClass::new("digits", &self.digits.chars_string(), count)?;
        Ok(Self { digits, ..self })
    }

    /// Replace the symbol alphabet.
    pub fn with_symbol_chars(self, chars: &str) -> Result<Self> {
        let symbols = CharClass::new("symbols", chars, self.symbols.count.clone())?;
        Ok(Self { symbols, ..self })
    }

    pub fn letters(&self) -> &CharClass {
        &self.letters
    }

    pub fn symbols(&self) -> &CharClass {
        &self.symbols
    }

    pub fn digits(&self) -> &CharClass {
        &self.digits
    }

    /// Shortest and longest password this config can produce.
    pub fn length_bounds(&self) -> (usize, usize) {
        let classes = [&self.letters, &self.symbols, &self.digits];
        let min = classes.iter().map(|c| *c.count.start()).sum();
        let max = classes.iter().map(|c| *c.count.end()).sum();
        (min, max)
    }
}

/// Generate a password from `config` using the supplied random source.
pub fn generate<R: Rng + ?Sized>(config: &PasswordConfig, rng: &mut R) -> String {
    let mut password = Vec::new();
    config.letters.draw(rng, &mut password);
    config.symbols.draw(rng, &mut password);
    config.digits.draw(rng, &mut password);

    password.shuffle(rng);
    password.into_iter().collect()
}

/// Generate a password using the thread-local RNG.
pub fn generate_password(config: &PasswordConfig) -> String {
    generate(config, &mut rand::thread_rng())
}

/// Parse `N` or `MIN-MAX` into a count range.
pub fn parse_count_range(s: &str) -> std::result::Result<RangeInclusive<usize>, String> {
    let parse = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|_| format!("'{s}' is not a count or MIN-MAX range"))
    };

    let range = match s.split_once('-') {
        Some((min, max)) => parse(min)?..=parse(max)?,
        None => {
            let n = parse(s)?;
            n..=n
        }
    };

    if range.start() > range.end() {
        return Err(format!("'{s}' has min greater than max"));
    }
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_bounds() {
        assert_eq!(PasswordConfig::default().length_bounds(), (12, 18));
    }

    #[test]
    fn test_fixed_counts() {
        let config = PasswordConfig::default()
            .with_letter_count(5..=5)
            .unwrap()
            .with_symbol_count(3..=3)
            .unwrap()
            .with_digit_count(0..=0)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let pw = generate(&config, &mut rng);

        assert_eq!(pw.chars().count(), 8);
        assert_eq!(pw.chars().filter(|c| config.symbols().contains(*c)).count(), 3);
        assert!(!pw.chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_char_class_dedups() {
        let class = CharClass::new("symbols", "!!@@", 1..=2).unwrap();
        assert_eq!(class.chars(), &['!', '@']);
    }

    #[test]
    fn test_empty_class_allowed_with_zero_count() {
        assert!(CharClass::new("symbols", "", 0..=0).is_ok());
        assert!(CharClass::new("symbols", "", 0..=1).is_err());
    }

    #[test]
    fn test_parse_count_range() {
        assert_eq!(parse_count_range("8-10"), Ok(8..=10));
        assert_eq!(parse_count_range("4"), Ok(4..=4));
        assert_eq!(parse_count_range(" 2 - 3 "), Ok(2..=3));
        assert!(parse_count_range("10-8").is_err());
        assert!(parse_count_range("x").is_err());
        assert!(parse_count_range("1-").is_err());
    }
}
