//! Column-name recognition for domain ranges and text formats.
//!
//! Names are split into lowercase tokens (on separators and camelCase
//! boundaries). Short, ambiguous keywords such as `age` or `rate` must match a
//! whole token so `page_count` or `generated_at` are not misread; longer
//! keywords such as `salary` or `email` may also appear inside a token.

use std::sync::OnceLock;

use regex::Regex;

/// Plausibility range implied by a numeric column's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericDomain {
    /// Percentages and rates: [0, 100]
    Percentage,
    /// Human age in years: [0, 120]
    Age,
    /// Salaries, incomes and prices: [0, 1,000,000]
    Monetary,
}

impl NumericDomain {
    /// Recognizes a domain from a column name.
    ///
    /// Percentage is checked first so `percentage` never reads as an age.
    pub fn detect(column_name: &str) -> Option<Self> {
        let name = NameTokens::new(column_name);
        if name.any_token(&["rate", "pct"]) || name.contains_any(&["percentage", "percent"]) {
            Some(NumericDomain::Percentage)
        } else if name.any_token(&["age"]) {
            Some(NumericDomain::Age)
        } else if name.contains_any(&["salary", "income", "price"]) {
            Some(NumericDomain::Monetary)
        } else {
            None
        }
    }

    /// Inclusive plausible range.
    pub fn range(&self) -> (f64, f64) {
        match self {
            NumericDomain::Percentage => (0.0, 100.0),
            NumericDomain::Age => (0.0, 120.0),
            NumericDomain::Monetary => (0.0, 1_000_000.0),
        }
    }
}

/// Text format implied by a text column's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    /// E-mail address
    Email,
    /// Phone number
    Phone,
}

impl TextFormat {
    /// Recognizes a format from a column name.
    pub fn detect(column_name: &str) -> Option<Self> {
        let name = NameTokens::new(column_name);
        if name.any_token(&["mail"]) || name.contains_any(&["email"]) {
            Some(TextFormat::Email)
        } else if name.any_token(&["tel", "cell"]) || name.contains_any(&["phone", "mobile"]) {
            Some(TextFormat::Phone)
        } else {
            None
        }
    }

    /// Format name as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            TextFormat::Email => "email",
            TextFormat::Phone => "phone",
        }
    }

    /// Returns true if the value is well formed for this format.
    pub fn matches(&self, value: &str) -> bool {
        let patterns = FormatPatterns::instance();
        let value = value.trim();
        match self {
            TextFormat::Email => patterns.email.is_match(value),
            TextFormat::Phone => {
                let digits = value.chars().filter(char::is_ascii_digit).count();
                patterns.phone.is_match(value) && (7..=15).contains(&digits)
            }
        }
    }
}

/// Pre-compiled format regexes.
///
/// Uses `OnceLock` for thread-safe lazy initialization.
struct FormatPatterns {
    email: Regex,
    phone: Regex,
}

impl FormatPatterns {
    fn instance() -> &'static Self {
        static PATTERNS: OnceLock<FormatPatterns> = OnceLock::new();
        PATTERNS.get_or_init(Self::compile)
    }

    #[allow(clippy::expect_used)]
    fn compile() -> Self {
        Self {
            email: Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$")
                .expect("Invalid email pattern"),
            phone: Regex::new(r"^\+?[0-9\s\-().]{7,20}$").expect("Invalid phone pattern"),
        }
    }
}

/// Lowercase tokens of a column name plus its joined lowercase form.
struct NameTokens {
    joined: String,
    tokens: Vec<String>,
}

impl NameTokens {
    fn new(name: &str) -> Self {
        let mut tokens: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut prev_lower = false;

        for ch in name.chars() {
            if !ch.is_alphanumeric() {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                prev_lower = false;
                continue;
            }
            if ch.is_uppercase() && prev_lower && !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
            current.extend(ch.to_lowercase());
        }
        if !current.is_empty() {
            tokens.push(current);
        }

        Self {
            joined: tokens.concat(),
            tokens,
        }
    }

    fn any_token(&self, words: &[&str]) -> bool {
        self.tokens.iter().any(|t| words.contains(&t.as_str()))
    }

    fn contains_any(&self, words: &[&str]) -> bool {
        words.iter().any(|w| self.joined.contains(w))
    }
}
