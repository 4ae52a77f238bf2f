use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

const MIN_PASSWORD_LENGTH: usize = 6;
const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

static EMAIL_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Basic `local@domain.tld` check with no whitespace anywhere.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordCheck {
    pub is_valid: bool,
    pub strength: PasswordStrength,
    pub message: String,
}

/// Classifies a password by length and character variety.
///
/// Anything shorter than six characters is invalid. Longer passwords are
/// scored by how many of uppercase, lowercase, digit and symbol they contain.
#[must_use]
pub fn validate_password(password: &str) -> PasswordCheck {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return PasswordCheck {
            is_valid: false,
            strength: PasswordStrength::Weak,
            message: format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        };
    }

    let classes = [
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)),
    ];
    let score = classes.iter().filter(|present| **present).count();

    let strength = match score {
        n if n >= 3 => PasswordStrength::Strong,
        2 => PasswordStrength::Medium,
        _ => PasswordStrength::Weak,
    };

    PasswordCheck {
        is_valid: true,
        strength,
        message: format!("Password strength: {strength}"),
    }
}
