/// Password policy for new wallets.
use serde::Serialize;

use crate::error::{Result, VaultError};

/// Reject passwords shorter than `min_len` characters.
pub fn check_password(password: &str, min_len: usize) -> Result<()> {
    if password.chars().count() < min_len {
        return Err(VaultError::Validation(format!(
            "Password must be at least {min_len} characters"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StrengthLabel {
    Weak,
    KindaWeak,
    Strong,
    VeryStrong,
}

impl StrengthLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            StrengthLabel::Weak => "Weak",
            StrengthLabel::KindaWeak => "Kinda weak",
            StrengthLabel::Strong => "Strong",
            StrengthLabel::VeryStrong => "Very strong",
        }
    }
}

/// Heuristic score shown next to the password field, 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    pub score: u8,
    pub label: StrengthLabel,
}

impl PasswordStrength {
    pub fn evaluate(password: &str) -> Self {
        let len = password.chars().count();
        let mut score: u8 = 0;
        if len > 8 {
            score += 25;
        }
        if len > 12 {
            score += 25;
        }
        if password.chars().any(|c| c.is_ascii_uppercase()) {
            score += 15;
        }
        if password.chars().any(|c| c.is_ascii_digit()) {
            score += 15;
        }
        if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
            score += 20;
        }
        let score = score.min(100);

        let label = match score {
            s if s < 30 => StrengthLabel::Weak,
            s if s < 60 => StrengthLabel::KindaWeak,
            s if s < 80 => StrengthLabel::Strong,
            _ => StrengthLabel::VeryStrong,
        };
        Self { score, label }
    }
}
