//! Return-code registry shared by every response.

use std::borrow::Cow;

/// A fixed integer code plus its human-readable description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnCode {
    pub code: i32,
    pub message: Cow<'static, str>,
}

impl ReturnCode {
    pub const SUCCESS: ReturnCode = ReturnCode::fixed(0, "success");
    pub const UNKNOWN_ERROR: ReturnCode = ReturnCode::fixed(160003, "unknown error");
    pub const INPUT_NULL: ReturnCode = ReturnCode::fixed(201000, "input is null");
    pub const INPUT_ILLEGAL: ReturnCode = ReturnCode::fixed(201001, "input illegal");
    pub const FUNCTION_NAME_ILLEGAL: ReturnCode =
        ReturnCode::fixed(201005, "function name undefined");

    const fn fixed(code: i32, message: &'static str) -> Self {
        Self {
            code,
            message: Cow::Borrowed(message),
        }
    }

    pub fn new(code: i32, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Self::SUCCESS.code
    }
}

impl std::fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            ReturnCode::SUCCESS,
            ReturnCode::UNKNOWN_ERROR,
            ReturnCode::INPUT_NULL,
            ReturnCode::INPUT_ILLEGAL,
            ReturnCode::FUNCTION_NAME_ILLEGAL,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a.code, b.code);
            }
        }
        assert!(ReturnCode::SUCCESS.is_success());
        assert!(!ReturnCode::UNKNOWN_ERROR.is_success());
    }
}
