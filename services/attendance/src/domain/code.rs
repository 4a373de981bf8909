use std::collections::HashSet;

use rand::RngExt;

use crate::error::AttendanceServiceError;

/// Invite code length in characters.
pub const INVITE_CODE_LEN: usize = 4;

/// Charset for invite codes (ASCII digits, so codes can be typed on a keypad).
pub const INVITE_CODE_CHARSET: &[u8] = b"0123456789";

/// Give up after this many draws. Equal to the size of the 4-digit space.
pub const INVITE_CODE_MAX_ATTEMPTS: u32 = 10_000;

/// Draws random codes until one is absent from the caller's set of taken codes.
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    len: usize,
    charset: &'static [u8],
    max_attempts: u32,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(INVITE_CODE_LEN, INVITE_CODE_CHARSET, INVITE_CODE_MAX_ATTEMPTS)
    }
}

impl CodeGenerator {
    pub fn new(len: usize, charset: &'static [u8], max_attempts: u32) -> Self {
        Self {
            len,
            charset,
            max_attempts,
        }
    }

    /// Returns a code not contained in `taken`, or `CodeSpaceExhausted` once
    /// `max_attempts` draws have all collided.
    pub fn generate(&self, taken: &HashSet<String>) -> Result<String, AttendanceServiceError> {
        let mut rng = rand::rng();
        for _ in 0..self.max_attempts {
            let code: String = (0..self.len)
                .map(|_| self.charset[rng.random_range(0..self.charset.len())] as char)
                .collect();
            if !taken.contains(&code) {
                return Ok(code);
            }
        }
        tracing::warn!(
            taken = taken.len(),
            attempts = self.max_attempts,
            "invite code space exhausted"
        );
        Err(AttendanceServiceError::CodeSpaceExhausted)
    }
}
