use std::fmt;

use rand_core::{OsRng, RngCore};
use thiserror::Error;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntropyError {
    #[error("token width must be at least one bit")]
    ZeroWidth,
}

/// A raw bearer token. Handed out exactly once by the credential store;
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// Draw `bits` random bits from the OS CSPRNG and render the resulting
/// integer in lowercase base-36.
pub fn generate(bits: u32) -> Result<Token, EntropyError> {
    if bits == 0 {
        return Err(EntropyError::ZeroWidth);
    }

    let mut bytes = vec![0u8; bits.div_ceil(8) as usize];
    OsRng.fill_bytes(&mut bytes);

    // Mask off the high bits beyond the requested width.
    let excess = bytes.len() as u32 * 8 - bits;
    bytes[0] &= 0xff >> excess;

    Ok(Token(to_base36(bytes)))
}

/// Big-endian magnitude to base-36 by repeated long division.
fn to_base36(mut magnitude: Vec<u8>) -> String {
    let mut start = magnitude
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(magnitude.len());
    let mut digits = Vec::new();

    while start < magnitude.len() {
        let mut remainder: u32 = 0;
        for byte in &mut magnitude[start..] {
            let acc = (remainder << 8) | u32::from(*byte);
            *byte = (acc / 36) as u8;
            remainder = acc % 36;
        }
        digits.push(BASE36_DIGITS[remainder as usize]);

        while start < magnitude.len() && magnitude[start] == 0 {
            start += 1;
        }
    }

    if digits.is_empty() {
        return "0".to_string();
    }
    digits.iter().rev().map(|&d| d as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base36_u128(mut n: u128) -> String {
        if n == 0 {
            return "0".to_string();
        }
        let mut out = Vec::new();
        while n > 0 {
            out.push(BASE36_DIGITS[(n % 36) as usize] as char);
            n /= 36;
        }
        out.iter().rev().collect()
    }

    #[test]
    fn base36_small_values() {
        assert_eq!(to_base36(vec![]), "0");
        assert_eq!(to_base36(vec![0, 0]), "0");
        assert_eq!(to_base36(vec![35]), "z");
        assert_eq!(to_base36(vec![36]), "10");
        assert_eq!(to_base36(vec![1, 0]), "74");
    }

    #[test]
    fn base36_matches_native_arithmetic() {
        for n in [1u128, 255, 46_655, 46_656, u64::MAX as u128, u128::MAX] {
            let bytes = n.to_be_bytes().to_vec();
            assert_eq!(to_base36(bytes), base36_u128(n), "value {n}");
        }
    }

    #[test]
    fn generated_tokens_use_the_alphabet() {
        let token = generate(256).unwrap();
        assert!(!token.as_str().is_empty());
        // 256 bits never need more than 50 base-36 digits.
        assert!(token.as_str().len() <= 50);
        assert!(token.as_str().bytes().all(|b| BASE36_DIGITS.contains(&b)));
        assert!(token.as_str() == "0" || !token.as_str().starts_with('0'));
    }

    #[test]
    fn generated_tokens_differ() {
        let a = generate(256).unwrap();
        let b = generate(256).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn width_is_respected() {
        for _ in 0..32 {
            let token = generate(1).unwrap();
            assert!(token.as_str() == "0" || token.as_str() == "1");

            // 12 bits tops out at 4095 = "35r".
            let token = generate(12).unwrap();
            assert!(token.as_str().len() <= 3);
        }
    }

    #[test]
    fn zero_width_rejected() {
        assert_eq!(generate(0), Err(EntropyError::ZeroWidth));
    }

    #[test]
    fn debug_redacts_value() {
        let token = generate(64).unwrap();
        assert_eq!(format!("{:?}", token), "Token(<redacted>)");
    }
}
