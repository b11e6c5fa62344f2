//! One-time auth code generation for email-based MFA.

use rand::Rng;

/// Length of the one-time auth code
pub const CODE_LENGTH: usize = 6;

/// Generates a random 6-digit auth code
///
/// The code is a uniformly distributed integer in `[0, 999999]`, zero-padded
/// to six digits, so leading zeros are preserved (`42` becomes `"000042"`).
pub fn generate_auth_code() -> String {
    let mut rng = rand::thread_rng();
    let code: u32 = rng.gen_range(0..1_000_000);
    format!("{:06}", code)
}

/// Checks that a code has the shape of a generated auth code
///
/// Exactly [`CODE_LENGTH`] ASCII decimal digits.
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_format() {
        for _ in 0..100 {
            let code = generate_auth_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));

            let num: u32 = code.parse().expect("Generated code should be a valid number");
            assert!(num < 1_000_000);
        }
    }

    #[test]
    fn test_code_uniqueness() {
        let codes: Vec<String> = (0..100).map(|_| generate_auth_code()).collect();

        // There should be at least some unique codes (extremely unlikely to get all same)
        let unique_count = codes.iter().collect::<std::collections::HashSet<_>>().len();
        assert!(unique_count > 1);
    }

    #[test]
    fn test_is_well_formed_code() {
        assert!(is_well_formed_code("000042"));
        assert!(is_well_formed_code("999999"));
        assert!(!is_well_formed_code(""));
        assert!(!is_well_formed_code("12345"));
        assert!(!is_well_formed_code("1234567"));
        assert!(!is_well_formed_code("12345a"));
    }
}
