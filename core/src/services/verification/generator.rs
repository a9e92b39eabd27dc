//! One-time code generation

use rand::Rng;

use crate::domain::entities::verification_record::CODE_LENGTH;

/// Produces fixed-length numeric one-time codes
pub trait CodeGenerator: Send + Sync {
    /// Generate a code of exactly `CODE_LENGTH` ASCII digits
    fn generate(&self) -> String;
}

/// Uniformly random 6-digit codes from the thread-local RNG
///
/// Guessing inside the validity window is bounded by the attempt policy, not by
/// the generator, so a non-cryptographic source is acceptable here.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        let code: u32 = rng.gen_range(0..10u32.pow(CODE_LENGTH as u32));
        format!("{:0width$}", code, width = CODE_LENGTH)
    }
}

/// Always returns the same code
///
/// For tests and demo environments where the code must be known up front.
#[derive(Debug, Clone)]
pub struct FixedCodeGenerator {
    code: String,
}

impl FixedCodeGenerator {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self) -> String {
        self.code.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_random_codes_are_six_digits() {
        let pattern = Regex::new(r"^\d{6}$").unwrap();
        let generator = RandomCodeGenerator;

        for _ in 0..10_000 {
            let code = generator.generate();
            assert!(pattern.is_match(&code), "unexpected code: {}", code);
        }
    }

    #[test]
    fn test_random_codes_vary() {
        let generator = RandomCodeGenerator;
        let codes: std::collections::HashSet<String> =
            (0..100).map(|_| generator.generate()).collect();
        assert!(codes.len() > 90);
    }

    #[test]
    fn test_fixed_generator() {
        let generator = FixedCodeGenerator::new("482913");
        assert_eq!(generator.generate(), "482913");
        assert_eq!(generator.generate(), "482913");
    }
}
