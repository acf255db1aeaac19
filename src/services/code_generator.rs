//! Short code generation
//!
//! Validates caller-preferred codes or draws random ones from the configured
//! alphabet. Generation never claims a code: the registry's `create` is the only
//! place a code is claimed, so a code returned by `generate` can still lose a
//! race and fail with `CodeConflict` on insertion.

use tracing::{trace, warn};

use crate::config::LinkSettings;
use crate::errors::{CodeError, ShortlyError};
use crate::storage::LinkRegistry;
use crate::utils::{generate_random_code, is_valid_short_code};

#[derive(Debug, Clone)]
pub struct CodeGenerator {
    alphabet: Vec<char>,
    random_length: usize,
    max_attempts: usize,
    min_length: usize,
    max_length: usize,
    reserved: Vec<String>,
}

impl CodeGenerator {
    pub fn new(settings: &LinkSettings) -> Self {
        Self {
            alphabet: settings.alphabet.chars().collect(),
            random_length: settings.random_code_length,
            max_attempts: settings.max_generation_attempts,
            min_length: settings.min_code_length,
            max_length: settings.max_code_length,
            reserved: settings.reserved_codes.clone(),
        }
    }

    /// Produce a code that is free in `registry` at the time of the call
    pub fn generate(
        &self,
        registry: &LinkRegistry,
        preferred_code: Option<&str>,
    ) -> Result<String, CodeError> {
        match preferred_code {
            Some(code) => self.check_preferred(registry, code),
            None => self.generate_random(registry),
        }
    }

    fn check_preferred(&self, registry: &LinkRegistry, code: &str) -> Result<String, CodeError> {
        if !is_valid_short_code(code, self.min_length, self.max_length) {
            return Err(ShortlyError::invalid_code(format!(
                "Invalid short code '{}'. Use {}-{} letters, digits, '-' or '_'.",
                code, self.min_length, self.max_length
            )));
        }
        if self.is_reserved(code) {
            return Err(ShortlyError::invalid_code(format!(
                "Short code '{}' is reserved",
                code
            )));
        }
        if registry.contains(code) {
            return Err(ShortlyError::code_conflict(format!(
                "Short code '{}' is already in use",
                code
            )));
        }
        Ok(code.to_string())
    }

    fn generate_random(&self, registry: &LinkRegistry) -> Result<String, CodeError> {
        for attempt in 1..=self.max_attempts {
            let code = generate_random_code(&self.alphabet, self.random_length);
            if !self.is_reserved(&code) && !registry.contains(&code) {
                return Ok(code);
            }
            trace!("CodeGenerator: attempt {} collided on '{}'", attempt, code);
        }

        warn!(
            "CodeGenerator: no free code after {} attempts ({} links registered)",
            self.max_attempts,
            registry.len()
        );
        Err(ShortlyError::generation_exhausted(format!(
            "No free short code found after {} attempts",
            self.max_attempts
        )))
    }

    fn is_reserved(&self, code: &str) -> bool {
        self.reserved.iter().any(|r| r == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> LinkSettings {
        LinkSettings::default()
    }

    #[test]
    fn test_random_code_shape() {
        let generator = CodeGenerator::new(&settings());
        let registry = LinkRegistry::new();
        let alphabet = settings().alphabet;

        let code = generator.generate(&registry, None).unwrap();
        assert_eq!(code.chars().count(), 6);
        assert!(code.chars().all(|c| alphabet.contains(c)));
    }

    #[test]
    fn test_preferred_code_accepted() {
        let generator = CodeGenerator::new(&settings());
        let registry = LinkRegistry::new();
        assert_eq!(
            generator.generate(&registry, Some("my-link_1")).unwrap(),
            "my-link_1"
        );
        // not claimed
        assert!(registry.is_empty());
    }

    #[test]
    fn test_preferred_code_rejected() {
        let generator = CodeGenerator::new(&settings());
        let registry = LinkRegistry::new();

        let too_long = "x".repeat(21);
        for bad in ["ab", "with space", "slash/es", too_long.as_str()] {
            assert!(
                matches!(
                    generator.generate(&registry, Some(bad)),
                    Err(ShortlyError::InvalidCode(_))
                ),
                "{} should be invalid",
                bad
            );
        }
    }

    #[test]
    fn test_preferred_code_conflict() {
        let generator = CodeGenerator::new(&settings());
        let registry = LinkRegistry::new();
        registry.create("https://example.com", "taken", None).unwrap();

        assert!(matches!(
            generator.generate(&registry, Some("taken")),
            Err(ShortlyError::CodeConflict(_))
        ));
    }

    #[test]
    fn test_reserved_codes_are_never_handed_out() {
        let settings = LinkSettings {
            alphabet: "ab".to_string(),
            random_code_length: 1,
            max_generation_attempts: 64,
            reserved_codes: vec!["api".to_string(), "a".to_string()],
            ..LinkSettings::default()
        };
        let generator = CodeGenerator::new(&settings);
        let registry = LinkRegistry::new();

        assert!(matches!(
            generator.generate(&registry, Some("api")),
            Err(ShortlyError::InvalidCode(_))
        ));
        assert_eq!(generator.generate(&registry, None).unwrap(), "b");
    }

    #[test]
    fn test_exhaustion_when_space_is_full() {
        let settings = LinkSettings {
            alphabet: "ab".to_string(),
            random_code_length: 1,
            max_generation_attempts: 64,
            ..LinkSettings::default()
        };
        let generator = CodeGenerator::new(&settings);
        let registry = LinkRegistry::new();
        registry.create("https://example.com", "a", None).unwrap();

        // one code left
        assert_eq!(generator.generate(&registry, None).unwrap(), "b");

        registry.create("https://example.com", "b", None).unwrap();
        assert!(matches!(
            generator.generate(&registry, None),
            Err(ShortlyError::GenerationExhausted(_))
        ));
    }
}
