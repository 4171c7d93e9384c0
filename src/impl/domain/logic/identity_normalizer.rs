use fractic_server_error::ServerError;

use crate::{
    entities::{CanonicalAddress, IdentityFormat},
    errors::InvalidIdentity,
};

use super::utils::digits_only;

/// Area code plus subscriber number.
const MIN_DIGITS: usize = 10;

pub struct IdentityNormalizer<'a> {
    format: &'a IdentityFormat,
}

impl<'a> IdentityNormalizer<'a> {
    pub fn new(format: &'a IdentityFormat) -> Self {
        Self { format }
    }

    /// Derives the canonical address from free-form phone input. Inputs that
    /// already carry the domain suffix have it removed first, so normalizing
    /// an already canonical address returns it unchanged.
    pub fn normalize(&self, raw: &str) -> Result<CanonicalAddress, ServerError> {
        let trimmed = raw.trim();
        if self.is_canonical(trimmed) {
            return Ok(CanonicalAddress(trimmed.to_string()));
        }
        let digits = digits_only(self.strip_suffix(trimmed));
        if digits.len() < MIN_DIGITS {
            return Err(InvalidIdentity::new(raw));
        }
        Ok(CanonicalAddress(format!(
            "{}@{}",
            self.with_country_code(&digits),
            self.format.domain_suffix
        )))
    }

    /// True for `<country_code><digits>@<suffix>` with enough digits.
    pub fn is_canonical(&self, s: &str) -> bool {
        match s.strip_suffix(&format!("@{}", self.format.domain_suffix)) {
            Some(local) => {
                local.len() >= MIN_DIGITS
                    && local.starts_with(&self.format.country_code)
                    && local.chars().all(|c| c.is_ascii_digit())
            }
            None => false,
        }
    }

    pub(crate) fn strip_suffix<'s>(&self, s: &'s str) -> &'s str {
        s.strip_suffix(&format!("@{}", self.format.domain_suffix))
            .unwrap_or(s)
    }

    /// Prepends the country code unless the digits already start with it.
    pub(crate) fn with_country_code(&self, digits: &str) -> String {
        if digits.starts_with(&self.format.country_code) {
            digits.to_string()
        } else {
            format!("{}{}", self.format.country_code, digits)
        }
    }
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;

    fn normalize(raw: &str) -> Result<CanonicalAddress, ServerError> {
        IdentityNormalizer::new(&IdentityFormat::default()).normalize(raw)
    }

    #[test]
    fn prepends_country_code_and_suffix() {
        let address = normalize("(81) 99999-0000").unwrap();
        assert_eq!(address.as_str(), "5581999990000@s.whatsapp.net");
    }

    #[test]
    fn keeps_existing_country_code() {
        let address = normalize("+55 81 99999-0000").unwrap();
        assert_eq!(address.as_str(), "5581999990000@s.whatsapp.net");
    }

    #[test]
    fn canonical_input_is_returned_unchanged() {
        let canonical = "5581999990000@s.whatsapp.net";
        assert_eq!(normalize(canonical).unwrap().as_str(), canonical);
    }

    #[test]
    fn normalization_is_idempotent() {
        let shape = Regex::new(r"^55\d+@s\.whatsapp\.net$").unwrap();
        for raw in [
            "81999990000",
            "81 3333-4444",
            "+55 (11) 91234-5678",
            "5511912345678@s.whatsapp.net",
            "tel: 021 98765 4321",
        ] {
            let once = normalize(raw).unwrap();
            assert!(shape.is_match(once.as_str()), "bad shape for {raw}: {once}");
            let twice = normalize(once.as_str()).unwrap();
            assert_eq!(once, twice, "not idempotent for {raw}");
        }
    }

    #[test]
    fn rejects_inputs_with_fewer_than_ten_digits() {
        for raw in ["", "abc", "99999-000", "123456789", "123456789@s.whatsapp.net"] {
            assert!(normalize(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn detects_canonical_addresses() {
        let format = IdentityFormat::default();
        let normalizer = IdentityNormalizer::new(&format);
        assert!(normalizer.is_canonical("5581999990000@s.whatsapp.net"));
        assert!(!normalizer.is_canonical("81999990000@s.whatsapp.net"));
        assert!(!normalizer.is_canonical("5581999990000"));
        assert!(!normalizer.is_canonical("55819999-0000@s.whatsapp.net"));
    }

    #[test]
    fn honours_custom_format() {
        let format = IdentityFormat {
            country_code: "1".to_string(),
            domain_suffix: "c.us".to_string(),
        };
        let address = IdentityNormalizer::new(&format)
            .normalize("(415) 555-0100")
            .unwrap();
        assert_eq!(address.as_str(), "14155550100@c.us");
    }
}
