use crate::entities::{IdentityFormat, MatchKeySet};

use super::{identity_normalizer::IdentityNormalizer, utils::digits_only};

/// Owner keys were written inconsistently by older clients and by the
/// upstream bot (raw input, bare digits, with and without the country code or
/// suffix). Reads match all of them; writes only ever use the canonical form.
pub struct SearchTermExpander<'a> {
    format: &'a IdentityFormat,
}

impl<'a> SearchTermExpander<'a> {
    pub fn new(format: &'a IdentityFormat) -> Self {
        Self { format }
    }

    pub fn expand(&self, raw: &str) -> MatchKeySet {
        let normalizer = IdentityNormalizer::new(self.format);
        let raw = raw.trim();
        let digits = digits_only(normalizer.strip_suffix(raw));

        let mut candidates = vec![raw.to_string()];
        if !digits.is_empty() {
            let local = digits
                .strip_prefix(self.format.country_code.as_str())
                .unwrap_or(digits.as_str());
            candidates.push(digits.clone());
            candidates.push(format!("{}{}", self.format.country_code, local));
            candidates.push(format!("{}@{}", digits, self.format.domain_suffix));
        }
        if let Ok(canonical) = normalizer.normalize(raw) {
            candidates.push(canonical.to_string());
        }
        MatchKeySet::from_candidates(candidates)
    }
}
