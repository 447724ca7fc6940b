//! Deterministic plan seeds
//!
//! A seed is a short content hash of the plan inputs. It is passed to the
//! narrative collaborator as a consistency key so that repeated identical
//! requests can receive identical prose. Not a security primitive.

use crate::models::PlanRequest;
use sha2::{Digest, Sha256};

/// Hex characters kept from the digest
pub const SEED_LENGTH: usize = 16;

const FIELD_SEPARATOR: &[u8] = b"\x1f";

/// Compute the seed for a set of plan inputs (pure, total)
pub fn compute_seed(goal: &str, target_amount: f64, years: f64, monthly_income: f64) -> String {
    let mut hasher = Sha256::new();

    hasher.update(goal.as_bytes());
    for value in [target_amount, years, monthly_income] {
        hasher.update(FIELD_SEPARATOR);
        hasher.update(value.to_string().as_bytes());
    }

    let mut encoded = hex::encode(hasher.finalize());
    encoded.truncate(SEED_LENGTH);
    encoded
}

/// Convenience wrapper over [`compute_seed`] for a whole request
pub fn seed_for_request(request: &PlanRequest) -> String {
    compute_seed(
        &request.goal,
        request.target_amount,
        request.years,
        request.monthly_income,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_deterministic() {
        let a = compute_seed("Car", 500000.0, 3.0, 80000.0);
        let b = compute_seed("Car", 500000.0, 3.0, 80000.0);
        assert_eq!(a, b);
        assert_eq!(a.len(), SEED_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_any_field_change_changes_seed() {
        let base = compute_seed("Car", 500000.0, 3.0, 80000.0);
        assert_ne!(base, compute_seed("House", 500000.0, 3.0, 80000.0));
        assert_ne!(base, compute_seed("Car", 500001.0, 3.0, 80000.0));
        assert_ne!(base, compute_seed("Car", 500000.0, 3.5, 80000.0));
        assert_ne!(base, compute_seed("Car", 500000.0, 3.0, 80001.0));
    }

    #[test]
    fn test_separator_prevents_field_bleed() {
        assert_ne!(
            compute_seed("Car1", 0.5, 3.0, 80000.0),
            compute_seed("Car", 10.5, 3.0, 80000.0)
        );
    }

    #[test]
    fn test_request_wrapper_matches() {
        let request = PlanRequest::new("Wedding", 1_200_000.0, 4.0, 90000.0);
        assert_eq!(
            seed_for_request(&request),
            compute_seed("Wedding", 1_200_000.0, 4.0, 90000.0)
        );
    }
}
