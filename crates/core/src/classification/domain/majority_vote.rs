use crate::classification::domain::persona::{AggregateResult, Persona};
use crate::shared::constants::TIE_CONFIDENCE;

/// Reduces retained per-frame labels to one judgment.
///
/// A strict majority wins with confidence `count / total`. A tie reports
/// `unknown` at [`TIE_CONFIDENCE`], marking maximum ambiguity rather than
/// absence of evidence. `unknown` entries are expected to be filtered out
/// by the caller; any that slip through still count toward the total.
pub fn majority_vote(samples: &[Persona]) -> AggregateResult {
    let total = samples.len();
    if total == 0 {
        return AggregateResult::empty();
    }

    let grandma = samples.iter().filter(|p| **p == Persona::Grandma).count();
    let grandpa = samples.iter().filter(|p| **p == Persona::Grandpa).count();

    if grandma > grandpa {
        AggregateResult::new(Persona::Grandma, grandma as f64 / total as f64, total)
    } else if grandpa > grandma {
        AggregateResult::new(Persona::Grandpa, grandpa as f64 / total as f64, total)
    } else {
        AggregateResult::new(Persona::Unknown, TIE_CONFIDENCE, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    use Persona::{Grandma, Grandpa};

    #[test]
    fn test_no_samples_is_empty_result() {
        assert_eq!(majority_vote(&[]), AggregateResult::empty());
    }

    #[test]
    fn test_two_to_one_grandma() {
        let result = majority_vote(&[Grandma, Grandma, Grandpa]);
        assert_eq!(result.persona, Grandma);
        assert_relative_eq!(result.confidence, 2.0 / 3.0);
        assert_eq!(result.sample_count, 3);
    }

    #[test]
    fn test_grandpa_majority() {
        let result = majority_vote(&[Grandpa, Grandma, Grandpa, Grandpa]);
        assert_eq!(result.persona, Grandpa);
        assert_relative_eq!(result.confidence, 0.75);
    }

    #[rstest]
    #[case::one_each(&[Grandma, Grandpa])]
    #[case::two_each(&[Grandpa, Grandma, Grandma, Grandpa])]
    fn test_tie_is_unknown_at_half(#[case] samples: &[Persona]) {
        let result = majority_vote(samples);
        assert_eq!(result.persona, Persona::Unknown);
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.sample_count, samples.len());
    }

    #[test]
    fn test_unanimous_is_full_confidence() {
        let result = majority_vote(&[Grandma, Grandma, Grandma]);
        assert_eq!(result.persona, Grandma);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_result_carries_no_error() {
        assert!(majority_vote(&[Grandpa]).error.is_none());
    }
}
