//! Affinity score combinator.
//!
//! Collapses the three per-term signals into one ranking key:
//!
//! ```text
//! affinity = w_p · p / (1 + p)  +  w_d · d  +  w_s · (s + 1) / 2
//! ```
//!
//! where `p` is popularity (`ln(1 + df)`, unbounded), `d` is
//! distinctiveness (`[0, 1]`), and `s` is semantic similarity (`[-1, 1]`).
//! Each signal is squashed into `[0, 1]` by a monotone map before weighting,
//! so with non-negative weights the affinity never decreases when any one
//! signal increases.

/// Weights applied to each normalized signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffinityWeights {
    pub popularity: f64,
    pub distinctiveness: f64,
    pub similarity: f64,
}

impl Default for AffinityWeights {
    fn default() -> Self {
        Self {
            popularity: 0.3,
            distinctiveness: 0.4,
            similarity: 0.3,
        }
    }
}

impl AffinityWeights {
    /// Combine raw signals into an affinity score.
    pub fn combine(&self, popularity: f64, distinctiveness: f64, semantic_similarity: f64) -> f64 {
        let p = popularity.max(0.0);
        let p_norm = p / (1.0 + p);
        let d_norm = distinctiveness.clamp(0.0, 1.0);
        let s_norm = ((semantic_similarity.clamp(-1.0, 1.0)) + 1.0) / 2.0;

        self.popularity * p_norm + self.distinctiveness * d_norm + self.similarity * s_norm
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.popularity + self.distinctiveness + self.similarity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotone_in_each_signal() {
        let w = AffinityWeights::default();
        let base = w.combine(1.0, 0.5, 0.2);
        assert!(w.combine(2.0, 0.5, 0.2) > base);
        assert!(w.combine(1.0, 0.6, 0.2) > base);
        assert!(w.combine(1.0, 0.5, 0.3) > base);
    }

    #[test]
    fn test_bounded_by_weight_total() {
        let w = AffinityWeights::default();
        let max = w.combine(f64::MAX, 1.0, 1.0);
        assert!(max <= w.total() + 1e-9);
        let min = w.combine(0.0, 0.0, -1.0);
        assert!(min.abs() < 1e-12);
    }

    #[test]
    fn test_zero_weight_ignores_signal() {
        let w = AffinityWeights {
            popularity: 0.0,
            distinctiveness: 1.0,
            similarity: 0.0,
        };
        assert_eq!(w.combine(0.0, 0.7, -1.0), w.combine(5.0, 0.7, 1.0));
    }
}
