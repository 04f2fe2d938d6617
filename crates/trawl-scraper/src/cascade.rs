//! First-match selection over an ordered candidate list

/// Try `lookup` against each candidate in order, returning the first hit
/// together with the index of the candidate that produced it.
///
/// Candidates after the first hit are never consulted.
pub fn select_first<T>(
    candidates: &[&str],
    mut lookup: impl FnMut(&str) -> Option<T>,
) -> Option<(usize, T)> {
    for (index, candidate) in candidates.iter().enumerate() {
        if let Some(value) = lookup(candidate) {
            return Some((index, value));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_hit_wins() {
        let candidates = &["a", "b", "c"];
        let result = select_first(candidates, |c| (c == "b").then(|| c.to_uppercase()));
        assert_eq!(result, Some((1, "B".to_string())));
    }

    #[test]
    fn test_later_candidates_not_consulted_after_hit() {
        let candidates = &["first", "second", "third"];
        let mut consulted = Vec::new();
        let result = select_first(candidates, |c| {
            consulted.push(c.to_string());
            Some(c.len())
        });
        assert_eq!(result, Some((0, 5)));
        assert_eq!(consulted, vec!["first"]);
    }

    #[test]
    fn test_empty_results_advance_the_cascade() {
        let candidates = &["miss", "miss-again", "hit"];
        let mut consulted = Vec::new();
        let result = select_first(candidates, |c| {
            consulted.push(c.to_string());
            (c == "hit").then(|| c.to_string())
        });
        assert_eq!(result, Some((2, "hit".to_string())));
        assert_eq!(consulted.len(), 3);
    }

    #[test]
    fn test_exhaustion_yields_none() {
        let candidates = &["a", "b"];
        let result: Option<(usize, String)> = select_first(candidates, |_| None);
        assert!(result.is_none());
    }
}
