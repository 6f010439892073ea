use crate::model::common::election::CandidateIndex;

use super::candidate::Candidate;

/// Find the candidate with the most votes in a single pass.
///
/// Only a strictly greater count displaces the current leader, so ties go to
/// whoever applied first. Returns `None` iff there are no candidates.
pub fn leading_candidate(candidates: &[Candidate]) -> Option<CandidateIndex> {
    let mut leader: Option<(usize, u32)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        match leader {
            Some((_, most)) if candidate.vote_count() <= most => {}
            _ => leader = Some((index, candidate.vote_count())),
        }
    }
    leader.map(|(index, _)| index as CandidateIndex)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::common::identity::Identity;

    fn with_votes(counts: &[u32]) -> Vec<Candidate> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let mut candidate = Candidate::new(Identity::new(format!("c{i}")), String::new());
                for _ in 0..count {
                    candidate.add_vote();
                }
                candidate
            })
            .collect()
    }

    #[test]
    fn no_candidates_no_leader() {
        assert_eq!(leading_candidate(&[]), None);
    }

    #[test]
    fn strict_maximum_wins() {
        assert_eq!(leading_candidate(&with_votes(&[1, 4, 2])), Some(1));
        assert_eq!(leading_candidate(&with_votes(&[0, 0, 3])), Some(2));
    }

    #[test]
    fn ties_go_to_lowest_index() {
        assert_eq!(leading_candidate(&with_votes(&[2, 5, 5, 1])), Some(1));
        assert_eq!(leading_candidate(&with_votes(&[0, 0, 0])), Some(0));
    }
}
