use proptest::prelude::*;

use agora_governance::costing::{compute_cost, integer_sqrt};
use agora_governance::{
    proposal_id_for, max_quadratic_votes, GovernanceError, ProposalAction, Support, Tally,
    TallyEvaluator, TallyOutcome, VoteRequest, VotingMode,
};
use agora_types::{AccountId, VotingPower};

fn support_strategy() -> impl Strategy<Value = Support> {
    prop_oneof![Just(Support::For), Just(Support::Against), Just(Support::Abstain)]
}

proptest! {
    /// A quadratic request for `w` votes succeeds iff `w² ≤ P`.
    #[test]
    fn quadratic_succeeds_iff_square_fits(power in 0u128..1_000_000_000, w in 1u128..100_000) {
        let result = compute_cost(
            VotingMode::Quadratic,
            VoteRequest::Weighted(w),
            &AccountId::new("v"),
            VotingPower::new(power),
        );
        if w * w <= power {
            let cost = result.unwrap();
            prop_assert_eq!(cost.weight.raw(), w);
            prop_assert_eq!(cost.power_spent.raw(), w * w);
        } else {
            let is_insufficient = matches!(result, Err(GovernanceError::InsufficientVotingPower { .. }));
            prop_assert!(is_insufficient);
        }
    }

    /// `floor(sqrt(P))` is the largest acceptable request.
    #[test]
    fn max_quadratic_votes_is_the_boundary(power in any::<u128>()) {
        let max = max_quadratic_votes(VotingPower::new(power));
        prop_assert!(max.checked_mul(max).is_some_and(|sq| sq <= power));
        let next = max + 1;
        prop_assert!(next.checked_mul(next).map_or(true, |sq| sq > power));
    }

    /// Integer sqrt agrees with a float estimate on small inputs.
    #[test]
    fn integer_sqrt_matches_float(n in 0u128..(1u128 << 48)) {
        let f = (n as f64).sqrt().floor() as u128;
        prop_assert_eq!(integer_sqrt(n), f);
    }

    /// Squaring never wraps: huge requests fail closed.
    #[test]
    fn huge_requests_fail_closed(w in (1u128 << 64)..u128::MAX) {
        let result = compute_cost(
            VotingMode::Quadratic,
            VoteRequest::Weighted(w),
            &AccountId::new("v"),
            VotingPower::new(u128::MAX),
        );
        let is_insufficient = matches!(result, Err(GovernanceError::InsufficientVotingPower { .. }));
        prop_assert!(is_insufficient);
    }

    /// for ≤ against is never Succeeded, regardless of quorum.
    #[test]
    fn no_majority_never_succeeds(
        for_votes in 0u128..1_000_000,
        extra_against in 0u128..1_000_000,
        abstain in 0u128..1_000_000,
        quorum in 0u128..1_000,
    ) {
        let tally = Tally {
            for_votes: VotingPower::new(for_votes),
            against_votes: VotingPower::new(for_votes + extra_against),
            abstain_votes: VotingPower::new(abstain),
        };
        prop_assert_eq!(TallyEvaluator::evaluate(&tally, VotingPower::new(quorum)), TallyOutcome::Defeated);
    }

    /// Below quorum is never Succeeded, regardless of margin.
    #[test]
    fn below_quorum_never_succeeds(
        for_votes in 1u128..1_000_000,
        abstain in 0u128..1_000_000,
        shortfall in 1u128..1_000_000,
    ) {
        let tally = Tally {
            for_votes: VotingPower::new(for_votes),
            against_votes: VotingPower::ZERO,
            abstain_votes: VotingPower::new(abstain),
        };
        let quorum = VotingPower::new(for_votes + abstain + shortfall);
        prop_assert_eq!(TallyEvaluator::evaluate(&tally, quorum), TallyOutcome::Defeated);
    }

    /// The running tally equals the per-bucket sum of recorded weights.
    #[test]
    fn tally_is_sum_of_weights(votes in prop::collection::vec((support_strategy(), 0u128..1_000_000), 0..64)) {
        let mut tally = Tally::default();
        let (mut f, mut a, mut ab) = (0u128, 0u128, 0u128);
        for (support, weight) in &votes {
            tally.record(*support, VotingPower::new(*weight));
            match support {
                Support::For => f += weight,
                Support::Against => a += weight,
                Support::Abstain => ab += weight,
            }
        }
        prop_assert_eq!(tally.for_votes.raw(), f);
        prop_assert_eq!(tally.against_votes.raw(), a);
        prop_assert_eq!(tally.abstain_votes.raw(), ab);
        prop_assert_eq!(tally.participation().raw(), f + ab);
    }

    /// Proposal identity is a pure function of content.
    #[test]
    fn proposal_id_is_deterministic(
        target in "[a-z]{1,12}",
        value in any::<u128>(),
        payload in prop::collection::vec(any::<u8>(), 0..64),
        description in ".{0,64}",
    ) {
        let actions = vec![ProposalAction::new(target.as_str(), value, payload)];
        prop_assert_eq!(
            proposal_id_for(&actions, &description),
            proposal_id_for(&actions.clone(), &description.clone())
        );
        let mut other = description.clone();
        other.push('!');
        prop_assert_ne!(proposal_id_for(&actions, &description), proposal_id_for(&actions, &other));
    }
}
