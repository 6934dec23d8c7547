#![no_main]

use libfuzzer_sys::fuzz_target;

use agora_governance::costing::{compute_cost, max_quadratic_votes};
use agora_governance::{VoteRequest, VotingMode};
use agora_types::{AccountId, VotingPower};

// Quadratic costing must never panic, never wrap, and accept exactly the
// requests whose square fits in the available power.
fuzz_target!(|input: (u128, u128)| {
    let (power, requested) = input;
    let account = AccountId::new("fuzz");
    let power = VotingPower::new(power);

    let result = compute_cost(
        VotingMode::Quadratic,
        VoteRequest::Weighted(requested),
        &account,
        power,
    );
    let fits = requested != 0
        && requested
            .checked_mul(requested)
            .is_some_and(|sq| sq <= power.raw());
    assert_eq!(result.is_ok(), fits);
    if let Ok(cost) = result {
        assert_eq!(cost.weight.raw(), requested);
        assert!(cost.power_spent <= power);
        assert!(requested <= max_quadratic_votes(power));
    }

    let _ = compute_cost(VotingMode::Linear, VoteRequest::FullPower, &account, power);
});
