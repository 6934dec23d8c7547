#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use agora_governance::{Governor, ProposalState, Support};
use agora_nullables::{NullTimelock, NullVotingPower};
use agora_types::{AccountId, GovernanceConfig, ProposalId, Timestamp};

#[derive(Arbitrary, Debug)]
enum Op {
    Propose { proposer: u8, description: u8, quadratic: bool },
    Vote { proposal: u8, voter: u8, support: u8, weight: Option<u16> },
    Cancel { proposal: u8, caller: u8 },
    Queue { proposal: u8 },
    Execute { proposal: u8 },
    Advance { secs: u8 },
}

fn account(n: u8) -> AccountId {
    AccountId::new(format!("acct{}", n % 8))
}

// Arbitrary operation sequences must never panic, and whatever is accepted
// must leave every proposal with at most one vote per account and no
// weight without a voter.
fuzz_target!(|ops: Vec<Op>| {
    let balances: Vec<(String, u128)> = (0..8u8).map(|i| (format!("acct{i}"), (i as u128 + 1) * 25)).collect();
    let refs: Vec<(&str, u128)> = balances.iter().map(|(n, p)| (n.as_str(), *p)).collect();
    let gov = match Governor::new(
        GovernanceConfig::dev_defaults(),
        NullVotingPower::with_balances(&refs),
        NullTimelock::new(20),
    ) {
        Ok(gov) => gov,
        Err(_) => return,
    };

    let mut now = 0u64;
    let mut ids: Vec<ProposalId> = Vec::new();
    let pick = |ids: &[ProposalId], n: u8| ids.get(n as usize % ids.len().max(1)).copied();

    for op in ops.iter().take(256) {
        let t = Timestamp::new(now);
        match op {
            Op::Propose { proposer, description, quadratic } => {
                let tag = if *quadratic { " #QV" } else { "" };
                if let Ok(id) = gov.create(&account(*proposer), Vec::new(), &format!("p{description}{tag}"), t) {
                    ids.push(id);
                }
            }
            Op::Vote { proposal, voter, support, weight } => {
                if let Some(id) = pick(&ids, *proposal) {
                    let support = Support::try_from(support % 3).unwrap_or(Support::Abstain);
                    let _ = match weight {
                        Some(w) => gov.cast_vote_with_weight(&id, &account(*voter), support, *w as u128, t),
                        None => gov.cast_vote(&id, &account(*voter), support, t),
                    };
                }
            }
            Op::Cancel { proposal, caller } => {
                if let Some(id) = pick(&ids, *proposal) {
                    let _ = gov.cancel(&id, &account(*caller), t);
                }
            }
            Op::Queue { proposal } => {
                if let Some(id) = pick(&ids, *proposal) {
                    let _ = gov.queue(&id, t);
                }
            }
            Op::Execute { proposal } => {
                if let Some(id) = pick(&ids, *proposal) {
                    let executed_before = gov.state_of(&id, t) == Ok(ProposalState::Executed);
                    let result = gov.execute(&id, t);
                    assert!(!(executed_before && result.is_ok()), "executed twice");
                }
            }
            Op::Advance { secs } => now += *secs as u64,
        }
    }

    let t = Timestamp::new(now);
    for summary in gov.list(t) {
        assert!(summary.tally.total().is_zero() || summary.voters > 0);
        assert!(summary.voters <= 8);
    }
});
