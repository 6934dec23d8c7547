//! Runs a [`Scenario`] against the in-memory nullables.

use crate::error::CliError;
use crate::scenario::{Scenario, Step};
use agora_governance::{GovernanceError, Governor, ProposalState};
use agora_nullables::{NullClock, NullTimelock, NullVotingPower};
use agora_types::{AccountId, GovernanceConfig, ProposalId, Timestamp, VotingPower};
use agora_utils::format_duration;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

type SimGovernor = Governor<Arc<NullVotingPower>, Arc<NullTimelock>>;

/// Result of one scenario step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub at: u64,
    pub step: String,
    pub ok: bool,
    pub detail: String,
}

/// Final view of one proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProposalReport {
    pub label: String,
    pub id: String,
    pub mode: String,
    pub state: ProposalState,
    pub for_votes: String,
    pub against_votes: String,
    pub abstain_votes: String,
    pub quorum: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct SimulationReport {
    pub finished_at: u64,
    pub steps: Vec<StepOutcome>,
    pub proposals: Vec<ProposalReport>,
    pub events: usize,
    pub failed_expectations: usize,
    pub stats: BTreeMap<&'static str, u64>,
}

impl SimulationReport {
    pub fn passed(&self) -> bool {
        self.failed_expectations == 0
    }

    /// Plain-text rendering for terminals.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for s in &self.steps {
            let mark = if s.ok { "ok " } else { "ERR" };
            let _ = writeln!(out, "[{:>3}] t={:<8} {mark} {:<32} {}", s.index, s.at, s.step, s.detail);
        }
        let _ = writeln!(out);
        for p in &self.proposals {
            let _ = writeln!(
                out,
                "{:<12} {}  {:<9} {:<9} for={} against={} abstain={} quorum={}",
                p.label,
                &p.id[..16],
                p.mode,
                p.state,
                p.for_votes,
                p.against_votes,
                p.abstain_votes,
                p.quorum
            );
        }
        let _ = writeln!(
            out,
            "\n{} events, {} failed expectations",
            self.events, self.failed_expectations
        );
        out
    }
}

/// Drives one scenario against a fresh governor.
pub struct Simulation {
    governor: SimGovernor,
    oracle: Arc<NullVotingPower>,
    timelock: Arc<NullTimelock>,
    clock: NullClock,
    labels: BTreeMap<String, ProposalId>,
}

impl Simulation {
    pub fn new(scenario: &Scenario, base: &GovernanceConfig) -> Result<Self, CliError> {
        let config = scenario.governance.clone().unwrap_or_else(|| base.clone());
        let oracle = Arc::new(NullVotingPower::new());
        for balance in &scenario.balances {
            oracle.seed_power(
                &AccountId::new(balance.account.as_str()),
                VotingPower::new(balance.power as u128),
            );
        }
        let timelock = Arc::new(NullTimelock::new(config.timelock_min_delay_secs));
        let governor = Governor::new(config, Arc::clone(&oracle), Arc::clone(&timelock))?;
        Ok(Self {
            governor,
            oracle,
            timelock,
            clock: NullClock::new(scenario.start_at),
            labels: BTreeMap::new(),
        })
    }

    /// Run every step. Governance rejections are recorded, not fatal; only a
    /// malformed scenario aborts the run.
    pub fn run(mut self, scenario: &Scenario) -> Result<SimulationReport, CliError> {
        let mut steps = Vec::with_capacity(scenario.steps.len());
        let mut failed_expectations = 0;

        for (index, step) in scenario.steps.iter().enumerate() {
            let at = self.clock.now();
            let (ok, detail) = match self.apply(step, at)? {
                StepResult::Done(detail) => (true, detail),
                StepResult::Rejected(e) => (false, e.to_string()),
                StepResult::ExpectationFailed(detail) => {
                    failed_expectations += 1;
                    (false, detail)
                }
            };
            tracing::debug!(index, at = at.as_secs(), ok, detail = %detail, "scenario step");
            steps.push(StepOutcome {
                index,
                at: at.as_secs(),
                step: describe(step),
                ok,
                detail,
            });
        }

        let now = self.clock.now();
        let mut proposals = Vec::with_capacity(self.labels.len());
        for (label, id) in &self.labels {
            let proposal = self.governor.get(id)?;
            let tally = self.governor.votes_of(id)?;
            proposals.push(ProposalReport {
                label: label.clone(),
                id: id.to_string(),
                mode: proposal.mode.to_string(),
                state: self.governor.state_of(id, now)?,
                for_votes: tally.for_votes.to_string(),
                against_votes: tally.against_votes.to_string(),
                abstain_votes: tally.abstain_votes.to_string(),
                quorum: proposal.quorum.to_string(),
            });
        }

        Ok(SimulationReport {
            finished_at: now.as_secs(),
            steps,
            proposals,
            events: self.governor.drain_events().len(),
            failed_expectations,
            stats: self.governor.stats().snapshot(),
        })
    }

    fn id_of(&self, label: &str) -> Result<ProposalId, CliError> {
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| CliError::UnknownLabel(label.to_string()))
    }

    fn apply(&mut self, step: &Step, now: Timestamp) -> Result<StepResult, CliError> {
        let gov = &self.governor;
        let result = match step {
            Step::SetPower { account, power } => {
                self.oracle.set_power(
                    &AccountId::new(account.as_str()),
                    now,
                    VotingPower::new(*power as u128),
                );
                Ok(format!("{account} = {power}"))
            }
            Step::Advance { secs } => Ok(format!(
                "+{} -> t = {}",
                format_duration(*secs),
                self.clock.advance(*secs)
            )),
            Step::AdvanceTo { at } => {
                if *at < now.as_secs() {
                    return Err(CliError::Scenario(format!(
                        "advance_to {at} is before the current time {now}"
                    )));
                }
                self.clock.set(*at);
                Ok(format!("t = {at}"))
            }
            Step::Propose {
                label,
                proposer,
                description,
                actions,
            } => {
                if self.labels.contains_key(label) {
                    return Err(CliError::Scenario(format!("label {label:?} used twice")));
                }
                let actions = actions
                    .iter()
                    .map(|a| a.to_action())
                    .collect::<Result<Vec<_>, _>>()?;
                match gov.create(&AccountId::new(proposer.as_str()), actions, description, now) {
                    Ok(id) => {
                        let mode = gov.get(&id)?.mode;
                        self.labels.insert(label.clone(), id);
                        Ok(format!("{} ({mode})", id.short()))
                    }
                    Err(e) => Err(e),
                }
            }
            Step::Vote {
                label,
                voter,
                support,
                weight,
            } => {
                let id = self.id_of(label)?;
                let voter = AccountId::new(voter.as_str());
                let record = match weight {
                    Some(w) => gov.cast_vote_with_weight(&id, &voter, *support, *w as u128, now),
                    None => gov.cast_vote(&id, &voter, *support, now),
                };
                record.map(|r| format!("weight {} (spent {})", r.weight, r.power_spent))
            }
            Step::Cancel { label, caller } => {
                let id = self.id_of(label)?;
                gov.cancel(&id, &AccountId::new(caller.as_str()), now)
                    .map(|()| "canceled".to_string())
            }
            Step::Queue { label } => {
                let id = self.id_of(label)?;
                gov.queue(&id, now)
                    .map(|b| format!("eta {} expires {}", b.eta, b.expires_at))
            }
            Step::Execute { label } => {
                let id = self.id_of(label)?;
                gov.execute(&id, now).map(|()| "executed".to_string())
            }
            Step::Expect { label, state } => {
                let id = self.id_of(label)?;
                let actual = gov.state_of(&id, now)?;
                if actual != *state {
                    return Ok(StepResult::ExpectationFailed(format!(
                        "expected {state}, found {actual}"
                    )));
                }
                Ok(format!("{actual}"))
            }
            Step::OracleOffline { offline } => {
                self.oracle.set_offline(*offline);
                Ok(format!("oracle offline = {offline}"))
            }
            Step::TimelockRejecting { rejecting } => {
                self.timelock.set_rejecting(*rejecting);
                Ok(format!("timelock rejecting = {rejecting}"))
            }
        };
        Ok(match result {
            Ok(detail) => StepResult::Done(detail),
            Err(e) => StepResult::Rejected(e),
        })
    }
}

enum StepResult {
    Done(String),
    Rejected(GovernanceError),
    ExpectationFailed(String),
}

fn describe(step: &Step) -> String {
    match step {
        Step::SetPower { account, .. } => format!("set_power {account}"),
        Step::Advance { secs } => format!("advance {secs}s"),
        Step::AdvanceTo { at } => format!("advance_to {at}"),
        Step::Propose { label, .. } => format!("propose {label}"),
        Step::Vote {
            label,
            voter,
            support,
            weight,
        } => match weight {
            Some(w) => format!("vote {label} {voter} {support} w={w}"),
            None => format!("vote {label} {voter} {support}"),
        },
        Step::Cancel { label, .. } => format!("cancel {label}"),
        Step::Queue { label } => format!("queue {label}"),
        Step::Execute { label } => format!("execute {label}"),
        Step::Expect { label, state } => format!("expect {label} {state}"),
        Step::OracleOffline { offline } => format!("oracle_offline {offline}"),
        Step::TimelockRejecting { rejecting } => format!("timelock_rejecting {rejecting}"),
    }
}

/// Run a scenario end to end.
pub fn simulate(scenario: &Scenario, base: &GovernanceConfig) -> Result<SimulationReport, CliError> {
    Simulation::new(scenario, base)?.run(scenario)
}
