use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("scenario error: {0}")]
    Scenario(String),

    #[error("invalid action {0:?}: expected target:value[:hexpayload]")]
    InvalidAction(String),

    #[error("unknown proposal label {0:?}")]
    UnknownLabel(String),

    #[error("governance error: {0}")]
    Governance(#[from] agora_governance::GovernanceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
