//! Election script configuration with TOML file support.

use ballot_types::{BallotError, Principal, ProposalId};
use ballot_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Description used for the opt-in null ballot proposal.
pub const NULL_BALLOT_DESCRIPTION: &str = "null ballot";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Principal(#[from] BallotError),

    #[error("null_ballot needs at least one voter to register it")]
    NullBallotWithoutVoters,
}

/// A proposal to register, on behalf of `author`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalSpec {
    pub author: String,
    pub description: String,
}

/// One ballot. `proposal` is the id the session assigns, so with
/// `null_ballot = true` the null ballot is 0 and listed proposals start at 1.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotSpec {
    pub voter: String,
    pub proposal: ProposalId,
}

/// A complete election script.
///
/// Can be loaded from a TOML file via [`ElectionConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionConfig {
    /// Principal that drives phase transitions.
    #[serde(default = "default_administrator")]
    pub administrator: String,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Register a null ballot as the first proposal (authored by the first voter).
    #[serde(default)]
    pub null_ballot: bool,

    #[serde(default)]
    pub voters: Vec<String>,

    #[serde(default)]
    pub proposals: Vec<ProposalSpec>,

    #[serde(default)]
    pub ballots: Vec<BallotSpec>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_administrator() -> String {
    "admin".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ElectionConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("ElectionConfig is always serializable to TOML")
    }

    /// A small three-voter script, used by `ballot init`.
    pub fn example() -> Self {
        Self {
            voters: vec!["alice".into(), "bob".into(), "carol".into()],
            proposals: vec![
                ProposalSpec {
                    author: "alice".into(),
                    description: "extend library hours".into(),
                },
                ProposalSpec {
                    author: "bob".into(),
                    description: "repaint the hall".into(),
                },
            ],
            ballots: vec![
                BallotSpec {
                    voter: "alice".into(),
                    proposal: ProposalId(0),
                },
                BallotSpec {
                    voter: "bob".into(),
                    proposal: ProposalId(1),
                },
                BallotSpec {
                    voter: "carol".into(),
                    proposal: ProposalId(1),
                },
            ],
            ..Default::default()
        }
    }

    /// Parse every identity in the script, failing on the first malformed one.
    pub fn validate(&self) -> Result<Script, ConfigError> {
        let administrator = self.administrator.parse()?;
        let voters = self
            .voters
            .iter()
            .map(|v| v.parse())
            .collect::<Result<Vec<Principal>, _>>()?;

        let mut proposals = Vec::with_capacity(self.proposals.len() + 1);
        if self.null_ballot {
            let author = voters.first().ok_or(ConfigError::NullBallotWithoutVoters)?;
            proposals.push((author.clone(), NULL_BALLOT_DESCRIPTION.to_string()));
        }
        for spec in &self.proposals {
            proposals.push((spec.author.parse()?, spec.description.clone()));
        }

        let ballots = self
            .ballots
            .iter()
            .map(|b| -> Result<(Principal, ProposalId), ConfigError> {
                Ok((b.voter.parse()?, b.proposal))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Script {
            administrator,
            voters,
            proposals,
            ballots,
        })
    }
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            administrator: default_administrator(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            null_ballot: false,
            voters: Vec::new(),
            proposals: Vec::new(),
            ballots: Vec::new(),
        }
    }
}

/// A validated script: every identity parsed, the null ballot made explicit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Script {
    pub administrator: Principal,
    pub voters: Vec<Principal>,
    /// `(author, description)` in registration order.
    pub proposals: Vec<(Principal, String)>,
    pub ballots: Vec<(Principal, ProposalId)>,
}
