use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context as _;
use serde::de::DeserializeOwned;
use sov_ballot_core::Context;
use sov_voting::VotingConfig;

/// Reads toml file as a specific type.
pub fn from_toml_path<P: AsRef<Path>, R: DeserializeOwned>(path: P) -> anyhow::Result<R> {
    let mut contents = String::new();
    {
        let mut file = File::open(path)?;
        file.read_to_string(&mut contents)?;
    }

    let result: R = toml::from_str(&contents)?;

    Ok(result)
}

/// Reads the genesis configuration of the voting module.
pub fn load_genesis<C: Context, P: AsRef<Path>>(path: P) -> anyhow::Result<VotingConfig<C>> {
    let path = path.as_ref();
    from_toml_path(path)
        .with_context(|| format!("Failed to read genesis config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use sov_ballot_core::utils::generate_address;
    use sov_ballot_core::DefaultContext;
    use sov_voting::{CandidateConfig, VoterPowerConfig};
    use tempfile::NamedTempFile;

    use super::*;

    fn create_config_from(content: &str) -> NamedTempFile {
        let mut config_file = NamedTempFile::new().unwrap();
        config_file.write_all(content.as_bytes()).unwrap();
        config_file
    }

    #[test]
    fn test_correct_genesis_config() {
        let admin = generate_address::<DefaultContext>("admin");
        let voter = generate_address::<DefaultContext>("voter");
        let content = format!(
            r#"
            admin = "{admin}"
            minimum_voting_power = 2
            can_voters_add_candidates = true

            [[candidates]]
            name = "Candidate 1"
            description = "Description 1"

            [[candidates]]
            name = "Candidate 2"

            [[voting_power]]
            voter = "{voter}"
            power = 10
        "#
        );
        let config_file = create_config_from(&content);

        let config: VotingConfig<DefaultContext> = load_genesis(config_file.path()).unwrap();
        let expected = VotingConfig {
            admin,
            minimum_voting_power: 2,
            can_voters_add_candidates: true,
            candidates: vec![
                CandidateConfig {
                    name: "Candidate 1".to_owned(),
                    description: "Description 1".to_owned(),
                },
                CandidateConfig {
                    name: "Candidate 2".to_owned(),
                    description: String::new(),
                },
            ],
            voting_power: vec![VoterPowerConfig { voter, power: 10 }],
        };
        assert_eq!(config, expected);
    }

    #[test]
    fn test_optional_sections_default_to_empty() {
        let admin = generate_address::<DefaultContext>("admin");
        let content = format!(
            r#"
            admin = "{admin}"
            can_voters_add_candidates = false
        "#
        );
        let config_file = create_config_from(&content);

        let config: VotingConfig<DefaultContext> = load_genesis(config_file.path()).unwrap();
        assert_eq!(config.minimum_voting_power, 0);
        assert!(config.candidates.is_empty());
        assert!(config.voting_power.is_empty());
    }

    #[test]
    fn test_malformed_admin_is_rejected() {
        let config_file = create_config_from(
            r#"
            admin = "not-an-address"
            can_voters_add_candidates = false
        "#,
        );

        let err = load_genesis::<DefaultContext, _>(config_file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to read genesis config"));
    }

    #[test]
    fn test_missing_file() {
        assert!(load_genesis::<DefaultContext, _>("/nonexistent/genesis.toml").is_err());
    }
}
