//! Commands grouped by the feature level that introduced them.

use indexmap::IndexMap;
use serde::Serialize;

use super::commands::PreparedCommand;
use super::PrepareError;
use crate::feature::{FeatureApi, FeatureVersion, Requirements};

/// Commands introduced by one feature level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedFeatureLevel {
    pub api: FeatureApi,
    pub version: FeatureVersion,
    pub commands: Vec<PreparedCommand>,
}

/// Assign each required command to the level that introduced it.
///
/// Levels come back in ascending version order. Commands keep the order of
/// the requirements within a level.
pub fn prepare_feature_levels(
    api: FeatureApi,
    requirements: &Requirements,
    prepared_commands: &IndexMap<String, PreparedCommand>,
) -> Result<Vec<PreparedFeatureLevel>, PrepareError> {
    let mut buckets: IndexMap<FeatureVersion, Vec<PreparedCommand>> = IndexMap::new();

    for (name, version) in &requirements.commands {
        let command = prepared_commands
            .get(name)
            .ok_or_else(|| PrepareError::MissingCommand(name.clone()))?;
        buckets.entry(*version).or_default().push(command.clone());
    }

    let mut levels: Vec<PreparedFeatureLevel> = buckets
        .into_iter()
        .map(|(version, commands)| PreparedFeatureLevel {
            api,
            version,
            commands,
        })
        .collect();
    levels.sort_by_key(|level| level.version);

    tracing::debug!(api = %api, levels = levels.len(), "prepared feature levels");
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::NamingOptions;
    use crate::parse::{Command, Type};
    use crate::prepare::prepare_commands;
    use pretty_assertions::assert_eq;

    fn command(name: &str) -> Command {
        Command {
            name: name.to_string(),
            return_type: Type {
                low_level: "void".to_string(),
                high_level: "void".to_string(),
                front_modifiers: None,
                back_modifiers: None,
            },
            params: vec![],
        }
    }

    fn prepared(names: &[&str]) -> IndexMap<String, PreparedCommand> {
        let commands: Vec<_> = names.iter().map(|name| command(name)).collect();
        prepare_commands(&commands, &IndexMap::new(), &NamingOptions::default())
    }

    #[test]
    fn test_levels_sorted_by_version() {
        let mut requirements = Requirements::default();
        requirements
            .commands
            .insert("glDrawArraysInstanced".to_string(), FeatureVersion::new(3, 1));
        requirements
            .commands
            .insert("glClear".to_string(), FeatureVersion::new(1, 0));
        requirements
            .commands
            .insert("glBindTexture".to_string(), FeatureVersion::new(1, 1));
        requirements
            .commands
            .insert("glBegin".to_string(), FeatureVersion::new(1, 0));

        let commands = prepared(&["glBegin", "glBindTexture", "glClear", "glDrawArraysInstanced"]);
        let levels = prepare_feature_levels(FeatureApi::Gl, &requirements, &commands).unwrap();

        let versions: Vec<_> = levels.iter().map(|level| level.version.to_string()).collect();
        assert_eq!(versions, vec!["1.0", "1.1", "3.1"]);
        assert!(levels.iter().all(|level| level.api == FeatureApi::Gl));

        let first: Vec<_> = levels[0]
            .commands
            .iter()
            .map(|command| command.original_name.as_str())
            .collect();
        assert_eq!(first, vec!["glClear", "glBegin"]);
    }

    #[test]
    fn test_one_level_per_version() {
        let mut requirements = Requirements::default();
        for (name, minor) in [("glBegin", 0), ("glBindTexture", 1), ("glClear", 0), ("glEnd", 1)] {
            requirements
                .commands
                .insert(name.to_string(), FeatureVersion::new(1, minor));
        }

        let commands = prepared(&["glBegin", "glBindTexture", "glClear", "glEnd"]);
        let levels = prepare_feature_levels(FeatureApi::Gl, &requirements, &commands).unwrap();

        assert_eq!(levels.len(), 2);
        assert!(levels.windows(2).all(|pair| pair[0].version < pair[1].version));
        assert_ne!(levels[0], levels[1]);
        let second: Vec<_> = levels[1]
            .commands
            .iter()
            .map(|command| command.original_name.as_str())
            .collect();
        assert_eq!(second, vec!["glBindTexture", "glEnd"]);
    }

    #[test]
    fn test_missing_command_is_schema_fault() {
        let mut requirements = Requirements::default();
        requirements
            .commands
            .insert("glClear".to_string(), FeatureVersion::new(1, 0));

        let err = prepare_feature_levels(FeatureApi::Gl, &requirements, &IndexMap::new()).unwrap_err();
        assert_eq!(err, PrepareError::MissingCommand("glClear".to_string()));
    }

    #[test]
    fn test_no_commands_no_levels() {
        let levels =
            prepare_feature_levels(FeatureApi::Gles2, &Requirements::default(), &IndexMap::new())
                .unwrap();
        assert!(levels.is_empty());
    }
}
