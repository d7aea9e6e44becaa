//! Requirement resolution for one or more targets.
//!
//! Requirements are derived from scratch for every target by walking all
//! feature levels in ascending version order. Nothing is carried over from a
//! previous resolution, so entities dropped by a removing level stay absent for
//! every target in that level's major-version line or later.

use indexmap::IndexMap;

use super::{
    extension_requirements, Extension, Feature, FeatureError, FeatureVersion, Profile,
    Requirements,
};
use crate::registry::FeatureNode;

/// Whether `candidate` contributes to `target`: same API family and not newer.
pub fn is_compatible(target: &Feature, candidate: &Feature) -> bool {
    target.api == candidate.api && candidate.version <= target.version
}

/// Whether the `<remove>` blocks of `level` apply to `target`.
///
/// A removing level retires entities for its whole major-version line, so a
/// 3.2 removal already holds for a 3.0 or 3.1 target.
fn removal_applies(target: &Feature, level: &FeatureNode) -> bool {
    target.api == level.api && level.version.major <= target.version.major
}

/// Resolve the requirements of a single target.
///
/// Every applicable `<require>` block of a compatible level records its enums
/// and commands with the level's version unless they are already recorded.
/// Applicable `<remove>` blocks then drop the named entities again.
///
/// Fails only when no level declares the target's API; a version between
/// declared levels resolves over the compatible ones.
pub fn feature_requirements(
    target: &Feature,
    levels: &[&FeatureNode],
    profile: Profile,
) -> Result<Requirements, FeatureError> {
    if !levels.iter().any(|level| level.api == target.api) {
        return Err(FeatureError::UnknownFeature {
            requested: *target,
            available: levels
                .iter()
                .map(|level| Feature::new(level.api, level.version))
                .collect(),
        });
    }

    let mut ordered = levels.to_vec();
    ordered.sort_by_key(|level| level.version);

    let mut requirements = Requirements::default();
    for level in ordered {
        if is_compatible(target, &Feature::new(level.api, level.version)) {
            for block in level
                .requires
                .iter()
                .filter(|block| block.applies_to(target.api, profile))
            {
                for name in block.enum_names() {
                    requirements
                        .enums
                        .entry(name.to_string())
                        .or_insert(level.version);
                }
                for name in block.command_names() {
                    requirements
                        .commands
                        .entry(name.to_string())
                        .or_insert(level.version);
                }
            }
        }

        if !removal_applies(target, level) {
            continue;
        }
        for block in level
            .removes
            .iter()
            .filter(|block| block.applies_to(target.api, profile))
        {
            for name in block.enum_names() {
                requirements.enums.shift_remove(name);
            }
            for name in block.command_names() {
                requirements.commands.shift_remove(name);
            }
        }
    }

    tracing::debug!(
        target_feature = %target,
        %profile,
        enums = requirements.enums.len(),
        commands = requirements.commands.len(),
        "resolved feature requirements"
    );
    Ok(requirements)
}

/// Merge per-target requirements.
///
/// A single entry is returned unchanged. Several entries are intersected: a
/// key survives only if every target requires it, keeping the version the
/// first target recorded. The result carries [`Feature::merged`].
pub fn merge_requirements(
    mut results: Vec<(Feature, Requirements)>,
) -> Result<(Feature, Requirements), FeatureError> {
    if results.len() <= 1 {
        return results.pop().ok_or(FeatureError::NoTargets);
    }

    let (_, first) = &results[0];
    let rest = &results[1..];
    let enums = intersect(&first.enums, rest.iter().map(|(_, r)| &r.enums));
    let commands = intersect(&first.commands, rest.iter().map(|(_, r)| &r.commands));

    tracing::debug!(
        targets = results.len(),
        enums = enums.len(),
        commands = commands.len(),
        "merged requirements"
    );
    Ok((
        Feature::merged(),
        Requirements {
            enums,
            commands,
            is_merged: true,
        },
    ))
}

fn intersect<'a>(
    first: &IndexMap<String, FeatureVersion>,
    others: impl Iterator<Item = &'a IndexMap<String, FeatureVersion>> + Clone,
) -> IndexMap<String, FeatureVersion> {
    first
        .iter()
        .filter(|(name, _)| others.clone().all(|other| other.contains_key(*name)))
        .map(|(name, version)| (name.clone(), *version))
        .collect()
}

/// Resolve every target independently and merge the results.
pub fn resolve_requirements(
    targets: &[Feature],
    levels: &[&FeatureNode],
    extensions: &[Extension],
    profile: Profile,
) -> Result<(Feature, Requirements), FeatureError> {
    let results = targets
        .iter()
        .map(|target| {
            let mut requirements = feature_requirements(target, levels, profile)?;
            requirements.extend_from(&extension_requirements(target, extensions));
            Ok((*target, requirements))
        })
        .collect::<Result<Vec<_>, FeatureError>>()?;

    merge_requirements(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureApi;
    use crate::registry::{RequiredEntity, RequirementBlock};

    fn gl(major: u32, minor: u32) -> Feature {
        Feature::new(FeatureApi::Gl, FeatureVersion::new(major, minor))
    }

    fn gles2(major: u32, minor: u32) -> Feature {
        Feature::new(FeatureApi::Gles2, FeatureVersion::new(major, minor))
    }

    fn block(profile: Option<Profile>, commands: &[&str], enums: &[&str]) -> RequirementBlock {
        let mut entries: Vec<_> = enums
            .iter()
            .map(|name| RequiredEntity::Enum(name.to_string()))
            .collect();
        entries.extend(
            commands
                .iter()
                .map(|name| RequiredEntity::Command(name.to_string())),
        );
        RequirementBlock {
            profile,
            api: None,
            entries,
        }
    }

    fn level(
        feature: Feature,
        requires: Vec<RequirementBlock>,
        removes: Vec<RequirementBlock>,
    ) -> FeatureNode {
        FeatureNode {
            api: feature.api,
            name: format!("{}_{}", feature.api, feature.version),
            version: feature.version,
            requires,
            removes,
        }
    }

    fn sample_levels() -> Vec<FeatureNode> {
        vec![
            level(
                gl(1, 0),
                vec![block(None, &["glBegin", "glClear"], &["GL_CURRENT_BIT", "GL_TRIANGLES"])],
                vec![],
            ),
            level(gl(1, 1), vec![block(None, &["glBindTexture"], &[])], vec![]),
            level(
                gl(3, 1),
                vec![block(None, &["glDrawArraysInstanced", "glClear"], &[])],
                vec![block(Some(Profile::Core), &["glBegin"], &["GL_CURRENT_BIT"])],
            ),
            level(
                gles2(2, 0),
                vec![block(None, &["glClear", "glBindTexture", "glShaderBinary"], &["GL_TRIANGLES"])],
                vec![],
            ),
        ]
    }

    #[test]
    fn test_is_compatible() {
        assert!(is_compatible(&gl(3, 3), &gl(3, 3)));
        assert!(is_compatible(&gl(3, 3), &gl(1, 1)));
        assert!(!is_compatible(&gl(3, 3), &gl(3, 4)));
        assert!(!is_compatible(&gl(3, 3), &gles2(3, 1)));
        assert!(!is_compatible(
            &Feature::new(FeatureApi::Gles1, FeatureVersion::new(1, 0)),
            &gles2(2, 0)
        ));
    }

    #[test]
    fn test_is_compatible_reflexive() {
        for api in FeatureApi::REGISTRY_APIS {
            for (major, minor) in [(1, 0), (2, 0), (3, 2), (4, 6)] {
                let feature = Feature::new(api, FeatureVersion::new(major, minor));
                assert!(is_compatible(&feature, &feature));
            }
        }
    }

    #[test]
    fn test_earliest_version_wins() {
        let levels = sample_levels();
        let refs: Vec<_> = levels.iter().collect();
        let requirements = feature_requirements(&gl(3, 1), &refs, Profile::Core).unwrap();

        assert_eq!(requirements.commands["glClear"], FeatureVersion::new(1, 0));
        assert_eq!(requirements.commands["glBindTexture"], FeatureVersion::new(1, 1));
        assert_eq!(
            requirements.commands["glDrawArraysInstanced"],
            FeatureVersion::new(3, 1)
        );
        assert!(!requirements.is_merged);
    }

    #[test]
    fn test_newer_levels_are_ignored() {
        let levels = sample_levels();
        let refs: Vec<_> = levels.iter().collect();
        let requirements = feature_requirements(&gl(1, 1), &refs, Profile::Core).unwrap();

        assert!(requirements.commands.contains_key("glBegin"));
        assert!(!requirements.commands.contains_key("glDrawArraysInstanced"));
        assert!(!requirements.commands.contains_key("glShaderBinary"));
    }

    #[test]
    fn test_removal_applies_to_later_targets_only() {
        let levels = sample_levels();
        let refs: Vec<_> = levels.iter().collect();

        let old = feature_requirements(&gl(1, 1), &refs, Profile::Core).unwrap();
        assert!(old.commands.contains_key("glBegin"));
        assert!(old.enums.contains_key("GL_CURRENT_BIT"));

        let new = feature_requirements(&gl(3, 1), &refs, Profile::Core).unwrap();
        assert!(!new.commands.contains_key("glBegin"));
        assert!(!new.enums.contains_key("GL_CURRENT_BIT"));

        // resolving the older target again is unaffected by the newer one
        let again = feature_requirements(&gl(1, 1), &refs, Profile::Core).unwrap();
        assert_eq!(old, again);
    }

    #[test]
    fn test_removal_respects_profile() {
        let levels = sample_levels();
        let refs: Vec<_> = levels.iter().collect();
        let requirements =
            feature_requirements(&gl(3, 1), &refs, Profile::Compatibility).unwrap();

        assert_eq!(requirements.commands["glBegin"], FeatureVersion::new(1, 0));
    }

    #[test]
    fn test_levels_are_sorted_before_resolution() {
        let mut levels = sample_levels();
        levels.reverse();
        let refs: Vec<_> = levels.iter().collect();
        let requirements = feature_requirements(&gl(3, 1), &refs, Profile::Core).unwrap();

        assert_eq!(requirements.commands["glClear"], FeatureVersion::new(1, 0));
        assert!(!requirements.commands.contains_key("glBegin"));
    }

    #[test]
    fn test_unknown_feature_lists_choices() {
        let levels = sample_levels();
        let refs: Vec<_> = levels.iter().collect();
        let err = feature_requirements(
            &Feature::new(FeatureApi::Glsc2, FeatureVersion::new(2, 0)),
            &refs,
            Profile::Core,
        )
        .unwrap_err();

        match err {
            FeatureError::UnknownFeature {
                requested,
                available,
            } => {
                assert_eq!(requested.api, FeatureApi::Glsc2);
                assert_eq!(available, vec![gl(1, 0), gl(1, 1), gl(3, 1), gles2(2, 0)]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_undeclared_version_resolves_over_compatible_levels() {
        let levels = sample_levels();
        let refs: Vec<_> = levels.iter().collect();
        let requirements = feature_requirements(&gl(2, 0), &refs, Profile::Core).unwrap();

        let commands: Vec<_> = requirements.commands.keys().cloned().collect();
        assert_eq!(commands, vec!["glBegin", "glClear", "glBindTexture"]);
    }

    #[test]
    fn test_removal_covers_its_major_version_line() {
        let levels = sample_levels();
        let refs: Vec<_> = levels.iter().collect();

        // the removal declared at 3.1 holds for all of 3.x
        let requirements = feature_requirements(&gl(3, 0), &refs, Profile::Core).unwrap();
        assert!(!requirements.commands.contains_key("glBegin"));
        assert!(!requirements.enums.contains_key("GL_CURRENT_BIT"));
        assert!(!requirements.commands.contains_key("glDrawArraysInstanced"));
        assert_eq!(requirements.commands["glClear"], FeatureVersion::new(1, 0));
    }

    #[test]
    fn test_merge_intersects_keys() {
        let levels = sample_levels();
        let refs: Vec<_> = levels.iter().collect();
        let desktop = feature_requirements(&gl(1, 1), &refs, Profile::Core).unwrap();
        let embedded = feature_requirements(&gles2(2, 0), &refs, Profile::Core).unwrap();

        let (feature, merged) = merge_requirements(vec![
            (gl(1, 1), desktop.clone()),
            (gles2(2, 0), embedded.clone()),
        ])
        .unwrap();

        assert_eq!(feature, Feature::merged());
        assert!(merged.is_merged);
        let commands: Vec<_> = merged.commands.keys().cloned().collect();
        assert_eq!(commands, vec!["glClear", "glBindTexture"]);
        for name in desktop.commands.keys() {
            assert_eq!(
                merged.commands.contains_key(name),
                embedded.commands.contains_key(name)
            );
        }
        let enums: Vec<_> = merged.enums.keys().cloned().collect();
        assert_eq!(enums, vec!["GL_TRIANGLES"]);
        assert_eq!(merged.commands["glBindTexture"], FeatureVersion::new(1, 1));
    }

    #[test]
    fn test_merge_single_target_is_unchanged() {
        let levels = sample_levels();
        let refs: Vec<_> = levels.iter().collect();
        let requirements = feature_requirements(&gl(1, 0), &refs, Profile::Core).unwrap();

        let (feature, merged) =
            merge_requirements(vec![(gl(1, 0), requirements.clone())]).unwrap();
        assert_eq!(feature, gl(1, 0));
        assert_eq!(merged, requirements);
        assert!(!merged.is_merged);
    }

    #[test]
    fn test_merge_without_targets_fails() {
        assert_eq!(merge_requirements(vec![]), Err(FeatureError::NoTargets));
    }

    #[test]
    fn test_resolve_requirements_multiple_targets() {
        let levels = sample_levels();
        let refs: Vec<_> = levels.iter().collect();
        let (feature, requirements) =
            resolve_requirements(&[gl(3, 1), gles2(2, 0)], &refs, &[], Profile::Core).unwrap();

        assert_eq!(feature.api, FeatureApi::Merged);
        assert!(requirements.is_merged);
        let commands: Vec<_> = requirements.commands.keys().cloned().collect();
        assert_eq!(commands, vec!["glClear", "glBindTexture"]);
    }
}
