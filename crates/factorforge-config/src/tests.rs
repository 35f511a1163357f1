//! Tests for factor graph configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        [domain]
        max_categories = 100
        freeze_on_build = true

        [weights]
        initial_value = 0.5
        convergence_threshold = 0.001

        [scoring]
        neighborhood = "contained"
        parallel_threshold = 64
    "#;

    let config = FactorGraphConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.domain.max_categories, Some(100));
    assert!(config.domain.freeze_on_build);
    assert_eq!(config.weights.initial_value, 0.5);
    assert_eq!(config.weights.convergence_threshold, 0.001);
    assert_eq!(config.scoring.neighborhood, NeighborhoodConfig::Contained);
    assert_eq!(config.scoring.parallel_threshold, 64);
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        domain:
          max_categories: 10
        scoring:
          neighborhood: any
    "#;

    let config = FactorGraphConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.domain.max_categories, Some(10));
    assert!(!config.domain.freeze_on_build);
    assert_eq!(config.scoring.neighborhood, NeighborhoodConfig::Any);
    assert_eq!(
        config.scoring.parallel_threshold,
        DEFAULT_PARALLEL_THRESHOLD
    );
}

#[test]
fn test_defaults_for_missing_sections() {
    let config = FactorGraphConfig::from_toml_str("").unwrap();
    assert_eq!(config, FactorGraphConfig::default());
    assert_eq!(config.domain.max_categories, None);
    assert_eq!(config.weights.initial_value, 0.0);
    assert_eq!(
        config.weights.convergence_threshold,
        DEFAULT_CONVERGENCE_THRESHOLD
    );
    assert_eq!(config.scoring.neighborhood, NeighborhoodConfig::Any);
}

#[test]
fn test_partial_section_keeps_field_defaults() {
    let config = FactorGraphConfig::from_toml_str(
        r#"
        [weights]
        initial_value = 1.0
    "#,
    )
    .unwrap();
    assert_eq!(config.weights.initial_value, 1.0);
    assert_eq!(
        config.weights.convergence_threshold,
        DEFAULT_CONVERGENCE_THRESHOLD
    );
}

#[test]
fn test_unknown_neighborhood_is_rejected() {
    let result = FactorGraphConfig::from_toml_str(
        r#"
        [scoring]
        neighborhood = "exact"
    "#,
    );
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}

#[test]
fn test_builder() {
    let config = FactorGraphConfig::new()
        .with_max_categories(50)
        .with_freeze_on_build(true)
        .with_initial_value(0.1)
        .with_convergence_threshold(1e-3)
        .with_neighborhood(NeighborhoodConfig::Contained)
        .with_parallel_threshold(8);

    assert_eq!(config.domain.max_categories, Some(50));
    assert!(config.domain.freeze_on_build);
    assert_eq!(config.weights.initial_value, 0.1);
    assert_eq!(config.scoring.parallel_threshold, 8);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_bad_values() {
    let zero_limit = FactorGraphConfig::new().with_max_categories(0);
    assert!(matches!(
        zero_limit.validate(),
        Err(ConfigError::Invalid(_))
    ));

    let negative = FactorGraphConfig::new().with_convergence_threshold(-1.0);
    assert!(matches!(negative.validate(), Err(ConfigError::Invalid(_))));

    let nan = FactorGraphConfig::new().with_convergence_threshold(f64::NAN);
    assert!(matches!(nan.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_load_missing_file() {
    let result = FactorGraphConfig::load("/nonexistent/factorforge.toml");
    assert!(matches!(result, Err(ConfigError::Io(_))));
    assert_eq!(
        FactorGraphConfig::load("/nonexistent/factorforge.yaml")
            .unwrap_or_default()
            .scoring
            .parallel_threshold,
        DEFAULT_PARALLEL_THRESHOLD
    );
}

#[test]
fn test_load_by_extension() {
    let dir = std::env::temp_dir();
    let yaml_path = dir.join(format!("factorforge-config-{}.yaml", std::process::id()));
    std::fs::write(&yaml_path, "scoring:\n  parallel_threshold: 3\n").unwrap();
    let config = FactorGraphConfig::load(&yaml_path).unwrap();
    std::fs::remove_file(&yaml_path).unwrap();
    assert_eq!(config.scoring.parallel_threshold, 3);

    let toml_path = dir.join(format!("factorforge-config-{}.toml", std::process::id()));
    std::fs::write(&toml_path, "[scoring]\nparallel_threshold = 4\n").unwrap();
    let config = FactorGraphConfig::load(&toml_path).unwrap();
    std::fs::remove_file(&toml_path).unwrap();
    assert_eq!(config.scoring.parallel_threshold, 4);
}
