use docguard_core::config::{Config, GateConfig, MatcherConfig};
use pretty_assertions::assert_eq;

#[test]
fn test_matcher_config_defaults() {
    let config = MatcherConfig::default();
    assert_eq!(config.distance_threshold, 2);
    assert_eq!(config.word_removal_cost, 1);
}

#[test]
fn test_gate_config_defaults() {
    let config = GateConfig::default();
    assert_eq!(config.checker, "scope");
    assert!(config.javac_path.is_none());
    assert!(config.classpath.is_empty());
}

#[test]
fn test_default_config_is_valid() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_effective_config_renders_every_section() {
    let rendered = Config::default().to_toml_string().unwrap();
    for section in ["[matcher]", "[preprocess]", "[parser]", "[gate]", "[runtime]"] {
        assert!(rendered.contains(section), "missing {section} in:\n{rendered}");
    }
}

#[test]
fn test_partial_sections_keep_other_defaults() {
    let config = Config::from_toml_str(
        r#"
        [matcher]
        distance_threshold = 0
    "#,
    )
    .unwrap();

    assert_eq!(config.matcher.distance_threshold, 0);
    assert_eq!(config.matcher.word_removal_cost, 1);
    assert_eq!(config.gate, GateConfig::default());
}
