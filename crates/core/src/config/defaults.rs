//! Default values and functions for configuration

pub(crate) const DEFAULT_PARSER_ENGINE: &str = "rule_based";
pub(crate) const DEFAULT_CHECKER: &str = "scope";

pub(crate) const VALID_PARSER_ENGINES: &[&str] = &["rule_based"];
pub(crate) const VALID_CHECKERS: &[&str] = &["scope", "javac", "none"];

pub(crate) fn default_distance_threshold() -> usize {
    2
}

pub(crate) fn default_word_removal_cost() -> usize {
    1
}

pub(crate) fn default_remove_commas() -> bool {
    true
}

pub(crate) fn default_parser_engine() -> String {
    DEFAULT_PARSER_ENGINE.to_string()
}

pub(crate) fn default_cache_enabled() -> bool {
    true
}

pub(crate) fn default_checker() -> String {
    DEFAULT_CHECKER.to_string()
}

pub(crate) fn default_max_concurrent_methods() -> usize {
    4
}
