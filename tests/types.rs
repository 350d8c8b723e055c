// ABOUTME: Integration tests for validated value types.
// ABOUTME: Tests container name normalization and image reference parsing.

use eosup::types::*;
use proptest::prelude::*;

mod container_name_tests {
    use super::*;

    #[test]
    fn bare_name_gains_leading_slash() {
        let name = ContainerName::new("eosio").unwrap();
        assert_eq!(name.as_str(), "/eosio");
    }

    #[test]
    fn slashed_name_is_unchanged() {
        let name = ContainerName::new("/eosio").unwrap();
        assert_eq!(name.as_str(), "/eosio");
    }

    #[test]
    fn trimmed_strips_the_slash() {
        let name = ContainerName::new("eosio").unwrap();
        assert_eq!(name.trimmed(), "eosio");
    }

    #[test]
    fn empty_returns_error() {
        assert!(ContainerName::new("").is_err());
        assert!(ContainerName::new("/").is_err());
    }

    #[test]
    fn invalid_chars_return_error() {
        assert!(ContainerName::new("my node").is_err()); // space
        assert!(ContainerName::new("node:1").is_err()); // colon
        assert!(ContainerName::new("a/b").is_err()); // interior slash
    }

    #[test]
    fn allowed_punctuation() {
        assert!(ContainerName::new("eos_dev-1.0").is_ok());
    }
}

mod image_ref_tests {
    use super::*;

    #[test]
    fn parse_simple_name_defaults_to_latest() {
        let img = ImageRef::parse("eos-dev").unwrap();
        assert_eq!(img.name(), "eos-dev");
        assert_eq!(img.tag(), "latest");
        assert!(img.registry().is_none());
    }

    #[test]
    fn parse_name_with_tag() {
        let img = ImageRef::parse("eosio/eos-dev:v1.8.0").unwrap();
        assert_eq!(img.name(), "eosio/eos-dev");
        assert_eq!(img.tag(), "v1.8.0");
    }

    #[test]
    fn parse_with_registry() {
        let img = ImageRef::parse("registry.example.com:5000/eos-dev:latest").unwrap();
        assert_eq!(img.registry(), Some("registry.example.com:5000"));
        assert_eq!(img.name(), "eos-dev");
        assert_eq!(img.repository(), "registry.example.com:5000/eos-dev");
    }

    #[test]
    fn org_prefix_is_part_of_the_name() {
        let img = ImageRef::parse("eosio/eos-dev").unwrap();
        assert!(img.registry().is_none());
        assert_eq!(img.name(), "eosio/eos-dev");
        assert_eq!(img.repository(), "eosio/eos-dev");
    }

    #[test]
    fn display_round_trips() {
        let img = ImageRef::parse("eosio/eos-dev:latest").unwrap();
        assert_eq!(img.to_string(), "eosio/eos-dev:latest");
    }

    #[test]
    fn display_appends_the_default_tag() {
        let img = ImageRef::parse("eosio/eos-dev").unwrap();
        assert_eq!(img.to_string(), "eosio/eos-dev:latest");
    }

    #[test]
    fn parse_empty_returns_error() {
        assert!(ImageRef::parse("").is_err());
        assert!(ImageRef::parse("   ").is_err());
    }

    #[test]
    fn parse_invalid_chars_returns_error() {
        assert!(ImageRef::parse("bad image!").is_err());
    }
}

mod id_tests {
    use super::*;

    #[test]
    fn ids_compare_by_value() {
        let a = ContainerId::new("abc".to_string());
        let b = ContainerId::new("abc".to_string());
        let c = ContainerId::new("def".to_string());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn display_is_the_raw_value() {
        let id = ContainerId::new("abc123".to_string());
        assert_eq!(id.to_string(), "abc123");
        assert_eq!(id.as_str(), "abc123");
    }
}

proptest! {
    #[test]
    fn normalization_is_idempotent(raw in "[a-zA-Z0-9][a-zA-Z0-9_.-]{0,31}") {
        let first = ContainerName::new(&raw).unwrap();
        let second = ContainerName::new(first.as_str()).unwrap();
        prop_assert_eq!(first.as_str(), second.as_str());
        prop_assert!(first.as_str().starts_with('/'));
        prop_assert!(!first.as_str()[1..].contains('/'));
    }
}
