//! Property-based tests for the configuration system.

use super::merger::ConfigMerger;
use super::schema::{Config, ExpiryConfig, OutputFormat};
use super::validator::{ConfigValidator, MAX_HOLD_TTL_HOURS};
use proptest::prelude::*;

fn output_format_strategy() -> impl Strategy<Value = OutputFormat> {
    prop_oneof![
        Just(OutputFormat::Json),
        Just(OutputFormat::Csv),
        Just(OutputFormat::Table),
    ]
}

fn expiry_strategy() -> impl Strategy<Value = ExpiryConfig> {
    (
        prop::option::of(1u32..=MAX_HOLD_TTL_HOURS),
        prop::option::of(1u32..=1440),
    )
        .prop_map(|(hold_ttl_hours, sweep_interval_minutes)| ExpiryConfig {
            hold_ttl_hours,
            sweep_interval_minutes,
        })
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(expiry_strategy()),
        prop::option::of(any::<bool>()),
        prop::option::of(1u64..=600),
        prop::option::of(output_format_strategy()),
    )
        .prop_map(
            |(expiry, disable_autoinit, maximum_lock_wait_seconds, output_format)| Config {
                expiry,
                disable_autoinit,
                maximum_lock_wait_seconds,
                output_format,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    // Merging an empty config changes nothing
    #[test]
    fn merge_empty_is_identity(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &Config::default());
        prop_assert_eq!(merged, config);
    }

    // A value set in the higher-precedence source always wins
    #[test]
    fn merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut merged = low.clone();
        ConfigMerger::merge_into(&mut merged, &high);

        prop_assert_eq!(
            merged.maximum_lock_wait_seconds,
            high.maximum_lock_wait_seconds.or(low.maximum_lock_wait_seconds)
        );
        prop_assert_eq!(merged.disable_autoinit, high.disable_autoinit.or(low.disable_autoinit));
        prop_assert_eq!(merged.output_format, high.output_format.or(low.output_format));

        let hold = |c: &Config| c.expiry.as_ref().and_then(|e| e.hold_ttl_hours);
        prop_assert_eq!(hold(&merged), hold(&high).or(hold(&low)));
    }

    // Generated configs stay within validator bounds, and merging keeps them there
    #[test]
    fn merged_valid_configs_stay_valid(low in config_strategy(), high in config_strategy()) {
        prop_assert!(ConfigValidator::validate(&low).is_ok());
        let mut merged = low;
        ConfigMerger::merge_into(&mut merged, &high);
        prop_assert!(ConfigValidator::validate(&merged).is_ok());
    }

    // YAML written by serde reads back identically
    #[test]
    fn yaml_roundtrip(config in config_strategy()) {
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        prop_assert_eq!(parsed, config);
    }
}
