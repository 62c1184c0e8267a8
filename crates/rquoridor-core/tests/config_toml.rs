//! TOML からの設定読み込み

use rquoridor_core::poshash::{DiscardStrategy, HashConfig, TierConfig};

#[test]
fn test_tier_config_from_toml() {
    let src = r#"
        max_progress = 20
        clear_max_tier_on_reach = false
        memory_budget = 1048576

        [table]
        bucket_count = 4096
        block_size = 256

        [discard_strategy]
        kind = "every_nth"
        keep_every = 3
    "#;
    let config: TierConfig = toml::from_str(src).unwrap();
    assert_eq!(config.max_progress, 20);
    assert!(!config.clear_max_tier_on_reach);
    assert_eq!(config.memory_budget, Some(1 << 20));
    assert_eq!(config.table.bucket_count, 4096);
    assert_eq!(config.table.block_size, 256);
    assert_eq!(config.table.max_blocks, None);
    assert_eq!(config.discard_strategy, DiscardStrategy::EveryNth { keep_every: 3 });
    assert!(config.validate().is_ok());
}

#[test]
fn test_tier_config_defaults_from_empty_toml() {
    let config: TierConfig = toml::from_str("").unwrap();
    assert_eq!(config, TierConfig::default());
    assert_eq!(config.table, HashConfig::default());
}
