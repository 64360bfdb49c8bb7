/*!
 * Tests for configuration and preference merging
 */

use subsync::app_config::{
    Config, PartialPreferences, PartialStyle, PartialTrackStyles, PartialVideoSettings,
    SubtitleMode, UserPreferences,
};

#[test]
fn test_defaults_shouldMatchShippedStyleValues() {
    let prefs = UserPreferences::default();

    assert_eq!(prefs.subtitle_mode, SubtitleMode::Both);
    assert_eq!(prefs.styles.primary.font_size, 22);
    assert_eq!(prefs.styles.primary.color, "#ffffff");
    assert_eq!(prefs.styles.primary.background, "rgba(0,0,0,0.78)");
    assert_eq!(prefs.styles.secondary.font_size, 17);
    assert_eq!(prefs.styles.secondary.color, "#fde08d");
    assert_eq!(prefs.video.width_percent, 100);
    assert_eq!(prefs.video.aspect_ratio, "16:9");
}

#[test]
fn test_mergedWithDefaults_withSparseOverride_shouldKeepOtherDefaults() {
    let partial = PartialPreferences {
        subtitle_mode: None,
        styles: Some(PartialTrackStyles {
            primary: Some(PartialStyle {
                font_size: Some(30),
                color: None,
                background: None,
            }),
            secondary: None,
        }),
        video: None,
    };

    let merged = UserPreferences::merged_with_defaults(partial);

    assert_eq!(merged.styles.primary.font_size, 30);
    // Untouched fields keep their defaults
    assert_eq!(merged.styles.primary.color, "#ffffff");
    assert_eq!(merged.styles.secondary, UserPreferences::default().styles.secondary);
    assert_eq!(merged.subtitle_mode, SubtitleMode::Both);
}

#[test]
fn test_apply_withVideoOverride_shouldUpdateOnlyGivenFields() {
    let mut prefs = UserPreferences::default();

    prefs.apply(PartialPreferences {
        subtitle_mode: Some(SubtitleMode::Secondary),
        styles: None,
        video: Some(PartialVideoSettings {
            width_percent: Some(70),
            aspect_ratio: None,
        }),
    });

    assert_eq!(prefs.subtitle_mode, SubtitleMode::Secondary);
    assert_eq!(prefs.video.width_percent, 70);
    assert_eq!(prefs.video.aspect_ratio, "16:9");
}

#[test]
fn test_config_deserialization_withMissingFields_shouldFillDefaults() {
    let config: Config = serde_json::from_str("{}").unwrap();

    assert_eq!(config.poll_interval_ms, 100);
    assert_eq!(config.preferences, UserPreferences::default());
}

#[test]
fn test_config_deserialization_withPartialStyles_shouldFillDefaults() {
    let json = r##"{
        "preferences": {
            "subtitle_mode": "primary",
            "styles": { "primary": { "font_size": 28, "color": "#ff0000", "background": "rgba(0,0,0,0.5)" } }
        }
    }"##;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.preferences.subtitle_mode, SubtitleMode::Primary);
    assert_eq!(config.preferences.styles.primary.font_size, 28);
    assert_eq!(
        config.preferences.styles.secondary,
        UserPreferences::default().styles.secondary
    );
}

#[test]
fn test_validate_withDefaultConfig_shouldPass() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_withZeroPollInterval_shouldFail() {
    let mut config = Config::default();
    config.poll_interval_ms = 0;

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withOutOfRangeWidth_shouldFail() {
    let mut config = Config::default();
    config.preferences.video.width_percent = 5;

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withBadAspectRatio_shouldFail() {
    let mut config = Config::default();
    config.preferences.video.aspect_ratio = "widescreen".to_string();

    assert!(config.validate().is_err());
}

#[test]
fn test_subtitleMode_fromStr_shouldRoundTrip() {
    for mode in [
        SubtitleMode::Off,
        SubtitleMode::Primary,
        SubtitleMode::Secondary,
        SubtitleMode::Both,
    ] {
        let parsed: SubtitleMode = mode.to_string().parse().unwrap();
        assert_eq!(parsed, mode);
    }

    assert!("bilingual".parse::<SubtitleMode>().is_err());
}

#[test]
fn test_subtitleMode_visibility_shouldGateTracks() {
    assert!(SubtitleMode::Both.shows_primary() && SubtitleMode::Both.shows_secondary());
    assert!(SubtitleMode::Primary.shows_primary() && !SubtitleMode::Primary.shows_secondary());
    assert!(!SubtitleMode::Secondary.shows_primary() && SubtitleMode::Secondary.shows_secondary());
    assert!(!SubtitleMode::Off.shows_primary() && !SubtitleMode::Off.shows_secondary());
}
