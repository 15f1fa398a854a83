mod common;

use common::{Stores, assert_prefs, assert_prefs_empty, init_prefs};
use pref_migrator::collect::maps::{google_map_type, mapbox_style};
use pref_migrator::prelude::*;

fn s(value: &str) -> PrefValue {
    PrefValue::from(value)
}

fn check_map(sdk: &str, basemap: &str, expected: &[(&str, PrefValue)]) {
    let mut stores = Stores::new();
    init_prefs(
        &mut stores.general,
        &[("map_sdk_behavior", s(sdk)), ("map_basemap_behavior", s(basemap))],
    );
    stores.run_migrations();
    assert_prefs(&stores.general, expected);
}

#[test]
fn migrates_google_map_settings() {
    let google = |map_type: i32| {
        [
            ("basemap_source", s("google")),
            ("google_map_style", PrefValue::from(map_type.to_string())),
        ]
    };
    check_map("google_maps", "streets", &google(google_map_type::NORMAL));
    check_map("google_maps", "satellite", &google(google_map_type::SATELLITE));
    check_map("google_maps", "terrain\u{200e}", &google(google_map_type::TERRAIN));
    check_map("google_maps", "hybrid", &google(google_map_type::HYBRID));
}

#[test]
fn google_style_is_the_decimal_map_type() {
    check_map(
        "google_maps",
        "satellite",
        &[("basemap_source", s("google")), ("google_map_style", s("2"))],
    );
}

#[test]
fn migrates_mapbox_map_settings() {
    let mapbox = |style: &str| [("basemap_source", s("mapbox")), ("mapbox_map_style", s(style))];
    check_map("mapbox_maps", "mapbox_streets", &mapbox(mapbox_style::STREETS));
    check_map("mapbox_maps", "mapbox_light", &mapbox(mapbox_style::LIGHT));
    check_map("mapbox_maps", "mapbox_dark", &mapbox(mapbox_style::DARK));
    check_map("mapbox_maps", "mapbox_satellite", &mapbox(mapbox_style::SATELLITE));
    check_map(
        "mapbox_maps",
        "mapbox_satellite_streets",
        &mapbox(mapbox_style::SATELLITE_STREETS),
    );
    check_map("mapbox_maps", "mapbox_outdoors", &mapbox(mapbox_style::OUTDOORS));
}

#[test]
fn migrates_osm_map_settings() {
    check_map("osmdroid", "openmap_streets", &[("basemap_source", s("osm"))]);
    check_map(
        "osmdroid",
        "openmap_usgs_topo",
        &[("basemap_source", s("usgs")), ("usgs_map_style", s("topographic"))],
    );
    check_map(
        "osmdroid",
        "openmap_usgs_sat",
        &[("basemap_source", s("usgs")), ("usgs_map_style", s("hybrid"))],
    );
    check_map(
        "osmdroid",
        "openmap_usgs_img",
        &[("basemap_source", s("usgs")), ("usgs_map_style", s("satellite"))],
    );
    check_map("osmdroid", "openmap_stamen_terrain", &[("basemap_source", s("stamen"))]);
    check_map(
        "osmdroid",
        "openmap_cartodb_positron",
        &[("basemap_source", s("carto")), ("carto_map_style", s("positron"))],
    );
    check_map(
        "osmdroid",
        "openmap_cartodb_darkmatter",
        &[("basemap_source", s("carto")), ("carto_map_style", s("dark_matter"))],
    );
}

#[test]
fn unknown_basemap_only_sets_the_source() {
    check_map("google_maps", "moon", &[("basemap_source", s("google"))]);
    check_map("mapbox_maps", "streets", &[("basemap_source", s("mapbox"))]);
    check_map("osmdroid", "openmap_unknown", &[("basemap_source", s("osm"))]);
}

#[test]
fn missing_sdk_defaults_to_google() {
    let mut stores = Stores::new();
    init_prefs(&mut stores.general, &[("map_basemap_behavior", s("hybrid"))]);
    stores.run_migrations();
    assert_prefs(
        &stores.general,
        &[("basemap_source", s("google")), ("google_map_style", s("4"))],
    );
}

#[test]
fn sdk_without_basemap_sets_the_source() {
    let mut stores = Stores::new();
    init_prefs(&mut stores.general, &[("map_sdk_behavior", s("mapbox_maps"))]);
    stores.run_migrations();
    assert_prefs(&stores.general, &[("basemap_source", s("mapbox"))]);
}

#[test]
fn unknown_sdk_is_left_alone_and_reported() {
    let mut stores = Stores::new();
    let legacy = [
        ("map_sdk_behavior", s("bing_maps")),
        ("map_basemap_behavior", s("aerial")),
    ];
    init_prefs(&mut stores.general, &legacy);

    let report = stores.run_migrations();

    assert_prefs(&stores.general, &legacy);
    assert!(matches!(report.outcome("map_provider"), Some(RuleOutcome::Skipped(_))));
    assert!(!report.is_clean());
}

#[test]
fn migrates_admin_settings() {
    let mut stores = Stores::new();

    init_prefs(&mut stores.admin, &[("unrelated", s("value"))]);
    stores.run_migrations();
    assert_prefs(&stores.admin, &[("unrelated", s("value"))]);

    init_prefs(&mut stores.admin, &[("show_map_sdk", PrefValue::Bool(true))]);
    stores.run_migrations();
    assert_prefs(&stores.admin, &[("show_map_sdk", PrefValue::Bool(true))]);

    init_prefs(&mut stores.admin, &[("show_map_sdk", PrefValue::Bool(false))]);
    stores.run_migrations();
    assert_prefs(&stores.admin, &[("maps", PrefValue::Bool(false))]);

    init_prefs(&mut stores.admin, &[("show_map_basemap", PrefValue::Bool(true))]);
    stores.run_migrations();
    assert_prefs(&stores.admin, &[("show_map_basemap", PrefValue::Bool(true))]);

    init_prefs(&mut stores.admin, &[("show_map_basemap", PrefValue::Bool(false))]);
    stores.run_migrations();
    assert_prefs(&stores.admin, &[("maps", PrefValue::Bool(false))]);
}

#[test]
fn absent_admin_flags_write_nothing() {
    let mut stores = Stores::new();
    stores.run_migrations();
    assert_prefs_empty(&stores.admin);
}

#[test]
fn both_admin_flags_hidden_collapse_to_one_key() {
    let mut stores = Stores::new();
    init_prefs(
        &mut stores.admin,
        &[
            ("show_map_sdk", PrefValue::Bool(false)),
            ("show_map_basemap", PrefValue::Bool(false)),
        ],
    );
    stores.run_migrations();
    assert_prefs(&stores.admin, &[("maps", PrefValue::Bool(false))]);
}

#[test]
fn migrates_meta_keys_to_meta_prefs() {
    let mut stores = Stores::new();
    init_prefs(
        &mut stores.general,
        &[
            ("firstRun", PrefValue::Bool(true)),
            ("lastVersion", PrefValue::Long(1)),
            ("scoped_storage_used", PrefValue::Bool(true)),
            ("metadata_migrated", PrefValue::Bool(true)),
            ("mapbox_initialized", PrefValue::Bool(true)),
        ],
    );

    stores.run_migrations();

    assert_prefs_empty(&stores.general);
    assert_prefs(
        &stores.meta,
        &[
            ("scoped_storage_used", PrefValue::Bool(true)),
            ("mapbox_initialized", PrefValue::Bool(true)),
        ],
    );
}

#[test]
fn moved_meta_keys_keep_their_value() {
    let mut stores = Stores::new();
    init_prefs(&mut stores.general, &[("scoped_storage_used", PrefValue::Bool(false))]);
    stores.run_migrations();
    assert_prefs_empty(&stores.general);
    assert_prefs(&stores.meta, &[("scoped_storage_used", PrefValue::Bool(false))]);
}

#[test]
fn migrates_server_type() {
    let mut stores = Stores::new();
    init_prefs(&mut stores.general, &[("protocol", s("other_protocol"))]);
    stores.run_migrations();
    assert_prefs(&stores.general, &[("protocol", s("odk_default"))]);
}

#[test]
fn keeps_recognised_server_types() {
    let mut stores = Stores::new();
    init_prefs(&mut stores.general, &[("protocol", s("google_sheets"))]);
    let report = stores.run_migrations();
    assert_prefs(&stores.general, &[("protocol", s("google_sheets"))]);
    assert_eq!(report.outcome("server_protocol"), Some(&RuleOutcome::Unchanged));
}

#[test]
fn migrates_autosend_settings() {
    let cases = [
        (false, false, "off"),
        (true, false, "wifi_only"),
        (false, true, "cellular_only"),
        (true, true, "wifi_and_cellular"),
    ];
    for (wifi, network, expected) in cases {
        let mut stores = Stores::new();
        init_prefs(
            &mut stores.general,
            &[
                ("autosend_wifi", PrefValue::Bool(wifi)),
                ("autosend_network", PrefValue::Bool(network)),
            ],
        );
        stores.run_migrations();
        assert_prefs(&stores.general, &[("autosend", s(expected))]);
    }
}

#[test]
fn autosend_with_one_switch_uses_default_for_the_other() {
    let mut stores = Stores::new();
    init_prefs(&mut stores.general, &[("autosend_network", PrefValue::Bool(true))]);
    stores.run_migrations();
    assert_prefs(&stores.general, &[("autosend", s("cellular_only"))]);
}

#[test]
fn malformed_autosend_is_skipped() {
    let mut stores = Stores::new();
    let legacy = [
        ("autosend_wifi", s("yes")),
        ("autosend_network", PrefValue::Bool(false)),
    ];
    init_prefs(&mut stores.general, &legacy);

    let report = stores.run_migrations();

    assert_prefs(&stores.general, &legacy);
    assert!(matches!(report.outcome("autosend"), Some(RuleOutcome::Skipped(_))));
}

#[test]
fn unrelated_general_keys_pass_through() {
    let mut stores = Stores::new();
    init_prefs(
        &mut stores.general,
        &[
            ("server_url", s("https://example.org")),
            ("app_font_size", PrefValue::Int(21)),
            ("autosend_wifi", PrefValue::Bool(true)),
        ],
    );
    stores.run_migrations();
    assert_prefs(
        &stores.general,
        &[
            ("server_url", s("https://example.org")),
            ("app_font_size", PrefValue::Int(21)),
            ("autosend", s("wifi_only")),
        ],
    );
}

#[test]
fn dry_run_reports_what_a_real_run_applies() {
    let legacy = [
        ("map_sdk_behavior", s("osmdroid")),
        ("map_basemap_behavior", s("openmap_cartodb_positron")),
        ("firstRun", PrefValue::Bool(true)),
        ("autosend_wifi", PrefValue::Bool(true)),
    ];

    let mut preview = Stores::new();
    init_prefs(&mut preview.general, &legacy);
    let dry = PreferenceMigrator::collect()
        .with_options(MigrationOptions::builder().dry_run(true).build())
        .migrate(&mut preview.general, &mut preview.admin, &mut preview.meta);
    assert_prefs(&preview.general, &legacy);

    let mut real = Stores::new();
    init_prefs(&mut real.general, &legacy);
    let applied = real.run_migrations();

    assert!(dry.dry_run);
    assert!(!applied.dry_run);
    assert_eq!(
        dry.changes().collect::<Vec<_>>(),
        applied.changes().collect::<Vec<_>>()
    );
}

#[test]
fn second_pass_changes_nothing() {
    let mut stores = Stores::new();
    init_prefs(
        &mut stores.general,
        &[
            ("map_sdk_behavior", s("google_maps")),
            ("map_basemap_behavior", s("terrain")),
            ("protocol", s("other_protocol")),
            ("lastVersion", PrefValue::Long(4021)),
            ("mapbox_initialized", PrefValue::Bool(true)),
            ("autosend_wifi", PrefValue::Bool(false)),
        ],
    );
    init_prefs(&mut stores.admin, &[("show_map_basemap", PrefValue::Bool(false))]);

    let first = stores.run_migrations();
    assert!(first.has_changes());
    let after_first = (stores.general.clone(), stores.admin.clone(), stores.meta.clone());

    let second = stores.run_migrations();
    assert!(!second.has_changes());
    assert!(second.is_clean());
    assert_eq!(
        (stores.general.clone(), stores.admin.clone(), stores.meta.clone()),
        after_first
    );
}
