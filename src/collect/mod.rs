//! The built-in rule table for legacy field-data-collection settings.
//!
//! Rules run in this order:
//!
//! 1. map provider consolidation (general)
//! 2. admin visibility flags for the map settings (admin)
//! 3. bookkeeping keys relocated to meta, obsolete one-time flags dropped (general)
//! 4. unknown server protocols reset to the default (general)
//! 5. autosend switches collapsed into a single mode (general)

pub mod keys;
pub mod maps;

use crate::traits::migration::{Case, KeyInput, Migration, Pattern, Rule, RuleSet};
use crate::traits::store::StoreName;
use crate::value::PrefValue;
use keys::*;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Values of the current `protocol` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ServerProtocol {
    OdkDefault,
    GoogleSheets,
}

/// Values of the current `autosend` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum AutosendMode {
    Off,
    WifiOnly,
    CellularOnly,
    WifiAndCellular,
}

impl AutosendMode {
    pub fn from_switches(wifi: bool, cellular: bool) -> Self {
        match (wifi, cellular) {
            (false, false) => AutosendMode::Off,
            (true, false) => AutosendMode::WifiOnly,
            (false, true) => AutosendMode::CellularOnly,
            (true, true) => AutosendMode::WifiAndCellular,
        }
    }
}

fn hide_map_setting(legacy_key: &str) -> Migration {
    Migration::translate_key(legacy_key, MAPS, [(PrefValue::Bool(false), PrefValue::Bool(false))])
}

fn protocol_migration() -> Migration {
    Migration::restrict_values(
        PROTOCOL,
        ServerProtocol::iter().map(|p| PrefValue::from(p.to_string())),
        PrefValue::from(ServerProtocol::OdkDefault.to_string()),
    )
}

fn autosend_migration() -> Migration {
    let switches = [(false, false), (true, false), (false, true), (true, true)];
    let cases = switches.map(|(wifi, cellular)| {
        Case::when([Pattern::is(wifi), Pattern::is(cellular)]).then([(
            AUTOSEND,
            PrefValue::from(AutosendMode::from_switches(wifi, cellular).to_string()),
        )])
    });
    Migration::combine_keys(
        [
            KeyInput::with_default(AUTOSEND_WIFI, false),
            KeyInput::with_default(AUTOSEND_NETWORK, false),
        ],
        cases,
    )
}

/// Every legacy settings rule, in application order.
pub fn rules() -> RuleSet {
    use StoreName::*;

    [
        Rule::new("map_provider", General, maps::provider_migration()),
        Rule::new("admin_show_map_sdk", Admin, hide_map_setting(SHOW_MAP_SDK)),
        Rule::new("admin_show_map_basemap", Admin, hide_map_setting(SHOW_MAP_BASEMAP)),
        Rule::new(
            "meta_scoped_storage_used",
            General,
            Migration::move_key(SCOPED_STORAGE_USED, Meta),
        ),
        Rule::new(
            "meta_mapbox_initialized",
            General,
            Migration::move_key(MAPBOX_INITIALIZED, Meta),
        ),
        Rule::new(
            "obsolete_flags",
            General,
            Migration::remove_keys([FIRST_RUN, LAST_VERSION, METADATA_MIGRATED]),
        ),
        Rule::new("server_protocol", General, protocol_migration()),
        Rule::new("autosend", General, autosend_migration()),
    ]
    .into_iter()
    .collect()
}
