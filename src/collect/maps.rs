//! Legacy map provider settings and what they become.
//!
//! Older releases stored the mapping SDK and the basemap as two independent
//! list preferences. Current releases store a single basemap source plus one
//! style key per provider.

use super::keys::*;
use crate::traits::migration::{Case, KeyInput, Migration, Pattern};
use crate::value::PrefValue;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Values of the legacy `map_sdk_behavior` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum LegacyMapSdk {
    GoogleMaps,
    MapboxMaps,
    Osmdroid,
}

impl LegacyMapSdk {
    /// Source chosen when the legacy basemap is absent or not in the table.
    pub fn default_source(self) -> BasemapSource {
        match self {
            LegacyMapSdk::GoogleMaps => BasemapSource::Google,
            LegacyMapSdk::MapboxMaps => BasemapSource::Mapbox,
            LegacyMapSdk::Osmdroid => BasemapSource::Osm,
        }
    }
}

/// Values of the current `basemap_source` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum BasemapSource {
    Google,
    Mapbox,
    Osm,
    Usgs,
    Stamen,
    Carto,
}

/// Map type constants owned by the Google Maps SDK.
///
/// Stored as their decimal string because the preference that holds them is
/// a list preference. They are opaque here: copied, never recomputed.
pub mod google_map_type {
    pub const NORMAL: i32 = 1;
    pub const SATELLITE: i32 = 2;
    pub const TERRAIN: i32 = 3;
    pub const HYBRID: i32 = 4;
}

/// Style URLs owned by the Mapbox SDK.
pub mod mapbox_style {
    pub const STREETS: &str = "mapbox://styles/mapbox/streets-v11";
    pub const LIGHT: &str = "mapbox://styles/mapbox/light-v10";
    pub const DARK: &str = "mapbox://styles/mapbox/dark-v10";
    pub const SATELLITE: &str = "mapbox://styles/mapbox/satellite-v9";
    pub const SATELLITE_STREETS: &str = "mapbox://styles/mapbox/satellite-streets-v11";
    pub const OUTDOORS: &str = "mapbox://styles/mapbox/outdoors-v11";
}

/// One row of the (sdk, basemap) lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct BasemapMapping {
    pub sdk: LegacyMapSdk,
    pub basemap: &'static str,
    pub source: BasemapSource,
    pub style: Option<(&'static str, String)>,
}

impl BasemapMapping {
    fn new(sdk: LegacyMapSdk, basemap: &'static str, source: BasemapSource) -> Self {
        Self {
            sdk,
            basemap,
            source,
            style: None,
        }
    }

    fn styled(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.style = Some((key, value.into()));
        self
    }

    /// Keys and values this row writes.
    pub fn outputs(&self) -> Vec<(&'static str, PrefValue)> {
        let mut outputs = vec![(BASEMAP_SOURCE, PrefValue::from(self.source.to_string()))];
        if let Some((key, value)) = &self.style {
            outputs.push((*key, PrefValue::from(value.as_str())));
        }
        outputs
    }
}

/// Every (sdk, basemap) pair with a known translation.
pub fn basemap_table() -> Vec<BasemapMapping> {
    use BasemapSource::*;
    use LegacyMapSdk::*;

    let google = |basemap, map_type: i32| {
        BasemapMapping::new(GoogleMaps, basemap, Google)
            .styled(GOOGLE_MAP_STYLE, map_type.to_string())
    };
    let mapbox = |basemap, style: &str| {
        BasemapMapping::new(MapboxMaps, basemap, Mapbox).styled(MAPBOX_MAP_STYLE, style)
    };

    vec![
        google("streets", google_map_type::NORMAL),
        google("satellite", google_map_type::SATELLITE),
        google("terrain", google_map_type::TERRAIN),
        google("hybrid", google_map_type::HYBRID),
        mapbox("mapbox_streets", mapbox_style::STREETS),
        mapbox("mapbox_light", mapbox_style::LIGHT),
        mapbox("mapbox_dark", mapbox_style::DARK),
        mapbox("mapbox_satellite", mapbox_style::SATELLITE),
        mapbox("mapbox_satellite_streets", mapbox_style::SATELLITE_STREETS),
        mapbox("mapbox_outdoors", mapbox_style::OUTDOORS),
        BasemapMapping::new(Osmdroid, "openmap_streets", Osm),
        BasemapMapping::new(Osmdroid, "openmap_usgs_topo", Usgs)
            .styled(USGS_MAP_STYLE, "topographic"),
        BasemapMapping::new(Osmdroid, "openmap_usgs_sat", Usgs).styled(USGS_MAP_STYLE, "hybrid"),
        BasemapMapping::new(Osmdroid, "openmap_usgs_img", Usgs).styled(USGS_MAP_STYLE, "satellite"),
        BasemapMapping::new(Osmdroid, "openmap_stamen_terrain", Stamen),
        BasemapMapping::new(Osmdroid, "openmap_cartodb_positron", Carto)
            .styled(CARTO_MAP_STYLE, "positron"),
        BasemapMapping::new(Osmdroid, "openmap_cartodb_darkmatter", Carto)
            .styled(CARTO_MAP_STYLE, "dark_matter"),
    ]
}

/// Collapse `map_sdk_behavior` + `map_basemap_behavior` into `basemap_source`
/// and a provider style key.
///
/// Table rows come first; each SDK then gets a catch-all that only writes its
/// default source. An SDK outside [`LegacyMapSdk`] matches nothing and the
/// rule is skipped.
pub fn provider_migration() -> Migration {
    let table = basemap_table().into_iter().map(|row| {
        Case::when([Pattern::is(row.sdk.to_string()), Pattern::is(row.basemap)]).then(row.outputs())
    });
    let fallbacks = LegacyMapSdk::iter().map(|sdk| {
        Case::when([Pattern::is(sdk.to_string()), Pattern::Any]).then([(
            BASEMAP_SOURCE,
            PrefValue::from(sdk.default_source().to_string()),
        )])
    });

    Migration::combine_keys(
        [
            KeyInput::with_default(MAP_SDK_BEHAVIOR, LegacyMapSdk::GoogleMaps.to_string()),
            KeyInput::optional(MAP_BASEMAP_BEHAVIOR),
        ],
        table.chain(fallbacks),
    )
}
