//! Setting keys, legacy and current.

// general: map provider
pub const MAP_SDK_BEHAVIOR: &str = "map_sdk_behavior";
pub const MAP_BASEMAP_BEHAVIOR: &str = "map_basemap_behavior";
pub const BASEMAP_SOURCE: &str = "basemap_source";
pub const GOOGLE_MAP_STYLE: &str = "google_map_style";
pub const MAPBOX_MAP_STYLE: &str = "mapbox_map_style";
pub const USGS_MAP_STYLE: &str = "usgs_map_style";
pub const CARTO_MAP_STYLE: &str = "carto_map_style";

// general: server
pub const PROTOCOL: &str = "protocol";

// general: autosend
pub const AUTOSEND_WIFI: &str = "autosend_wifi";
pub const AUTOSEND_NETWORK: &str = "autosend_network";
pub const AUTOSEND: &str = "autosend";

// general -> meta
pub const SCOPED_STORAGE_USED: &str = "scoped_storage_used";
pub const MAPBOX_INITIALIZED: &str = "mapbox_initialized";

// general: one-time flags that are no longer read
pub const FIRST_RUN: &str = "firstRun";
pub const LAST_VERSION: &str = "lastVersion";
pub const METADATA_MIGRATED: &str = "metadata_migrated";

// admin
pub const SHOW_MAP_SDK: &str = "show_map_sdk";
pub const SHOW_MAP_BASEMAP: &str = "show_map_basemap";
pub const MAPS: &str = "maps";
