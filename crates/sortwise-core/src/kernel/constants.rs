/// Application name
pub const APP_NAME: &str = "Sortwise";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix marking a category tag as a removal rather than an addition
pub const TAG_REMOVAL_MARKER: char = '-';

/// Tag that lets a plugin tolerate missing masters
pub const FILTER_TAG: &str = "Filter";

/// Opening delimiter of tags embedded in a plugin description
pub const EMBEDDED_TAGS_OPEN: &str = "{{BASH:";

/// Closing delimiter of tags embedded in a plugin description
pub const EMBEDDED_TAGS_CLOSE: &str = "}}";

/// Bits of a raw content identifier holding the contributing plugin index
pub const CONTENT_INDEX_SHIFT: u32 = 24;

/// Mask selecting the plugin-local part of a raw content identifier
pub const CONTENT_LOCAL_ID_MASK: u32 = 0x00FF_FFFF;

/// Escaped extensions marking a metadata entry name as a pattern
pub const REGEX_NAME_SUFFIXES: [&str; 2] = ["\\.esm", "\\.esp"];

/// Language used to pick messages when none is configured
pub const DEFAULT_LANGUAGE: &str = "en";
