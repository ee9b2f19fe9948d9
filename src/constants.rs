//! Application constants for tabparse
//!
//! Default parse settings, the byte-order-mark artifacts stripped from
//! fields, and the converter names understood by configuration and CLI.

// =============================================================================
// Parse Defaults
// =============================================================================

/// Default field separator
pub const DEFAULT_DELIMITER: char = ',';

/// Default quote character of the CSV dialect
pub const QUOTE_CHAR: char = '"';

/// Files are assumed to carry a header row unless told otherwise
pub const DEFAULT_HAS_HEADERS: bool = true;

/// `max_entries` value meaning "no limit"
pub const UNBOUNDED_ENTRIES: usize = 0;

/// Success rate (percent) above which a parse counts as successful
pub const SUCCESS_RATE_THRESHOLD: f64 = 90.0;

// =============================================================================
// Byte Order Mark Handling
// =============================================================================

/// Unicode byte order mark as decoded from UTF-8
pub const BOM: char = '\u{feff}';

/// UTF-8 byte order mark decoded as Latin-1, as left behind by some exporters
pub const BOM_MOJIBAKE: &str = "\u{ef}\u{bb}\u{bf}";

// =============================================================================
// Converter Names
// =============================================================================

/// Converter names accepted in configuration files and on the command line
pub mod converter_names {
    pub const RAW: &str = "raw";
    pub const STRING: &str = "str";
    pub const INT: &str = "int";
    pub const FLOAT: &str = "float";
    pub const BOOL: &str = "bool";
    pub const DATE: &str = "date";

    /// All recognised names, in display order
    pub const ALL: &[&str] = &[RAW, STRING, INT, FLOAT, BOOL, DATE];
}

// =============================================================================
// Configuration Files
// =============================================================================

/// Directory under the user config dir holding tabparse settings
pub const CONFIG_DIR_NAME: &str = "tabparse";

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";
