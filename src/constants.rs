pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

pub const LOG4RS_CONF_FILE_VAR: &str = "LOG4RS_CONFIG_FILE";

/// a SABO bracket is always a 16-player field
pub const FULL_FIELD_SIZE: usize = 16;
