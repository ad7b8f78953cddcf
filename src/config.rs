use crate::constants::{DATABASE_URL_VAR, LOG4RS_CONF_FILE_VAR};
use crate::utils::{env_var, env_var_opt};
use once_cell::sync::Lazy;

pub static CONFIG: Lazy<Config> = Lazy::new(|| Config::new_from_env());

pub struct Config {
    pub database_url: String,
    pub log4rs_conf_file: Option<String>,
}

impl Config {
    /// explodes if DATABASE_URL is missing
    fn new_from_env() -> Self {
        Self {
            database_url: env_var(DATABASE_URL_VAR),
            log4rs_conf_file: env_var_opt(LOG4RS_CONF_FILE_VAR),
        }
    }
}
