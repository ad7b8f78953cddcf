pub fn env_var(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| panic!("Missing environment variable: {key}"))
}

pub fn env_var_opt(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
