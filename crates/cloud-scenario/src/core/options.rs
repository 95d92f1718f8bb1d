//! Parsing of policy alias strings.

use std::collections::HashMap;

/// Splits an alias string into the implementation name and an optional options part.
/// Example: alias `Constant[value=0.8]` has name `Constant` and options string `value=0.8`.
pub fn parse_config_value(config_str: &str) -> (String, Option<String>) {
    match config_str.split_once('[') {
        Some((l, r)) => (l.trim().to_string(), Some(r.to_string().replace(']', ""))),
        None => (config_str.trim().to_string(), None),
    }
}

/// Parses options string from an alias value, returns map with option names and values.
///
/// Example: `value=0.8,seed=42` yields a map with entries `value -> 0.8` and `seed -> 42`.
pub fn parse_options(options_str: &str) -> HashMap<String, String> {
    let mut options = HashMap::new();
    for option_str in options_str.split(',') {
        if let Some((name, value)) = option_str.split_once('=') {
            options.insert(name.trim().to_string(), value.trim().to_string());
        }
    }
    options
}

/// Reads an option with the given name and parses it to the requested type.
/// Returns a human-readable message suitable for wrapping into a resolution error.
pub fn require_option<T: std::str::FromStr>(options: &HashMap<String, String>, name: &str) -> Result<T, String> {
    let raw = options.get(name).ok_or_else(|| format!("missing option `{}`", name))?;
    raw.parse::<T>()
        .map_err(|_| format!("cannot parse option `{}` from `{}`", name, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_value() {
        assert_eq!(parse_config_value("TimeShared"), ("TimeShared".to_string(), None));
        let (name, options) = parse_config_value("Constant[value=0.8]");
        assert_eq!(name, "Constant");
        assert_eq!(options.unwrap(), "value=0.8");
    }

    #[test]
    fn test_parse_options() {
        let options = parse_options("value=0.8,seed=42");
        assert_eq!(options.get("value").unwrap(), "0.8");
        assert_eq!(options.get("seed").unwrap(), "42");
        assert_eq!(options.get("missing"), None);
    }

    #[test]
    fn test_require_option() {
        let options = parse_options("value=0.8");
        assert_eq!(require_option::<f64>(&options, "value").unwrap(), 0.8);
        assert!(require_option::<f64>(&options, "seed").is_err());
        assert!(require_option::<u64>(&options, "value").is_err());
    }
}
