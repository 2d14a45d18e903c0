//! Environment-driven configuration, re-read on every call so tests can
//! toggle variables around a single assertion (see `SpecValidator`'s own
//! call-time evaluation of deprecation flags).

const ENV_PREFIX: &str = "OPENAPI_SPEC_VALIDATOR_";
const RESOLVED_CACHE_MAXSIZE_DEFAULT: usize = 128;
const WARN_DEPRECATED_DEFAULT: bool = true;

/// Which `JsonSchemaEngine` implementation backs meta-schema and
/// default-value checks. `Auto` is the only meaningfully different choice
/// today since exactly one real backend (the `jsonschema` crate) is wired
/// up; the tri-state is kept to leave room for a second backend behind the
/// same trait seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Auto,
    Native,
    Alternate,
}

impl Backend {
    fn parse(raw: &str) -> Option<Backend> {
        match raw {
            "auto" => Some(Backend::Auto),
            "jsonschema" => Some(Backend::Native),
            "jsonschema-rs" => Some(Backend::Alternate),
            _ => None,
        }
    }
}

/// Runtime configuration, read from `OPENAPI_SPEC_VALIDATOR_*` environment
/// variables. Invalid values never abort the process: each field falls back
/// to its default, matching the lenient field validators of the original
/// settings module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub resolved_cache_maxsize: usize,
    pub schema_validator_backend: Backend,
    pub warn_deprecated: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            resolved_cache_maxsize: RESOLVED_CACHE_MAXSIZE_DEFAULT,
            schema_validator_backend: Backend::Auto,
            warn_deprecated: WARN_DEPRECATED_DEFAULT,
        }
    }
}

impl Settings {
    pub fn from_env() -> Settings {
        Settings {
            resolved_cache_maxsize: resolved_cache_maxsize_from_env(),
            schema_validator_backend: schema_validator_backend_from_env(),
            warn_deprecated: warn_deprecated_from_env(),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{name}")).ok()
}

fn resolved_cache_maxsize_from_env() -> usize {
    match env_var("RESOLVED_CACHE_MAXSIZE") {
        Some(raw) => match raw.parse::<usize>() {
            Ok(value) => value,
            Err(_) => {
                tracing::debug!(value = %raw, "invalid RESOLVED_CACHE_MAXSIZE, falling back to default");
                RESOLVED_CACHE_MAXSIZE_DEFAULT
            }
        },
        None => RESOLVED_CACHE_MAXSIZE_DEFAULT,
    }
}

fn schema_validator_backend_from_env() -> Backend {
    match env_var("SCHEMA_VALIDATOR_BACKEND") {
        Some(raw) => match Backend::parse(&raw) {
            Some(backend) => backend,
            None => {
                tracing::warn!(value = %raw, "unknown SCHEMA_VALIDATOR_BACKEND, falling back to 'auto'");
                Backend::Auto
            }
        },
        None => Backend::Auto,
    }
}

fn warn_deprecated_from_env() -> bool {
    match env_var("WARN_DEPRECATED") {
        Some(raw) => raw != "0",
        None => WARN_DEPRECATED_DEFAULT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let _guard = ENV_LOCK.lock().unwrap();
        for (name, value) in vars {
            let key = format!("{ENV_PREFIX}{name}");
            match value {
                Some(v) => std::env::set_var(&key, v),
                None => std::env::remove_var(&key),
            }
        }
        f();
        for (name, _) in vars {
            std::env::remove_var(format!("{ENV_PREFIX}{name}"));
        }
    }

    #[test]
    fn defaults_with_no_env() {
        with_env(&[], || {
            let settings = Settings::from_env();
            assert_eq!(settings.resolved_cache_maxsize, 128);
            assert_eq!(settings.schema_validator_backend, Backend::Auto);
            assert!(settings.warn_deprecated);
        });
    }

    #[test]
    fn invalid_cache_size_falls_back_to_default() {
        with_env(&[("RESOLVED_CACHE_MAXSIZE", Some("not-a-number"))], || {
            assert_eq!(Settings::from_env().resolved_cache_maxsize, 128);
        });
    }

    #[test]
    fn unknown_backend_falls_back_to_auto() {
        with_env(&[("SCHEMA_VALIDATOR_BACKEND", Some("nonsense"))], || {
            assert_eq!(Settings::from_env().schema_validator_backend, Backend::Auto);
        });
    }

    #[test]
    fn warn_deprecated_can_be_disabled() {
        with_env(&[("WARN_DEPRECATED", Some("0"))], || {
            assert!(!Settings::from_env().warn_deprecated);
        });
    }
}
