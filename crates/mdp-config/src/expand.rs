//! `${VAR}` and `~` expansion for string settings in `mdp.toml`.
//!
//! `${VAR:-fallback}` falls back when VAR is unset. A plain `${VAR}` that is
//! unset fails with the TOML key of the setting. Values without `${` pass
//! through untouched, bare `$VAR` included.

use std::borrow::Cow;

use crate::ConfigError;

/// Variable a setting refers to that is missing from the environment.
struct Unset(String);

impl Unset {
    fn into_config_error(self, key: &str) -> ConfigError {
        ConfigError::EnvVar {
            field: key.to_owned(),
            message: format!("${{{}}} not set", self.0),
        }
    }
}

fn lookup(name: &str) -> Result<Option<String>, Unset> {
    std::env::var(name)
        .map(Some)
        .map_err(|_| Unset(name.to_owned()))
}

fn substitute(value: &str) -> Result<Cow<'_, str>, Unset> {
    if !value.contains("${") {
        return Ok(Cow::Borrowed(value));
    }
    shellexpand::env_with_context(value, lookup).map_err(|e| e.cause)
}

/// Expand `${VAR}` references in the value of setting `key`.
pub(crate) fn expand_env(value: &str, key: &str) -> Result<String, ConfigError> {
    substitute(value)
        .map(Cow::into_owned)
        .map_err(|unset| unset.into_config_error(key))
}

/// [`expand_env`], then a leading `~` becomes the home directory.
pub(crate) fn expand_path(value: &str, key: &str) -> Result<String, ConfigError> {
    let value = substitute(value).map_err(|unset| unset.into_config_error(key))?;
    Ok(shellexpand::tilde(&value).into_owned())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_var_inside_path() {
        // SAFETY: each test uses its own variable names
        unsafe {
            std::env::set_var("MDP_NOTES_ROOT", "/srv/notes");
        }
        let result = expand_path("${MDP_NOTES_ROOT}/todo.md", "preview.file").unwrap();
        assert_eq!(result, "/srv/notes/todo.md");
        unsafe {
            std::env::remove_var("MDP_NOTES_ROOT");
        }
    }

    #[test]
    fn test_fallback_only_when_unset() {
        // SAFETY: each test uses its own variable names
        unsafe {
            std::env::set_var("MDP_BIND_SET", "0.0.0.0");
            std::env::remove_var("MDP_BIND_UNSET");
        }
        assert_eq!(
            expand_env("${MDP_BIND_SET:-127.0.0.1}", "server.host").unwrap(),
            "0.0.0.0"
        );
        assert_eq!(
            expand_env("${MDP_BIND_UNSET:-127.0.0.1}", "server.host").unwrap(),
            "127.0.0.1"
        );
        unsafe {
            std::env::remove_var("MDP_BIND_SET");
        }
    }

    #[test]
    fn test_unset_var_names_setting() {
        // SAFETY: each test uses its own variable names
        unsafe {
            std::env::remove_var("MDP_UPLOADS_MISSING");
        }
        let err = expand_path("${MDP_UPLOADS_MISSING}/img", "uploads.dir").unwrap_err();

        match err {
            ConfigError::EnvVar { field, message } => {
                assert_eq!(field, "uploads.dir");
                assert_eq!(message, "${MDP_UPLOADS_MISSING} not set");
            }
            other => panic!("expected EnvVar error, got {other:?}"),
        }
    }

    #[test]
    fn test_values_without_braces_pass_through() {
        assert_eq!(expand_env("localhost", "server.host").unwrap(), "localhost");
        assert_eq!(expand_env("$HOME", "server.host").unwrap(), "$HOME");
        assert_eq!(
            expand_path("drafts/~scratch.md", "preview.file").unwrap(),
            "drafts/~scratch.md"
        );
    }

    #[test]
    fn test_leading_tilde_is_home() {
        let Some(home) = std::env::var_os("HOME") else {
            return;
        };
        let home = home.to_string_lossy().into_owned();

        assert_eq!(expand_path("~", "uploads.dir").unwrap(), home);
        assert_eq!(
            expand_path("~/notes.md", "preview.file").unwrap(),
            format!("{home}/notes.md")
        );
    }
}
