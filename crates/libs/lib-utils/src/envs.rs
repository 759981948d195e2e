//! # Environment Variables
//!
//! Utilities for reading and parsing environment variables.

use std::env;
use std::str::FromStr;

/// Get an environment variable by name.
pub fn get_env(name: &'static str) -> Result<String, Error> {
    env::var(name).map_err(|_| Error::MissingEnv(name))
}

/// Get an environment variable, falling back to `default` when unset.
pub fn get_env_or(name: &'static str, default: &str) -> String {
    get_env(name).unwrap_or_else(|_| default.to_string())
}

/// Get and parse an environment variable.
pub fn get_env_parse<T: FromStr>(name: &'static str) -> Result<T, Error> {
    let val = get_env(name)?;
    val.parse::<T>().map_err(|_| Error::WrongFormat(name))
}

/// Get and parse an environment variable, using `default` when unset.
///
/// A variable that is set but unparseable is still an error.
pub fn get_env_parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, Error> {
    match get_env_parse(name) {
        Ok(val) => Ok(val),
        Err(Error::MissingEnv(_)) => Ok(default),
        Err(e) => Err(e),
    }
}

// region:    --- Error
#[derive(Debug, PartialEq)]
pub enum Error {
    MissingEnv(&'static str),
    WrongFormat(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_uses_default_when_missing() {
        let val: u64 = get_env_parse_or("LIB_UTILS_TEST_UNSET_VAR", 30).unwrap();
        assert_eq!(val, 30);
    }

    #[test]
    fn test_parse_or_rejects_garbage() {
        std::env::set_var("LIB_UTILS_TEST_GARBAGE_VAR", "thirty");
        let res: Result<u64, Error> = get_env_parse_or("LIB_UTILS_TEST_GARBAGE_VAR", 30);
        assert_eq!(res, Err(Error::WrongFormat("LIB_UTILS_TEST_GARBAGE_VAR")));
    }
}
