//! JSON representation of [`Runtime`] as `"<n> mins"`.
//!
//! Use with `#[serde(with = "crate::runtime")]`.

use greenlight_dal::movie::Runtime;
use serde::{Deserialize as _, Deserializer, Serializer, de};

const UNIT: &str = "mins";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid runtime format")]
pub struct InvalidRuntimeFormat;

pub fn format_runtime(runtime: Runtime) -> String {
    format!("{} {UNIT}", runtime.minutes())
}

pub fn parse_runtime(value: &str) -> Result<Runtime, InvalidRuntimeFormat> {
    let (minutes, unit) = value.split_once(' ').ok_or(InvalidRuntimeFormat)?;
    if unit != UNIT {
        return Err(InvalidRuntimeFormat);
    }
    minutes
        .parse::<i32>()
        .map(Runtime::new)
        .map_err(|_| InvalidRuntimeFormat)
}

pub fn serialize<S>(runtime: &Runtime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_runtime(*runtime))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Runtime, D::Error>
where
    D: Deserializer<'de>,
{
    let value =
        String::deserialize(deserializer).map_err(|_| de::Error::custom(InvalidRuntimeFormat))?;
    parse_runtime(&value).map_err(de::Error::custom)
}

pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<Runtime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)
        .map_err(|_| de::Error::custom(InvalidRuntimeFormat))?;
    value
        .map(|v| parse_runtime(&v).map_err(de::Error::custom))
        .transpose()
}

pub fn is_zero(runtime: &Runtime) -> bool {
    runtime.minutes() == 0
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct Film {
        #[serde(with = "crate::runtime")]
        runtime: Runtime,
    }

    #[test]
    fn test_parse_runtime() {
        assert_eq!(parse_runtime("107 mins"), Ok(Runtime::new(107)));
        assert_eq!(parse_runtime("-5 mins"), Ok(Runtime::new(-5)));
        for bad in ["107", "107 min", "107mins", "mins", "abc mins", "107  mins", ""] {
            assert_eq!(parse_runtime(bad), Err(InvalidRuntimeFormat), "{bad:?}");
        }
    }

    #[test]
    fn test_runtime_json() {
        let film = Film {
            runtime: Runtime::new(102),
        };
        assert_eq!(
            serde_json::to_string(&film).unwrap(),
            r#"{"runtime":"102 mins"}"#
        );

        let film: Film = serde_json::from_str(r#"{"runtime":"95 mins"}"#).unwrap();
        assert_eq!(film.runtime, Runtime::new(95));

        let err = serde_json::from_str::<Film>(r#"{"runtime":95}"#).unwrap_err();
        assert!(err.to_string().contains("invalid runtime format"));
    }
}
