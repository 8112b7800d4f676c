use std::collections::HashMap;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use super::error::MarshalError;
use super::{Fields, SEPARATOR};

/// A value that can live in a flat hash, either as a single field (scalars) or
/// flattened into several prefixed fields (records and string maps).
pub trait HashValue {
    /// Records and string maps; only these may be expanded or marshaled at top level.
    const COMPOSITE: bool = false;

    /// String maps take arbitrary keys, so they can only expand under a name.
    const STRING_MAP: bool = false;

    /// Zero check used by `omitempty`.
    fn is_zero(&self) -> bool {
        false
    }

    /// `None` at top level means there is nothing to marshal.
    fn is_absent(&self) -> bool {
        false
    }

    /// Scalar rendering. `Ok(None)` writes nothing.
    fn encode(&self) -> Result<Option<String>, String> {
        Ok(None)
    }

    fn decode(raw: &str) -> Result<Self, String>
    where
        Self: Sized,
    {
        Err(format!("cannot decode {raw:?} into a nested value"))
    }

    /// The value an absent `Option<Self>` expands as. Scalars have none.
    fn zero() -> Option<Self>
    where
        Self: Sized,
    {
        None
    }

    fn flatten(&self, prefix: &str, _out: &mut Fields) -> Result<(), MarshalError> {
        Err(invalid_expand(prefix))
    }

    fn unflatten(&mut self, _fields: &Fields, prefix: &str) -> Result<(), MarshalError> {
        Err(invalid_expand(prefix))
    }
}

pub(crate) fn invalid_expand(prefix: &str) -> MarshalError {
    MarshalError::InvalidExpand {
        field: prefix.trim_end_matches(SEPARATOR).to_string(),
    }
}

impl HashValue for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn encode(&self) -> Result<Option<String>, String> {
        Ok(Some(self.clone()))
    }

    fn decode(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl HashValue for bool {
    fn is_zero(&self) -> bool {
        !*self
    }

    fn encode(&self) -> Result<Option<String>, String> {
        Ok(Some(self.to_string()))
    }

    fn decode(raw: &str) -> Result<Self, String> {
        match raw {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(format!("{other:?} is not a boolean")),
        }
    }
}

macro_rules! number_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HashValue for $ty {
                fn is_zero(&self) -> bool {
                    *self == (0 as $ty)
                }

                fn encode(&self) -> Result<Option<String>, String> {
                    Ok(Some(self.to_string()))
                }

                fn decode(raw: &str) -> Result<Self, String> {
                    raw.parse::<$ty>().map_err(|e| e.to_string())
                }
            }
        )*
    };
}

number_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f64);

impl HashValue for OffsetDateTime {
    fn encode(&self) -> Result<Option<String>, String> {
        self.format(&Rfc3339).map(Some).map_err(|e| e.to_string())
    }

    fn decode(raw: &str) -> Result<Self, String> {
        OffsetDateTime::parse(raw, &Rfc3339).map_err(|e| e.to_string())
    }
}

impl HashValue for HashMap<String, String> {
    const COMPOSITE: bool = true;
    const STRING_MAP: bool = true;

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn zero() -> Option<Self> {
        Some(HashMap::new())
    }

    fn flatten(&self, prefix: &str, out: &mut Fields) -> Result<(), MarshalError> {
        for (key, value) in self {
            out.insert(format!("{prefix}{key}"), value.clone());
        }
        Ok(())
    }

    fn unflatten(&mut self, fields: &Fields, prefix: &str) -> Result<(), MarshalError> {
        for (key, value) in fields {
            if let Some(stripped) = key.strip_prefix(prefix) {
                self.insert(stripped.to_string(), value.clone());
            }
        }
        Ok(())
    }
}

impl<T: HashValue> HashValue for Option<T> {
    const COMPOSITE: bool = T::COMPOSITE;
    const STRING_MAP: bool = T::STRING_MAP;

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn is_absent(&self) -> bool {
        self.is_none()
    }

    fn encode(&self) -> Result<Option<String>, String> {
        match self {
            Some(value) => value.encode(),
            None => Ok(None),
        }
    }

    fn decode(raw: &str) -> Result<Self, String> {
        T::decode(raw).map(Some)
    }

    fn zero() -> Option<Self> {
        Some(None)
    }

    fn flatten(&self, prefix: &str, out: &mut Fields) -> Result<(), MarshalError> {
        match self {
            Some(value) => value.flatten(prefix, out),
            None => match T::zero() {
                Some(zero) if T::COMPOSITE => zero.flatten(prefix, out),
                _ => Err(invalid_expand(prefix)),
            },
        }
    }

    fn unflatten(&mut self, fields: &Fields, prefix: &str) -> Result<(), MarshalError> {
        if !T::COMPOSITE {
            return Err(invalid_expand(prefix));
        }

        if let Some(value) = self {
            return value.unflatten(fields, prefix);
        }

        // Only allocate when the hash actually carries this sub-record.
        if !fields.keys().any(|key| key.starts_with(prefix)) {
            return Ok(());
        }

        let mut value = T::zero().ok_or_else(|| invalid_expand(prefix))?;
        value.unflatten(fields, prefix)?;
        *self = Some(value);
        Ok(())
    }
}
