//! Flat hash marshaling.
//!
//! Records map onto a single string/string hash. Every member carries an
//! annotation of the form `name[,expand][,omitempty]`:
//!
//! * `-` (or an empty name without `expand`) skips the member entirely.
//! * `expand` flattens a nested record or string map into the parent, joining
//!   names with `_` (`video_codec`, `pmapping_elemental`, ...).
//! * `omitempty` leaves zero values out of the hash.
//!
//! Record types opt in through [`hash_record!`](crate::hash_record), which
//! expands to a per-type mapping table instead of runtime introspection.

mod error;
mod tag;
mod value;

use std::collections::HashMap;

pub use error::MarshalError;
pub use tag::Tag;
pub use value::HashValue;

/// The store-level representation of a record.
pub type Fields = HashMap<String, String>;

/// Joins an expanded member's name with its children. Forbidden in annotation names.
pub const SEPARATOR: char = '_';

/// Serializes a record (or a non-empty string map) into hash fields.
pub fn to_fields<T: HashValue>(value: &T) -> Result<Fields, MarshalError> {
    if value.is_absent() {
        return Err(MarshalError::InvalidInput("nothing to marshal".into()));
    }
    if !T::COMPOSITE {
        return Err(MarshalError::InvalidInput(
            "expected a record or a string map".into(),
        ));
    }

    let mut fields = Fields::new();
    value.flatten("", &mut fields)?;

    if fields.is_empty() {
        return Err(MarshalError::InvalidInput(
            "value produced no hash fields".into(),
        ));
    }

    Ok(fields)
}

/// Populates `dest` from hash fields. Members without a stored field keep
/// whatever value `dest` already held.
pub fn load_fields<T: HashValue>(fields: &Fields, dest: &mut T) -> Result<(), MarshalError> {
    if !T::COMPOSITE {
        return Err(MarshalError::InvalidDestination(
            "destination must be a record or a string map",
        ));
    }
    if fields.is_empty() {
        return Err(MarshalError::NotFound);
    }

    dest.unflatten(fields, "")
}

/// An unnamed string map would share the parent's prefix and swallow its
/// sibling fields on load.
fn check_inline<V: HashValue>(raw: &str, tag: &Tag<'_>) -> Result<(), MarshalError> {
    if V::STRING_MAP && tag.name.is_empty() {
        return Err(MarshalError::InvalidTag {
            tag: raw.to_string(),
            reason: "a string map can only expand under a name".into(),
        });
    }
    Ok(())
}

#[doc(hidden)]
pub fn write_member<V: HashValue>(
    value: &V,
    tag: &str,
    prefix: &str,
    out: &mut Fields,
) -> Result<(), MarshalError> {
    let raw = tag;
    let tag = Tag::parse(raw)?;
    if tag.is_skipped() || (tag.omit_empty && value.is_zero()) {
        return Ok(());
    }

    if tag.expand {
        check_inline::<V>(raw, &tag)?;
        return value.flatten(&tag.child_prefix(prefix), out);
    }

    let key = tag.key(prefix);
    if V::COMPOSITE {
        return Err(MarshalError::InvalidInput(format!(
            "field {key:?} holds a nested value but is not marked expand"
        )));
    }

    if let Some(encoded) = value
        .encode()
        .map_err(|reason| MarshalError::InvalidInput(format!("field {key:?}: {reason}")))?
    {
        out.insert(key, encoded);
    }
    Ok(())
}

#[doc(hidden)]
pub fn read_member<V: HashValue>(
    value: &mut V,
    tag: &str,
    fields: &Fields,
    prefix: &str,
) -> Result<(), MarshalError> {
    let raw = tag;
    let tag = Tag::parse(raw)?;
    if tag.is_skipped() {
        return Ok(());
    }

    if tag.expand {
        check_inline::<V>(raw, &tag)?;
        return value.unflatten(fields, &tag.child_prefix(prefix));
    }

    let key = tag.key(prefix);
    if V::COMPOSITE {
        return Err(MarshalError::InvalidDestination(
            "nested member is not marked expand",
        ));
    }

    if let Some(raw) = fields.get(&key) {
        *value = V::decode(raw)
            .map_err(|reason| MarshalError::InvalidStoredValue { field: key, reason })?;
    }
    Ok(())
}

/// Implements [`HashValue`] for a record from its field annotations.
///
/// ```ignore
/// hash_record!(OutputOptions {
///     extension: "extension",
/// });
/// ```
///
/// The record must implement `Default`; that value is what an absent
/// `Option<Record>` expands as.
#[macro_export]
macro_rules! hash_record {
    ($ty:ty { $($field:ident : $tag:literal),* $(,)? }) => {
        impl $crate::marshal::HashValue for $ty {
            const COMPOSITE: bool = true;

            fn zero() -> Option<Self> {
                Some(<$ty as ::core::default::Default>::default())
            }

            fn flatten(
                &self,
                prefix: &str,
                out: &mut $crate::marshal::Fields,
            ) -> Result<(), $crate::marshal::MarshalError> {
                $( $crate::marshal::write_member(&self.$field, $tag, prefix, out)?; )*
                Ok(())
            }

            fn unflatten(
                &mut self,
                fields: &$crate::marshal::Fields,
                prefix: &str,
            ) -> Result<(), $crate::marshal::MarshalError> {
                $( $crate::marshal::read_member(&mut self.$field, $tag, fields, prefix)?; )*
                Ok(())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use time::OffsetDateTime;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct City {
        name: String,
        population: u64,
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Address {
        street: String,
        city: City,
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Person {
        id: String,
        name: String,
        age: i32,
        active: bool,
        nickname: String,
        born: Option<OffsetDateTime>,
        address: Address,
        previous: Option<Address>,
        tags: HashMap<String, String>,
    }

    crate::hash_record!(City {
        name: "name",
        population: "population",
    });

    crate::hash_record!(Address {
        street: "street",
        city: "city,expand",
    });

    crate::hash_record!(Person {
        id: "-",
        name: "name",
        age: "age",
        active: "active",
        nickname: "nickname,omitempty",
        born: "born",
        address: "address,expand",
        previous: "previous,expand,omitempty",
        tags: "tags,expand",
    });

    #[derive(Debug, Default)]
    struct BadExpand {
        count: i64,
    }

    crate::hash_record!(BadExpand {
        count: "count,expand",
    });

    #[derive(Debug, Default)]
    struct Unexpanded {
        city: City,
    }

    crate::hash_record!(Unexpanded { city: "city" });

    #[derive(Debug, Default)]
    struct Reserved {
        value: String,
    }

    crate::hash_record!(Reserved {
        value: "some_value",
    });

    fn person() -> Person {
        Person {
            id: "ignored".into(),
            name: "Gopher".into(),
            age: 9,
            active: true,
            nickname: String::new(),
            born: Some(datetime!(2009-11-10 23:00:00.000000001 UTC)),
            address: Address {
                street: "Broadway".into(),
                city: City {
                    name: "New York".into(),
                    population: 8_400_000,
                },
            },
            previous: None,
            tags: HashMap::from([("team".to_string(), "media".to_string())]),
        }
    }

    #[test]
    fn flattens_nested_records_with_prefixes() {
        let fields = to_fields(&person()).unwrap();

        assert_eq!(fields["name"], "Gopher");
        assert_eq!(fields["age"], "9");
        assert_eq!(fields["active"], "true");
        assert_eq!(fields["born"], "2009-11-10T23:00:00.000000001Z");
        assert_eq!(fields["address_street"], "Broadway");
        assert_eq!(fields["address_city_name"], "New York");
        assert_eq!(fields["address_city_population"], "8400000");
        assert_eq!(fields["tags_team"], "media");
        assert!(!fields.contains_key("id"));
        assert!(!fields.contains_key("nickname"));
        assert!(!fields.keys().any(|k| k.starts_with("previous_")));
        assert_eq!(fields.len(), 8);
    }

    #[test]
    fn round_trips_records() {
        let mut original = person();
        original.id = String::new();
        original.nickname = "gopher".into();
        original.previous = Some(Address {
            street: "Main St".into(),
            city: City {
                name: "Springfield".into(),
                population: 30_000,
            },
        });

        let fields = to_fields(&original).unwrap();
        let mut loaded = Person::default();
        load_fields(&fields, &mut loaded).unwrap();

        assert_eq!(loaded, original);
    }

    #[test]
    fn absent_expanded_option_stays_none() {
        let fields = to_fields(&person()).unwrap();
        let mut loaded = Person::default();
        load_fields(&fields, &mut loaded).unwrap();
        assert_eq!(loaded.previous, None);
    }

    #[test]
    fn absent_expanded_option_without_omitempty_writes_zero_value() {
        #[derive(Debug, Default)]
        struct Holder {
            city: Option<City>,
        }
        crate::hash_record!(Holder { city: "city,expand" });

        let fields = to_fields(&Holder::default()).unwrap();
        assert_eq!(fields["city_name"], "");
        assert_eq!(fields["city_population"], "0");
    }

    #[test]
    fn missing_fields_keep_prepopulated_values() {
        let fields = Fields::from([("name".to_string(), "Loaded".to_string())]);
        let mut dest = Person {
            age: 33,
            tags: HashMap::from([("preset".to_string(), "yes".to_string())]),
            ..Person::default()
        };

        load_fields(&fields, &mut dest).unwrap();

        assert_eq!(dest.name, "Loaded");
        assert_eq!(dest.age, 33);
        assert_eq!(dest.tags["preset"], "yes");
    }

    #[test]
    fn string_maps_marshal_directly() {
        let map = HashMap::from([
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ]);
        assert_eq!(to_fields(&map).unwrap(), map);

        let mut loaded = HashMap::new();
        load_fields(&map, &mut loaded).unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn empty_map_is_invalid_input() {
        let empty: HashMap<String, String> = HashMap::new();
        assert!(matches!(
            to_fields(&empty),
            Err(MarshalError::InvalidInput(_))
        ));
    }

    #[test]
    fn absent_value_is_invalid_input() {
        let nothing: Option<Person> = None;
        assert!(matches!(
            to_fields(&nothing),
            Err(MarshalError::InvalidInput(_))
        ));
    }

    #[test]
    fn scalar_top_level_is_invalid_input() {
        assert!(matches!(
            to_fields(&"plain".to_string()),
            Err(MarshalError::InvalidInput(_))
        ));
    }

    #[test]
    fn expanding_a_scalar_fails() {
        assert_eq!(
            to_fields(&BadExpand { count: 3 }).unwrap_err(),
            MarshalError::InvalidExpand {
                field: "count".into()
            }
        );

        let fields = Fields::from([("count".to_string(), "3".to_string())]);
        let mut dest = BadExpand::default();
        assert!(matches!(
            load_fields(&fields, &mut dest),
            Err(MarshalError::InvalidExpand { .. })
        ));
    }

    #[test]
    fn nested_record_without_expand_is_rejected() {
        let value = Unexpanded::default();
        assert!(matches!(
            to_fields(&value),
            Err(MarshalError::InvalidInput(_))
        ));
    }

    #[test]
    fn unnamed_map_expansion_is_rejected() {
        #[derive(Debug, Default)]
        struct Inline {
            name: String,
            extra: HashMap<String, String>,
        }
        crate::hash_record!(Inline {
            name: "name",
            extra: ",expand",
        });

        let value = Inline {
            name: "n".into(),
            extra: HashMap::from([("k".to_string(), "v".to_string())]),
        };
        assert!(matches!(
            to_fields(&value),
            Err(MarshalError::InvalidTag { .. })
        ));

        let fields = Fields::from([
            ("name".to_string(), "n".to_string()),
            ("k".to_string(), "v".to_string()),
        ]);
        let mut dest = Inline::default();
        assert!(matches!(
            load_fields(&fields, &mut dest),
            Err(MarshalError::InvalidTag { .. })
        ));
        assert!(dest.extra.is_empty());
    }

    #[test]
    fn unnamed_record_expansion_inlines_fields() {
        #[derive(Debug, Default, PartialEq)]
        struct Wrapper {
            label: String,
            city: City,
        }
        crate::hash_record!(Wrapper {
            label: "label",
            city: ",expand",
        });

        let value = Wrapper {
            label: "home".into(),
            city: City {
                name: "Recife".into(),
                population: 1_600_000,
            },
        };
        let fields = to_fields(&value).unwrap();
        assert_eq!(fields["name"], "Recife");

        let mut loaded = Wrapper::default();
        load_fields(&fields, &mut loaded).unwrap();
        assert_eq!(loaded, value);
    }

    #[test]
    fn reserved_separator_in_annotation_is_rejected() {
        assert_eq!(
            to_fields(&Reserved::default()).unwrap_err(),
            MarshalError::ReservedName {
                name: "some_value".into()
            }
        );
    }

    #[test]
    fn scalar_destination_is_invalid() {
        let fields = Fields::from([("name".to_string(), "x".to_string())]);
        let mut dest = String::new();
        assert!(matches!(
            load_fields(&fields, &mut dest),
            Err(MarshalError::InvalidDestination(_))
        ));
    }

    #[test]
    fn empty_hash_is_not_found() {
        let mut dest = Person::default();
        assert_eq!(
            load_fields(&Fields::new(), &mut dest),
            Err(MarshalError::NotFound)
        );
    }

    #[test]
    fn bad_stored_value_names_the_field() {
        let fields = Fields::from([
            ("name".to_string(), "x".to_string()),
            ("address_city_population".to_string(), "lots".to_string()),
        ]);
        let mut dest = Person::default();

        match load_fields(&fields, &mut dest) {
            Err(MarshalError::InvalidStoredValue { field, .. }) => {
                assert_eq!(field, "address_city_population")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn bad_timestamp_is_invalid_stored_value() {
        let fields = Fields::from([("born".to_string(), "yesterday".to_string())]);
        let mut dest = Person::default();
        assert!(matches!(
            load_fields(&fields, &mut dest),
            Err(MarshalError::InvalidStoredValue { field, .. }) if field == "born"
        ));
    }
}
