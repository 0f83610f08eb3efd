use std::fmt::Debug;
use std::hash::Hash;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A single bound value destined for a SQL parameter slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

/// Conversion from a typed entity field into its stored representation.
pub trait ToField {
    fn to_field(&self) -> FieldValue;
}

impl ToField for String {
    fn to_field(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }
}

impl ToField for i64 {
    fn to_field(&self) -> FieldValue {
        FieldValue::Integer(*self)
    }
}

impl ToField for f64 {
    fn to_field(&self) -> FieldValue {
        FieldValue::Real(*self)
    }
}

/// Decimals are stored as text so amounts survive the round trip exactly.
impl ToField for Decimal {
    fn to_field(&self) -> FieldValue {
        FieldValue::Text(self.to_string())
    }
}

/// Timestamps are stored as RFC 3339 text in UTC with a `Z` suffix, the same
/// shape the schema's column defaults produce.
impl ToField for DateTime<Utc> {
    fn to_field(&self) -> FieldValue {
        FieldValue::Text(self.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

/// A column identifier from a closed, per-entity enumeration.
///
/// Column names reach SQL only through this trait, so caller-supplied keys
/// can never be interpolated into a statement.
pub trait Column: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    fn name(self) -> &'static str;

    /// Resolve a column name against the allow-list.
    fn parse(name: &str) -> Option<Self>;
}

/// Declarative schema for one entity kind.
///
/// The implementing struct carries one optional field per column and is used
/// both as the request payload and as the row read back from the store.
pub trait Entity:
    Serialize + DeserializeOwned + Default + Clone + Debug + Send + Sync + 'static
{
    type Column: Column;

    /// URL segment under `/api_v1`.
    const ROUTE: &'static str;
    const TABLE: &'static str;
    /// Externally visible string identifier, minted on create.
    const ID: Self::Column;
    /// Columns exposed on read.
    const COLUMNS: &'static [Self::Column];
    /// Columns writable on create (the identifier is added separately).
    const CREATE_COLUMNS: &'static [Self::Column];
    /// Columns writable on update.
    const UPDATE_COLUMNS: &'static [Self::Column];
    /// Columns matched by equality to select the rows an update touches.
    const UPDATE_KEYS: &'static [Self::Column];

    /// Every column paired with its value, `None` where the field is absent.
    fn fields(&self) -> Vec<(Self::Column, Option<FieldValue>)>;

    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);

    /// The present fields restricted to `allowed`.
    fn present(&self, allowed: &[Self::Column]) -> FieldSet<Self::Column> {
        FieldSet::from_optional(
            self.fields()
                .into_iter()
                .filter(|(column, _)| allowed.contains(column)),
        )
    }

    /// Every present field, used as an equality filter on reads.
    fn filter(&self) -> FieldSet<Self::Column> {
        FieldSet::from_optional(self.fields())
    }
}

/// An ordered set of column/value pairs with absent values already removed.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSet<C> {
    entries: Vec<(C, FieldValue)>,
}

impl<C> Default for FieldSet<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C: Column> FieldSet<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from optional values, dropping every `None`. Absent means
    /// "leave unspecified", never "set to NULL".
    pub fn from_optional<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, Option<FieldValue>)>,
    {
        let mut set = Self::new();
        for (column, value) in pairs {
            if let Some(value) = value {
                set.push(column, value);
            }
        }
        set
    }

    pub fn with(mut self, column: C, value: impl ToField) -> Self {
        self.push(column, value.to_field());
        self
    }

    /// Insert or replace the value for `column`.
    pub fn push(&mut self, column: C, value: FieldValue) {
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn get(&self, column: C) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, column: C) -> bool {
        self.get(column).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn columns(&self) -> impl Iterator<Item = C> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(C, FieldValue)> {
        self.entries.iter()
    }
}

/// Declares an entity: its column enum, its payload/row struct and its
/// `Entity` implementation.
macro_rules! entity {
    (
        $(#[$meta:meta])*
        $name:ident : $column:ident {
            route: $route:literal,
            table: $table:literal,
            id: $id_variant:ident => $id_field:ident,
            create: [$($create:ident),* $(,)?],
            update: [$($update:ident),* $(,)?],
            keys: [$($key:ident),+ $(,)?],
            fields: {
                $($(#[$fmeta:meta])* $variant:ident => $field:ident : $ty:ty),+ $(,)?
            } $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $column {
            $($variant),+
        }

        impl $crate::entity::Column for $column {
            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($field)),+
                }
            }

            fn parse(name: &str) -> Option<Self> {
                $(
                    if name == stringify!($field) {
                        return Some(Self::$variant);
                    }
                )+
                None
            }
        }

        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            $($(#[$fmeta])* pub $field: Option<$ty>,)+
        }

        impl $crate::entity::Entity for $name {
            type Column = $column;

            const ROUTE: &'static str = $route;
            const TABLE: &'static str = $table;
            const ID: $column = $column::$id_variant;
            const COLUMNS: &'static [$column] = &[$($column::$variant),+];
            const CREATE_COLUMNS: &'static [$column] = &[$($column::$create),*];
            const UPDATE_COLUMNS: &'static [$column] = &[$($column::$update),*];
            const UPDATE_KEYS: &'static [$column] = &[$($column::$key),+];

            fn fields(&self) -> Vec<($column, Option<$crate::entity::FieldValue>)> {
                vec![
                    $((
                        $column::$variant,
                        self.$field.as_ref().map($crate::entity::ToField::to_field),
                    )),+
                ]
            }

            fn id(&self) -> Option<&str> {
                self.$id_field.as_deref()
            }

            fn set_id(&mut self, id: String) {
                self.$id_field = Some(id);
            }
        }
    };
}

pub(crate) use entity;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Col {
        A,
        B,
    }

    impl Column for Col {
        fn name(self) -> &'static str {
            match self {
                Col::A => "a",
                Col::B => "b",
            }
        }

        fn parse(name: &str) -> Option<Self> {
            match name {
                "a" => Some(Col::A),
                "b" => Some(Col::B),
                _ => None,
            }
        }
    }

    #[test]
    fn from_optional_drops_absent_values() {
        let set = FieldSet::from_optional(vec![
            (Col::A, None),
            (Col::B, Some(FieldValue::Integer(3))),
        ]);
        assert_eq!(set.len(), 1);
        assert!(!set.contains(Col::A));
        assert_eq!(set.get(Col::B), Some(&FieldValue::Integer(3)));
    }

    #[test]
    fn push_replaces_existing_column() {
        let set = FieldSet::new()
            .with(Col::A, "first".to_string())
            .with(Col::A, "second".to_string());
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(Col::A), Some(&FieldValue::Text("second".into())));
    }

    #[test]
    fn timestamps_render_with_z_suffix() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(
            ts.to_field(),
            FieldValue::Text("2025-03-01T12:30:00Z".to_string())
        );
    }

    #[test]
    fn decimals_stored_as_exact_text() {
        assert_eq!(
            dec!(12.50).to_field(),
            FieldValue::Text("12.50".to_string())
        );
    }
}
