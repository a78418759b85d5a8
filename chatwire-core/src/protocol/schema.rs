//! Function parameter schemas
//!
//! A constrained subset of JSON Schema. `Property` nodes live under
//! `properties`, `Items` nodes describe array elements; the two reference each
//! other so nesting depth is only bounded by the caller. Every optional keyword
//! is omitted from the output when unset, and numeric keywords keep the exact
//! JSON number they were decoded from.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// JSON Schema primitive type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Integer,
    String,
    Boolean,
    Array,
    Object,
    Number,
    Null,
}

/// Convert a builder argument to a JSON number
///
/// Whole values become integers so `minimum: 1` is written as `1`, not `1.0`.
/// Non-finite values have no JSON form and yield `None`.
fn schema_number(value: f64) -> Option<Number> {
    if value.fract() == 0.0 && value.abs() < 9.007_199_254_740_992e15 {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}

/// Top-level parameter schema of a function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionParameters {
    #[serde(rename = "type")]
    pub schema_type: JsonType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Property>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(rename = "const", default, skip_serializing_if = "Option::is_none")]
    pub const_value: Option<Value>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Items>>,
}

impl FunctionParameters {
    /// An `object` schema with no properties yet
    pub fn object() -> Self {
        Self::new(JsonType::Object)
    }
}

/// Schema node for a named property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(rename = "type")]
    pub schema_type: JsonType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Property>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(rename = "const", default, skip_serializing_if = "Option::is_none")]
    pub const_value: Option<Value>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Items>>,
}

/// Schema node for the elements of an array
///
/// Mirrors [`Property`] minus `description`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Items {
    #[serde(rename = "type")]
    pub schema_type: JsonType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Property>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(rename = "const", default, skip_serializing_if = "Option::is_none")]
    pub const_value: Option<Value>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Items>>,
}

impl Property {
    /// An `array` property whose elements follow `items`
    pub fn array(items: Items) -> Self {
        Self::new(JsonType::Array).with_items(items)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Constructor and keyword builders shared by every schema node
macro_rules! schema_node {
    ($ty:ident { $($extra:ident),* }) => {
        impl $ty {
            pub fn new(schema_type: JsonType) -> Self {
                Self {
                    schema_type,
                    $($extra: None,)*
                    properties: None,
                    required: None,
                    pattern: None,
                    const_value: None,
                    enum_values: None,
                    multiple_of: None,
                    minimum: None,
                    maximum: None,
                    min_items: None,
                    max_items: None,
                    unique_items: None,
                    items: None,
                }
            }

            /// Add a named property
            pub fn with_property(mut self, name: impl Into<String>, property: Property) -> Self {
                self.properties
                    .get_or_insert_with(BTreeMap::new)
                    .insert(name.into(), property);
                self
            }

            /// Mark properties as required
            pub fn with_required<I, S>(mut self, names: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.required
                    .get_or_insert_with(Vec::new)
                    .extend(names.into_iter().map(Into::into));
                self
            }

            pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
                self.pattern = Some(pattern.into());
                self
            }

            pub fn with_const(mut self, value: impl Into<Value>) -> Self {
                self.const_value = Some(value.into());
                self
            }

            pub fn with_enum<I, V>(mut self, values: I) -> Self
            where
                I: IntoIterator<Item = V>,
                V: Into<Value>,
            {
                self.enum_values = Some(values.into_iter().map(Into::into).collect());
                self
            }

            pub fn with_multiple_of(mut self, multiple_of: f64) -> Self {
                self.multiple_of = schema_number(multiple_of);
                self
            }

            /// Set inclusive numeric bounds; `None` leaves a side open
            pub fn with_range(mut self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
                self.minimum = minimum.and_then(schema_number);
                self.maximum = maximum.and_then(schema_number);
                self
            }

            pub fn with_item_count(mut self, min_items: Option<u64>, max_items: Option<u64>) -> Self {
                self.min_items = min_items;
                self.max_items = max_items;
                self
            }

            pub fn with_unique_items(mut self, unique: bool) -> Self {
                self.unique_items = Some(unique);
                self
            }

            pub fn with_items(mut self, items: Items) -> Self {
                self.items = Some(Box::new(items));
                self
            }
        }
    };
}

schema_node!(FunctionParameters {});
schema_node!(Property { description });
schema_node!(Items {});
