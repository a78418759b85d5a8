//! Literal wire tags
//!
//! Several objects in the wire format carry a field whose value is fixed for
//! the type (`"role": "system"`, `"type": "function"`). These zero-sized tags
//! serialize as their literal and refuse any other string on decode, so a
//! payload tagged for one variant can never be accepted by another.

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! literal_tag {
    ($(#[$meta:meta])* $name:ident => $literal:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl $name {
            /// The literal this tag stands for on the wire
            pub const LITERAL: &'static str = $literal;
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(Self::LITERAL)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_str(LiteralVisitor(Self::LITERAL))?;
                Ok($name)
            }
        }
    };
}

struct LiteralVisitor(&'static str);

impl<'de> Visitor<'de> for LiteralVisitor {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "the literal string \"{}\"", self.0)
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if value == self.0 {
            Ok(())
        } else {
            Err(E::invalid_value(Unexpected::Str(value), &self))
        }
    }
}

literal_tag!(
    /// `"role": "system"`
    SystemRoleTag => "system"
);
literal_tag!(
    /// `"role": "user"`
    UserRoleTag => "user"
);
literal_tag!(
    /// `"role": "assistant"`
    AssistantRoleTag => "assistant"
);
literal_tag!(
    /// `"role": "tool"`
    ToolRoleTag => "tool"
);
literal_tag!(
    /// `"type": "function"` on tool calls, tool definitions and named tool choices
    FunctionTag => "function"
);
