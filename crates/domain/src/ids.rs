use std::fmt;

use serde::{Deserialize, Serialize};

/// Ids are database-assigned integers; the wire format carries them as plain
/// JSON numbers.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Account and roster IDs
define_id!(UserId);
define_id!(CharacterId);

// Item catalog IDs
define_id!(ItemId);
define_id!(ItemTypeId);
define_id!(PerkId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&ItemId::new(42)).unwrap();
        assert_eq!(json, "42");

        let id: UserId = serde_json::from_str("7").unwrap();
        assert_eq!(id, UserId::new(7));
    }

    #[test]
    fn ids_display_their_value() {
        assert_eq!(CharacterId::from(3).to_string(), "3");
        assert_eq!(i64::from(PerkId::new(9)), 9);
    }
}
