//! Inventory Pool
//!
//! The two independent inventory collections.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Pool {
    /// Global partner inventory
    #[default]
    Global,
    /// Internal inventory
    Internal,
}

impl Pool {
    pub const ALL: [Pool; 2] = [Pool::Global, Pool::Internal];

    pub fn as_str(self) -> &'static str {
        match self {
            Pool::Global => "global",
            Pool::Internal => "internal",
        }
    }

    /// Backing table name
    pub fn table(self) -> &'static str {
        match self {
            Pool::Global => "global_inventory",
            Pool::Internal => "internal_inventory",
        }
    }

    /// Tab title
    pub fn title(self) -> &'static str {
        match self {
            Pool::Global => "Global Partner Inventory",
            Pool::Internal => "Internal GMI Inventory",
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_distinct() {
        assert_eq!(Pool::Global.table(), "global_inventory");
        assert_eq!(Pool::Internal.table(), "internal_inventory");
        assert_eq!(serde_json::to_string(&Pool::Internal).unwrap(), r#""internal""#);
    }
}
