//! User reference

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Foreign id of the user owning an account
///
/// Users live outside this crate. An account only stores the id; deleting
/// an account never touches the user and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_serializes_as_plain_uuid() {
        let id = Uuid::new_v4();
        let json = serde_json::to_string(&UserId::new(id)).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }
}
