use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Newtype pattern for IdeaId
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct IdeaId(pub Uuid);

impl IdeaId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for IdeaId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IdeaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for IdeaId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<IdeaId> for Uuid {
    fn from(id: IdeaId) -> Self {
        id.0
    }
}

impl std::str::FromStr for IdeaId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idea_id_uniqueness() {
        let id1 = IdeaId::new();
        let id2 = IdeaId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_idea_id_roundtrip() {
        let id = IdeaId::new();
        let uuid: Uuid = id.into();
        assert_eq!(IdeaId::from(uuid), id);
        assert_eq!(id.to_string().parse::<IdeaId>().unwrap(), id);
    }
}
