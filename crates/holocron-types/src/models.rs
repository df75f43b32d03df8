use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A favorite points at exactly one catalogue entry. Storing the target as a
/// sum type makes the both-set and neither-set states unrepresentable past
/// construction; the database keeps two nullable FK columns underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FavoriteTarget {
    Character(i64),
    Planet(i64),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FavoriteTargetError {
    #[error("a favorite must reference a character or a planet")]
    Neither,
    #[error("a favorite cannot reference both a character and a planet")]
    Both,
}

impl FavoriteTarget {
    /// Build a target from the two nullable ids of the wire/storage shape.
    pub fn from_ids(
        character_id: Option<i64>,
        planet_id: Option<i64>,
    ) -> Result<Self, FavoriteTargetError> {
        match (character_id, planet_id) {
            (Some(_), Some(_)) => Err(FavoriteTargetError::Both),
            (None, None) => Err(FavoriteTargetError::Neither),
            (Some(id), None) => Ok(FavoriteTarget::Character(id)),
            (None, Some(id)) => Ok(FavoriteTarget::Planet(id)),
        }
    }

    pub fn character_id(&self) -> Option<i64> {
        match self {
            FavoriteTarget::Character(id) => Some(*id),
            FavoriteTarget::Planet(_) => None,
        }
    }

    pub fn planet_id(&self) -> Option<i64> {
        match self {
            FavoriteTarget::Character(_) => None,
            FavoriteTarget::Planet(id) => Some(*id),
        }
    }

    /// Tag used in the serialized `item.type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            FavoriteTarget::Character(_) => "character",
            FavoriteTarget::Planet(_) => "planet",
        }
    }
}
