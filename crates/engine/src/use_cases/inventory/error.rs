//! Inventory rule failures.

use armory_shared::ErrorCode;

use crate::infrastructure::ports::RepoError;

/// Why an inventory operation was refused.
///
/// The display text of the rule variants is surfaced verbatim to API callers.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Source user does not exist")]
    SourceUserNotFound,
    #[error("Target user does not exist")]
    TargetUserNotFound,
    #[error("User does not exist")]
    UserNotFound,
    #[error("Some items do not belong to the user")]
    ItemsNotOwnedBySource,
    #[error("Some items do not belong to the user")]
    ItemsNotOwnedByUser,
    #[error("Some items belong to a character")]
    ItemsEquippedToCharacter,
    #[error("Some items belong to a character")]
    ItemsAlreadyEquipped,
    #[error("Character not found")]
    CharacterNotFound,
    #[error("Character does not belong to the user")]
    CharacterNotOwnedByUser,
    #[error("Some items do not belong to the character")]
    ItemsNotEquippedToCharacter,
    /// The guarded write changed fewer items than were checked.
    #[error("Items were modified by another request")]
    ConcurrentModification,
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl InventoryError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::SourceUserNotFound => ErrorCode::SourceUserNotFound,
            Self::TargetUserNotFound => ErrorCode::TargetUserNotFound,
            Self::UserNotFound => ErrorCode::UserNotFound,
            Self::ItemsNotOwnedBySource => ErrorCode::ItemsNotOwnedBySource,
            Self::ItemsNotOwnedByUser => ErrorCode::ItemsNotOwnedByUser,
            Self::ItemsEquippedToCharacter => ErrorCode::ItemsEquippedToCharacter,
            Self::ItemsAlreadyEquipped => ErrorCode::ItemsAlreadyEquipped,
            Self::CharacterNotFound => ErrorCode::CharacterNotFound,
            Self::CharacterNotOwnedByUser => ErrorCode::CharacterNotOwnedByUser,
            Self::ItemsNotEquippedToCharacter => ErrorCode::ItemsNotEquippedToCharacter,
            Self::ConcurrentModification => ErrorCode::ConcurrentModification,
            Self::Repo(_) => ErrorCode::Internal,
        }
    }

    /// True for refusals caused by the request itself rather than storage.
    pub fn is_rule_violation(&self) -> bool {
        !matches!(self, Self::ConcurrentModification | Self::Repo(_))
    }
}
