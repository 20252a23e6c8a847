//! Transfer items use case.
//!
//! Moves a set of items from one user's inventory into another's.

use std::sync::Arc;

use armory_domain::{Item, ItemId, UserId};

use crate::infrastructure::ports::{ItemRepo, UserRepo};

use super::error::InventoryError;
use super::types::InventoryActionResult;
use super::unique_ids;

/// Transfer items use case.
///
/// Orchestrates: user lookups, ownership and equip checks, one guarded
/// batch reassignment.
pub struct TransferItems {
    user_repo: Arc<dyn UserRepo>,
    item_repo: Arc<dyn ItemRepo>,
}

impl TransferItems {
    pub fn new(user_repo: Arc<dyn UserRepo>, item_repo: Arc<dyn ItemRepo>) -> Self {
        Self {
            user_repo,
            item_repo,
        }
    }

    /// Execute the transfer.
    ///
    /// Checks run in order and the first failure wins:
    /// 1. the source user exists
    /// 2. the target user exists
    /// 3. every item is owned by the source user
    /// 4. no item is equipped
    pub async fn execute(
        &self,
        source: UserId,
        target: UserId,
        item_ids: &[ItemId],
    ) -> Result<InventoryActionResult, InventoryError> {
        let ids = unique_ids(item_ids);

        if self.user_repo.get(source).await?.is_none() {
            tracing::warn!(source_user_id = %source, "Transfer refused: source user not found");
            return Err(InventoryError::SourceUserNotFound);
        }
        if self.user_repo.get(target).await?.is_none() {
            tracing::warn!(target_user_id = %target, "Transfer refused: target user not found");
            return Err(InventoryError::TargetUserNotFound);
        }

        let owned = self.item_repo.count_owned(source, &ids).await?;
        if owned != ids.len() {
            tracing::warn!(
                source_user_id = %source,
                requested = ids.len(),
                owned,
                "Transfer refused: items not owned by source"
            );
            return Err(InventoryError::ItemsNotOwnedBySource);
        }

        let items = self.item_repo.get_many(&ids).await?;
        if items.iter().any(Item::is_equipped) {
            tracing::warn!(source_user_id = %source, "Transfer refused: items are equipped");
            return Err(InventoryError::ItemsEquippedToCharacter);
        }

        if ids.is_empty() {
            return Ok(InventoryActionResult::new(0));
        }

        let changed = self.item_repo.transfer(source, target, &ids).await?;
        if changed != ids.len() {
            tracing::warn!(
                source_user_id = %source,
                target_user_id = %target,
                requested = ids.len(),
                changed,
                "Transfer aborted: items changed concurrently"
            );
            return Err(InventoryError::ConcurrentModification);
        }

        tracing::info!(
            source_user_id = %source,
            target_user_id = %target,
            items = changed,
            "Items transferred"
        );
        Ok(InventoryActionResult::new(changed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockItemRepo, MockUserRepo, RepoError};
    use crate::use_cases::inventory::test_support::{equipped_item, owned_item, user};

    const ALICE: UserId = UserId::new(1);
    const BOB: UserId = UserId::new(2);

    fn users_exist() -> MockUserRepo {
        let mut user_repo = MockUserRepo::new();
        user_repo
            .expect_get()
            .returning(|id| Ok(Some(user(id.get()))));
        user_repo
    }

    #[tokio::test]
    async fn when_source_user_missing_returns_error() {
        let mut user_repo = MockUserRepo::new();
        user_repo
            .expect_get()
            .withf(|id| *id == ALICE)
            .returning(|_| Ok(None));

        let use_case = TransferItems::new(Arc::new(user_repo), Arc::new(MockItemRepo::new()));
        let result = use_case.execute(ALICE, BOB, &[ItemId::new(1)]).await;

        assert!(matches!(result, Err(InventoryError::SourceUserNotFound)));
    }

    #[tokio::test]
    async fn when_target_user_missing_returns_error() {
        let mut user_repo = MockUserRepo::new();
        user_repo
            .expect_get()
            .returning(|id| Ok((id == ALICE).then(|| user(id.get()))));

        let use_case = TransferItems::new(Arc::new(user_repo), Arc::new(MockItemRepo::new()));
        let result = use_case.execute(ALICE, BOB, &[ItemId::new(1)]).await;

        assert!(matches!(result, Err(InventoryError::TargetUserNotFound)));
    }

    #[tokio::test]
    async fn when_items_not_owned_returns_error() {
        let mut item_repo = MockItemRepo::new();
        item_repo.expect_count_owned().returning(|_, _| Ok(1));
        item_repo.expect_transfer().never();

        let use_case = TransferItems::new(Arc::new(users_exist()), Arc::new(item_repo));
        let result = use_case
            .execute(ALICE, BOB, &[ItemId::new(1), ItemId::new(2)])
            .await;

        assert!(matches!(result, Err(InventoryError::ItemsNotOwnedBySource)));
    }

    #[tokio::test]
    async fn duplicate_ids_cannot_fake_ownership() {
        let mut item_repo = MockItemRepo::new();
        item_repo
            .expect_count_owned()
            .withf(|_, ids| ids.len() == 1)
            .returning(|_, _| Ok(1));
        item_repo
            .expect_get_many()
            .returning(|_| Ok(vec![owned_item(1, ALICE)]));
        item_repo
            .expect_transfer()
            .withf(|_, _, ids| ids.to_vec() == vec![ItemId::new(1)])
            .returning(|_, _, ids| Ok(ids.len()));

        let use_case = TransferItems::new(Arc::new(users_exist()), Arc::new(item_repo));
        let result = use_case
            .execute(ALICE, BOB, &[ItemId::new(1), ItemId::new(1), ItemId::new(1)])
            .await
            .unwrap();

        assert_eq!(result.items_affected, 1);
    }

    #[tokio::test]
    async fn when_item_equipped_returns_error() {
        let mut item_repo = MockItemRepo::new();
        item_repo.expect_count_owned().returning(|_, _| Ok(2));
        item_repo
            .expect_get_many()
            .returning(|_| Ok(vec![owned_item(1, ALICE), equipped_item(2, ALICE, 7)]));
        item_repo.expect_transfer().never();

        let use_case = TransferItems::new(Arc::new(users_exist()), Arc::new(item_repo));
        let result = use_case
            .execute(ALICE, BOB, &[ItemId::new(1), ItemId::new(2)])
            .await;

        assert!(matches!(result, Err(InventoryError::ItemsEquippedToCharacter)));
    }

    #[tokio::test]
    async fn when_guarded_write_falls_short_reports_concurrent_modification() {
        let mut item_repo = MockItemRepo::new();
        item_repo.expect_count_owned().returning(|_, _| Ok(2));
        item_repo
            .expect_get_many()
            .returning(|_| Ok(vec![owned_item(1, ALICE), owned_item(2, ALICE)]));
        item_repo.expect_transfer().returning(|_, _, _| Ok(0));

        let use_case = TransferItems::new(Arc::new(users_exist()), Arc::new(item_repo));
        let result = use_case
            .execute(ALICE, BOB, &[ItemId::new(1), ItemId::new(2)])
            .await;

        assert!(matches!(result, Err(InventoryError::ConcurrentModification)));
    }

    #[tokio::test]
    async fn when_repo_fails_propagates_error() {
        let mut user_repo = MockUserRepo::new();
        user_repo
            .expect_get()
            .returning(|_| Err(RepoError::database("user.get", "connection lost")));

        let use_case = TransferItems::new(Arc::new(user_repo), Arc::new(MockItemRepo::new()));
        let result = use_case.execute(ALICE, BOB, &[ItemId::new(1)]).await;

        assert!(matches!(result, Err(InventoryError::Repo(_))));
    }

    #[tokio::test]
    async fn when_valid_transfers_every_item() {
        let mut item_repo = MockItemRepo::new();
        item_repo.expect_count_owned().returning(|_, _| Ok(2));
        item_repo
            .expect_get_many()
            .returning(|_| Ok(vec![owned_item(1, ALICE), owned_item(2, ALICE)]));
        item_repo
            .expect_transfer()
            .withf(|source, target, ids| *source == ALICE && *target == BOB && ids.len() == 2)
            .times(1)
            .returning(|_, _, _| Ok(2));

        let use_case = TransferItems::new(Arc::new(users_exist()), Arc::new(item_repo));
        let result = use_case
            .execute(ALICE, BOB, &[ItemId::new(1), ItemId::new(2)])
            .await
            .unwrap();

        assert_eq!(result.items_affected, 2);
    }
}
