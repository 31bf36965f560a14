//! Integration tests for identifier uniqueness.
//!
//! Account and cs phone are unique among active snapshots of live sellers;
//! manager phones are unique across every stored contact.

mod common;

use assert_matches::assert_matches;
use sqlx::PgPool;
use sellerdesk_core::error::{CoreError, UniqueField};
use sellerdesk_db::error::StoreError;
use sellerdesk_db::models::snapshot::SellerChangeSet;
use sellerdesk_db::repositories::UniquenessRepo;
use sellerdesk_db::SellerWorkflow;

use common::{manager, new_seller, revise, sign_up, table_count};

fn conflict_field(err: StoreError) -> UniqueField {
    match err {
        StoreError::Core(CoreError::UniquenessConflict { field }) => field,
        other => panic!("expected a uniqueness conflict, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/schema")]
async fn test_duplicate_account_rejected_without_writes(pool: PgPool) {
    sign_up(&pool, &new_seller(1)).await.unwrap();

    let mut duplicate = new_seller(2);
    duplicate.account = "seller_001".into();
    let err = sign_up(&pool, &duplicate).await.unwrap_err();

    assert_eq!(conflict_field(err), UniqueField::Account);
    assert_eq!(table_count(&pool, "sellers").await, 1);
    assert_eq!(table_count(&pool, "seller_snapshots").await, 1);
    assert_eq!(table_count(&pool, "manager_contacts").await, 1);
}

#[sqlx::test(migrations = "../../db/schema")]
async fn test_duplicate_cs_phone_rejected(pool: PgPool) {
    sign_up(&pool, &new_seller(1)).await.unwrap();

    let mut duplicate = new_seller(2);
    duplicate.cs_phone = "02-100-0001".into();
    let err = sign_up(&pool, &duplicate).await.unwrap_err();

    assert_eq!(conflict_field(err), UniqueField::CsPhone);
    assert_eq!(table_count(&pool, "sellers").await, 1);
}

#[sqlx::test(migrations = "../../db/schema")]
async fn test_duplicate_manager_phone_rejected(pool: PgPool) {
    sign_up(&pool, &new_seller(1)).await.unwrap();

    let mut duplicate = new_seller(2);
    duplicate.managers = vec![manager("010-2000-0001")];
    let err = sign_up(&pool, &duplicate).await.unwrap_err();

    assert_eq!(conflict_field(err), UniqueField::ManagerPhone);
}

#[sqlx::test(migrations = "../../db/schema")]
async fn test_deleted_seller_frees_account_but_not_manager_phone(pool: PgPool) {
    let id = sign_up(&pool, &new_seller(1)).await.unwrap();
    let mut tx = pool.begin().await.unwrap();
    SellerWorkflow::soft_delete(&mut *tx, id).await.unwrap();
    tx.commit().await.unwrap();

    assert!(!UniquenessRepo::is_account_taken(&pool, "seller_001").await.unwrap());
    assert!(!UniquenessRepo::is_cs_phone_taken(&pool, "02-100-0001").await.unwrap());
    assert!(UniquenessRepo::is_manager_phone_taken(&pool, "010-2000-0001")
        .await
        .unwrap());

    // Same account and cs phone, fresh manager phone: accepted.
    let mut reuse = new_seller(1);
    reuse.managers = vec![manager("010-2000-0099")];
    sign_up(&pool, &reuse).await.unwrap();

    // Reusing the deleted seller's manager phone is still refused.
    let mut reuse_manager = new_seller(2);
    reuse_manager.managers = vec![manager("010-2000-0001")];
    let err = sign_up(&pool, &reuse_manager).await.unwrap_err();
    assert_eq!(conflict_field(err), UniqueField::ManagerPhone);
}

#[sqlx::test(migrations = "../../db/schema")]
async fn test_superseded_account_is_free(pool: PgPool) {
    let id = sign_up(&pool, &new_seller(1)).await.unwrap();
    revise(
        &pool,
        id,
        &SellerChangeSet {
            account: Some("renamed_001".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(!UniquenessRepo::is_account_taken(&pool, "seller_001").await.unwrap());
    assert!(UniquenessRepo::is_account_taken(&pool, "renamed_001").await.unwrap());
}

#[sqlx::test(migrations = "../../db/schema")]
async fn test_revision_keeping_own_identifiers_succeeds(pool: PgPool) {
    let id = sign_up(&pool, &new_seller(1)).await.unwrap();

    let changes = SellerChangeSet {
        account: Some("seller_001".into()),
        cs_phone: Some("02-100-0001".into()),
        managers: Some(vec![manager("010-2000-0001"), manager("010-2000-0101")]),
        ..Default::default()
    };
    let snapshot = revise(&pool, id, &changes).await.unwrap();
    assert_eq!(snapshot.attributes.account, "seller_001");
}

#[sqlx::test(migrations = "../../db/schema")]
async fn test_revision_claiming_another_sellers_account_fails(pool: PgPool) {
    sign_up(&pool, &new_seller(1)).await.unwrap();
    let id = sign_up(&pool, &new_seller(2)).await.unwrap();

    let changes = SellerChangeSet {
        account: Some("seller_001".into()),
        ..Default::default()
    };
    let err = revise(&pool, id, &changes).await.unwrap_err();
    assert_eq!(conflict_field(err), UniqueField::Account);

    // Nothing was versioned.
    assert_eq!(table_count(&pool, "seller_snapshots").await, 2);
}

#[sqlx::test(migrations = "../../db/schema")]
async fn test_invalid_signup_is_rejected_before_checks(pool: PgPool) {
    let mut seller = new_seller(1);
    seller.cs_phone = "0210001".into();
    let err = sign_up(&pool, &seller).await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::Validation(_)));
    assert_eq!(table_count(&pool, "sellers").await, 0);
}

#[sqlx::test(migrations = "../../db/schema")]
async fn test_parallel_signups_for_one_account_admit_exactly_one(pool: PgPool) {
    let mut handles = Vec::new();
    for i in 1..=6 {
        let pool = pool.clone();
        let mut seller = new_seller(i);
        seller.account = "dup_account".into();
        handles.push(tokio::spawn(async move { sign_up(&pool, &seller).await }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(err) => assert_eq!(conflict_field(err), UniqueField::Account),
        }
    }

    assert_eq!(succeeded, 1);
    assert_eq!(table_count(&pool, "sellers").await, 1);
    assert_eq!(table_count(&pool, "seller_snapshots").await, 1);
}

#[sqlx::test(migrations = "../../db/schema")]
async fn test_signup_racing_revision_for_one_cs_phone(pool: PgPool) {
    let id = sign_up(&pool, &new_seller(1)).await.unwrap();
    let contested = "02-999-0001";

    let revise_pool = pool.clone();
    let revision = tokio::spawn(async move {
        let changes = SellerChangeSet {
            cs_phone: Some(contested.into()),
            ..Default::default()
        };
        revise(&revise_pool, id, &changes).await.map(|_| ())
    });
    let signup_pool = pool.clone();
    let signup = tokio::spawn(async move {
        let mut seller = new_seller(2);
        seller.cs_phone = contested.into();
        sign_up(&signup_pool, &seller).await.map(|_| ())
    });

    let mut succeeded = 0;
    for result in [revision.await.unwrap(), signup.await.unwrap()] {
        match result {
            Ok(()) => succeeded += 1,
            Err(err) => assert_eq!(conflict_field(err), UniqueField::CsPhone),
        }
    }
    assert_eq!(succeeded, 1);

    let holders = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*)::BIGINT FROM seller_snapshots \
         WHERE cs_phone = $1 AND expired_at = '9999-12-31 23:59:59+00'",
    )
    .bind(contested)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(holders, 1);
}
