mod common;

use common::*;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use twilu::api::error::AppError;
use twilu::entities::{prelude::*, *};
use twilu::services::folder_service::NewFolder;

#[tokio::test]
async fn test_create_then_get_folder() {
    let state = setup_state().await;
    let alice = create_user(&state, "alice").await;

    let created = state
        .folders
        .create_folder(
            alice.id,
            NewFolder {
                name: "Reading list".to_string(),
                private: true,
                cover_url: Some("https://example.com/cover.png".to_string()),
            },
        )
        .await
        .unwrap();

    let details = state.folders.get_folder(created.id).await.unwrap();
    assert_eq!(details.folder.owner, alice.id);
    assert_eq!(details.folder.owner_username, "alice");
    assert!(details.folder.private);
    assert_eq!(
        details.folder.cover_url.as_deref(),
        Some("https://example.com/cover.png")
    );
    assert!(details.items.is_empty());
    assert!(details.contributors.is_empty());

    // Appended to the owner's collection
    let link = UserFolders::find_by_id((alice.id, created.id))
        .one(&state.db)
        .await
        .unwrap();
    assert!(link.is_some());
}

#[tokio::test]
async fn test_create_folder_validation_and_missing_owner() {
    let state = setup_state().await;
    let alice = create_user(&state, "alice").await;

    match state
        .folders
        .create_folder(alice.id, new_folder("   ", false))
        .await
    {
        Err(AppError::Validation(_)) => {}
        other => panic!("expected Validation, got {:?}", other),
    }

    match state
        .folders
        .create_folder(
            alice.id,
            NewFolder {
                name: "Links".to_string(),
                private: false,
                cover_url: Some("ftp://example.com/cover.png".to_string()),
            },
        )
        .await
    {
        Err(AppError::Validation(_)) => {}
        other => panic!("expected Validation, got {:?}", other),
    }

    assert_not_found(
        state
            .folders
            .create_folder(alice.id + 100, new_folder("Orphan", false))
            .await,
    );

    assert_eq!(Folders::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_get_missing_folder() {
    let state = setup_state().await;
    assert_not_found(state.folders.get_folder(999).await);
}

#[tokio::test]
async fn test_feed_only_public_newest_first_capped() {
    let state = setup_state().await;
    let alice = create_user(&state, "alice").await;

    for i in 0..25 {
        state
            .folders
            .create_folder(alice.id, new_folder(&format!("public-{}", i), false))
            .await
            .unwrap();
        state
            .folders
            .create_folder(alice.id, new_folder(&format!("private-{}", i), true))
            .await
            .unwrap();
    }

    let feed = state.folders.get_feed().await.unwrap();
    assert_eq!(feed.len(), 20);
    assert!(feed.iter().all(|f| !f.private));
    assert!(feed.windows(2).all(|w| {
        (w[0].created_at, w[0].id) > (w[1].created_at, w[1].id)
    }));
    assert_eq!(feed[0].name, "public-24");
}

#[tokio::test]
async fn test_add_contributor_owner_only_and_idempotent() {
    let state = setup_state().await;
    let alice = create_user(&state, "alice").await;
    let bob = create_user(&state, "bob").await;
    let carol = create_user(&state, "carol").await;

    let folder = state
        .folders
        .create_folder(alice.id, new_folder("Shared", false))
        .await
        .unwrap();

    assert_permission_denied(
        state
            .folders
            .add_contributor(folder.id, bob.id, carol.id)
            .await,
    );
    assert!(
        state
            .folders
            .get_folder(folder.id)
            .await
            .unwrap()
            .contributors
            .is_empty()
    );

    state
        .folders
        .add_contributor(folder.id, alice.id, bob.id)
        .await
        .unwrap();
    state
        .folders
        .add_contributor(folder.id, alice.id, bob.id)
        .await
        .unwrap();

    let details = state.folders.get_folder(folder.id).await.unwrap();
    let contributors: Vec<i32> = details.contributors.iter().map(|u| u.id).collect();
    assert_eq!(contributors, vec![bob.id]);

    // A contributor still cannot manage the contributor set
    assert_permission_denied(
        state
            .folders
            .add_contributor(folder.id, bob.id, carol.id)
            .await,
    );

    assert_not_found(state.folders.add_contributor(folder.id, alice.id, 999).await);
    assert_not_found(state.folders.add_contributor(999, alice.id, bob.id).await);
}

#[tokio::test]
async fn test_delete_folder_denied_leaves_folder_unchanged() {
    let state = setup_state().await;
    let alice = create_user(&state, "alice").await;
    let bob = create_user(&state, "bob").await;

    let folder = state
        .folders
        .create_folder(alice.id, new_folder("Keep", false))
        .await
        .unwrap();
    state
        .items
        .add_item(folder.id, alice.id, new_item("one"))
        .await
        .unwrap();
    state
        .folders
        .add_contributor(folder.id, alice.id, bob.id)
        .await
        .unwrap();

    // Contributors do not get delete rights either
    assert_permission_denied(state.folders.delete_folder(folder.id, bob.id).await);

    let details = state.folders.get_folder(folder.id).await.unwrap();
    assert_eq!(details.folder, folder);
    assert_eq!(details.items.len(), 1);
    assert_eq!(details.contributors.len(), 1);
}

#[tokio::test]
async fn test_delete_folder_cascades() {
    let state = setup_state().await;
    let alice = create_user(&state, "alice").await;
    let bob = create_user(&state, "bob").await;

    let folder = state
        .folders
        .create_folder(alice.id, new_folder("Doomed", false))
        .await
        .unwrap();
    let other = state
        .folders
        .create_folder(alice.id, new_folder("Other", false))
        .await
        .unwrap();
    for name in ["one", "two", "three"] {
        state
            .items
            .add_item(folder.id, alice.id, new_item(name))
            .await
            .unwrap();
    }
    let survivor = state
        .items
        .add_item(other.id, alice.id, new_item("survivor"))
        .await
        .unwrap();
    state
        .folders
        .add_contributor(folder.id, alice.id, bob.id)
        .await
        .unwrap();

    state.folders.delete_folder(folder.id, alice.id).await.unwrap();

    assert_not_found(state.folders.get_folder(folder.id).await);
    assert_eq!(
        Items::find()
            .filter(items::Column::FolderId.eq(folder.id))
            .count(&state.db)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        FolderContributors::find()
            .filter(folder_contributors::Column::FolderId.eq(folder.id))
            .count(&state.db)
            .await
            .unwrap(),
        0
    );
    assert!(
        UserFolders::find_by_id((alice.id, folder.id))
            .one(&state.db)
            .await
            .unwrap()
            .is_none()
    );

    let other_details = state.folders.get_folder(other.id).await.unwrap();
    assert_eq!(other_details.items, vec![survivor]);

    // Deleting again reports the folder as missing
    assert_not_found(state.folders.delete_folder(folder.id, alice.id).await);
}

#[tokio::test]
async fn test_private_folder_visibility() {
    let state = setup_state().await;
    let alice = create_user(&state, "alice").await;
    let bob = create_user(&state, "bob").await;
    let carol = create_user(&state, "carol").await;

    let private = state
        .folders
        .create_folder(alice.id, new_folder("Secret", true))
        .await
        .unwrap();
    let public = state
        .folders
        .create_folder(alice.id, new_folder("Open", false))
        .await
        .unwrap();
    state
        .folders
        .add_contributor(private.id, alice.id, bob.id)
        .await
        .unwrap();

    assert!(state.folders.get_folder_for(private.id, alice.id).await.is_ok());
    assert!(state.folders.get_folder_for(private.id, bob.id).await.is_ok());
    assert_not_found(state.folders.get_folder_for(private.id, carol.id).await);
    assert!(state.folders.get_folder_for(public.id, carol.id).await.is_ok());
}

#[tokio::test]
async fn test_delete_folder_rolls_back_when_a_step_fails() {
    let state = setup_state().await;
    let alice = create_user(&state, "alice").await;
    let bob = create_user(&state, "bob").await;

    let folder = state
        .folders
        .create_folder(alice.id, new_folder("Sturdy", false))
        .await
        .unwrap();
    state
        .items
        .add_item(folder.id, alice.id, new_item("one"))
        .await
        .unwrap();
    state
        .folders
        .add_contributor(folder.id, alice.id, bob.id)
        .await
        .unwrap();

    // The last step of the cascade fails after the link and item rows are gone
    state
        .db
        .execute_unprepared(
            "CREATE TRIGGER fail_folder_delete BEFORE DELETE ON folders \
             BEGIN SELECT RAISE(ABORT, 'folder delete blocked'); END",
        )
        .await
        .unwrap();

    match state.folders.delete_folder(folder.id, alice.id).await {
        Err(AppError::TransactionFailure(msg)) => assert!(msg.starts_with("delete folder")),
        other => panic!("expected TransactionFailure, got {:?}", other),
    }

    let details = state.folders.get_folder(folder.id).await.unwrap();
    assert_eq!(details.items.len(), 1);
    assert_eq!(details.contributors.len(), 1);
    assert!(
        UserFolders::find_by_id((alice.id, folder.id))
            .one(&state.db)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_private_folder_mutations_hidden_from_outsiders() {
    let state = setup_state().await;
    let alice = create_user(&state, "alice").await;
    let bob = create_user(&state, "bob").await;
    let carol = create_user(&state, "carol").await;

    let folder = state
        .folders
        .create_folder(alice.id, new_folder("Secret", true))
        .await
        .unwrap();
    state
        .folders
        .add_contributor(folder.id, alice.id, bob.id)
        .await
        .unwrap();

    // Outsiders see the same answer as for a missing folder
    assert_not_found(state.folders.delete_folder(folder.id, carol.id).await);
    assert_not_found(
        state
            .folders
            .add_contributor(folder.id, carol.id, carol.id)
            .await,
    );
    assert_not_found(
        state
            .items
            .add_item(folder.id, carol.id, new_item("sneaky"))
            .await,
    );

    // Contributors can see it, so they get the ownership answer
    assert_permission_denied(state.folders.delete_folder(folder.id, bob.id).await);
    assert_permission_denied(
        state
            .folders
            .add_contributor(folder.id, bob.id, carol.id)
            .await,
    );
    assert_permission_denied(
        state
            .items
            .add_item(folder.id, bob.id, new_item("from-bob"))
            .await,
    );

    let details = state.folders.get_folder(folder.id).await.unwrap();
    assert!(details.items.is_empty());
    assert_eq!(details.contributors.len(), 1);
}
