//! Integration tests for the repository layer.
//!
//! These run against a real database (`DATABASE_URL`) and are ignored by
//! default; run them with `cargo test -p bob-db -- --ignored`.

use serde_json::json;
use sqlx::PgPool;
use bob_db::models::artifact::NewArtifact;
use bob_db::models::chat_message::CreateChatMessage;
use bob_db::models::offer::OFFER_KIND_DOMAIN;
use bob_db::models::project::{CreateProject, StageTransition, TransitionOutcome};
use bob_db::models::user::CreateUser;
use bob_db::repositories::{
    ArtifactRepo, ChatMessageRepo, CredentialRepo, OfferRepo, ProjectRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: None,
            password_hash: "hash".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn new_project(title: &str) -> CreateProject {
    CreateProject {
        title: title.to_string(),
        pitch: "A pitch".to_string(),
        problem: None,
        target_user: None,
        channels: None,
        monetization: None,
    }
}

fn validate_transition() -> StageTransition {
    StageTransition {
        next_stage: Some("validated".to_string()),
        artifact: Some(NewArtifact {
            kind: "validation_report".to_string(),
            payload: json!({ "score": 80 }),
        }),
        ..StageTransition::expecting("idea")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_email_is_rejected(pool: PgPool) {
    new_user(&pool, "ada@example.com").await;
    let err = UserRepo::create(
        &pool,
        &CreateUser {
            email: "ada@example.com".to_string(),
            name: None,
            password_hash: "hash".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("uq_users_email"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn password_hash_is_replaced(pool: PgPool) {
    let id = new_user(&pool, "rotate@example.com").await;

    assert!(UserRepo::update_password(&pool, id, "new-hash").await.unwrap());
    let user = UserRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(user.password_hash, "new-hash");

    assert!(!UserRepo::update_password(&pool, id + 1000, "new-hash").await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn projects_are_scoped_to_owner(pool: PgPool) {
    let alice = new_user(&pool, "alice@example.com").await;
    let bob = new_user(&pool, "bob@example.com").await;
    let project = ProjectRepo::create(&pool, alice, &new_project("Mine")).await.unwrap();

    assert_eq!(project.stage, "idea");
    assert!(ProjectRepo::find_owned(&pool, project.id, alice).await.unwrap().is_some());
    assert!(ProjectRepo::find_owned(&pool, project.id, bob).await.unwrap().is_none());
    assert!(ProjectRepo::list_by_owner(&pool, bob).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn transition_commits_stage_and_artifact_together(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let project = ProjectRepo::create(&pool, owner, &new_project("P")).await.unwrap();

    let outcome = ProjectRepo::commit_transition(&pool, project.id, &validate_transition())
        .await
        .unwrap();
    let TransitionOutcome::Committed { project, artifact } = outcome else {
        panic!("expected commit");
    };
    assert_eq!(project.stage, "validated");
    assert_eq!(artifact.unwrap().kind, "validation_report");

    let reports = ArtifactRepo::list_by_kind(&pool, project.id, "validation_report")
        .await
        .unwrap();
    assert_eq!(reports.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn stale_transition_writes_nothing(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let project = ProjectRepo::create(&pool, owner, &new_project("P")).await.unwrap();

    ProjectRepo::commit_transition(&pool, project.id, &validate_transition())
        .await
        .unwrap();
    let second = ProjectRepo::commit_transition(&pool, project.id, &validate_transition())
        .await
        .unwrap();

    assert!(matches!(second, TransitionOutcome::Rejected { ref current } if current.stage == "validated"));
    let reports = ArtifactRepo::list_by_kind(&pool, project.id, "validation_report")
        .await
        .unwrap();
    assert_eq!(reports.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn concurrent_transitions_commit_once(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let project = ProjectRepo::create(&pool, owner, &new_project("P")).await.unwrap();
    let transition = validate_transition();

    let (a, b) = tokio::join!(
        ProjectRepo::commit_transition(&pool, project.id, &transition),
        ProjectRepo::commit_transition(&pool, project.id, &transition),
    );
    let committed = [a.unwrap(), b.unwrap()]
        .iter()
        .filter(|o| matches!(o, TransitionOutcome::Committed { .. }))
        .count();
    assert_eq!(committed, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn missing_project_transition(pool: PgPool) {
    let outcome = ProjectRepo::commit_transition(&pool, 999_999, &validate_transition())
        .await
        .unwrap();
    assert!(matches!(outcome, TransitionOutcome::Missing));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn offers_replace_previous_batch(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let project = ProjectRepo::create(&pool, owner, &new_project("P")).await.unwrap();

    let first = vec!["alpha".to_string(), "beta".to_string()];
    let second = vec!["gamma".to_string()];
    OfferRepo::replace_batch(&pool, project.id, OFFER_KIND_DOMAIN, &first).await.unwrap();
    OfferRepo::replace_batch(&pool, project.id, OFFER_KIND_DOMAIN, &second).await.unwrap();

    let offers = OfferRepo::list(&pool, project.id, OFFER_KIND_DOMAIN).await.unwrap();
    let values: Vec<_> = offers.into_iter().map(|o| o.value).collect();
    assert_eq!(values, vec!["gamma"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn chat_history_is_per_user_and_ordered(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let other = new_user(&pool, "other@example.com").await;
    let project = ProjectRepo::create(&pool, owner, &new_project("P")).await.unwrap();

    for (user_id, content) in [(owner, "one"), (other, "x"), (owner, "two"), (owner, "three")] {
        ChatMessageRepo::create(
            &pool,
            &CreateChatMessage {
                project_id: project.id,
                user_id,
                role: "user".to_string(),
                content: content.to_string(),
            },
        )
        .await
        .unwrap();
    }

    let recent = ChatMessageRepo::list_recent(&pool, project.id, owner, 2).await.unwrap();
    let contents: Vec<_> = recent.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["two", "three"]);
    assert_eq!(ChatMessageRepo::list(&pool, project.id, other).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn credentials_upsert_replaces(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    CredentialRepo::upsert(&pool, owner, "openai", "aa").await.unwrap();
    CredentialRepo::upsert(&pool, owner, "openai", "bb").await.unwrap();

    let stored = CredentialRepo::list_for_user(&pool, owner).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].ciphertext, "bb");
    assert!(CredentialRepo::delete(&pool, owner, "openai").await.unwrap());
}
