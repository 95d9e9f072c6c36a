//! Integration tests for the report repository.
//!
//! Covers graph and reported-studylog persistence, wholesale replacement on
//! update, represent demotion, and the one-represent-per-member index.

use assert_matches::assert_matches;
use sqlx::PgPool;
use studylog_core::report::{GraphAbility, ReportDraft, ReportedStudylogDraft};
use studylog_db::models::member::{CreateMember, Member};
use studylog_db::repositories::{AbilityRepo, MemberRepo, ReportRepo, StudylogRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_member(pool: &PgPool, username: &str, github_id: i64) -> Member {
    MemberRepo::create(
        pool,
        &CreateMember {
            username: username.to_string(),
            nickname: username.to_string(),
            role: None,
            github_id,
            image_url: None,
        },
    )
    .await
    .unwrap()
}

fn draft(member_id: i64, title: &str, is_represent: bool) -> ReportDraft {
    ReportDraft {
        id: None,
        member_id,
        title: title.to_string(),
        description: String::new(),
        is_represent,
        graph: vec![],
        studylogs: vec![],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn insert_persists_graph_and_studylogs(pool: PgPool) {
    let member = seed_member(&pool, "verus", 1).await;
    let parent = AbilityRepo::create(&pool, "Rust", "", "#ff0000", None).await.unwrap();
    let child = AbilityRepo::create(&pool, "Ownership", "", "#ff0000", Some(parent.id))
        .await
        .unwrap();
    let studylog = StudylogRepo::create(&pool, member.id, "borrowck", "notes").await.unwrap();

    let mut report = draft(member.id, "T1", false);
    report.graph = vec![GraphAbility {
        ability_id: parent.id,
        weight: 5,
        is_present: true,
    }];
    report.studylogs = vec![ReportedStudylogDraft {
        studylog_id: studylog.id,
        ability_ids: vec![child.id, child.id],
    }];

    let mut conn = pool.acquire().await.unwrap();
    let saved = ReportRepo::insert(&mut conn, &report).await.unwrap();

    let graph = ReportRepo::graph_abilities(&pool, saved.id).await.unwrap();
    assert_eq!(graph.len(), 1);
    assert_eq!(graph[0].ability_id, parent.id);
    assert_eq!(graph[0].weight, 5);
    assert_eq!(graph[0].name, "Rust");

    let studylogs = ReportRepo::reported_studylogs(&pool, saved.id).await.unwrap();
    assert_eq!(studylogs.len(), 1);
    assert_eq!(studylogs[0].title, "borrowck");

    let cited = ReportRepo::reported_studylog_abilities(&pool, saved.id).await.unwrap();
    assert_eq!(cited.len(), 1, "duplicate citations collapse");
    assert_eq!(cited[0].ability_id, child.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn repeated_studylog_keeps_abilities_of_every_entry(pool: PgPool) {
    let member = seed_member(&pool, "verus", 1).await;
    let parent = AbilityRepo::create(&pool, "Rust", "", "#ff0000", None).await.unwrap();
    let ownership = AbilityRepo::create(&pool, "Ownership", "", "#ff0000", Some(parent.id))
        .await
        .unwrap();
    let traits = AbilityRepo::create(&pool, "Traits", "", "#ff0000", Some(parent.id))
        .await
        .unwrap();
    let studylog = StudylogRepo::create(&pool, member.id, "borrowck", "notes").await.unwrap();

    let mut report = draft(member.id, "T1", false);
    report.studylogs = vec![
        ReportedStudylogDraft {
            studylog_id: studylog.id,
            ability_ids: vec![ownership.id],
        },
        ReportedStudylogDraft {
            studylog_id: studylog.id,
            ability_ids: vec![traits.id],
        },
    ];

    let mut conn = pool.acquire().await.unwrap();
    let saved = ReportRepo::insert(&mut conn, &report).await.unwrap();

    assert_eq!(ReportRepo::reported_studylogs(&pool, saved.id).await.unwrap().len(), 1);
    let mut cited: Vec<i64> = ReportRepo::reported_studylog_abilities(&pool, saved.id)
        .await
        .unwrap()
        .iter()
        .map(|row| row.ability_id)
        .collect();
    cited.sort();
    assert_eq!(cited, vec![ownership.id, traits.id]);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_replaces_children(pool: PgPool) {
    let member = seed_member(&pool, "verus", 1).await;
    let first = AbilityRepo::create(&pool, "Rust", "", "#ff0000", None).await.unwrap();
    let second = AbilityRepo::create(&pool, "SQL", "", "#00ff00", None).await.unwrap();

    let mut report = draft(member.id, "T1", false);
    report.graph = vec![GraphAbility {
        ability_id: first.id,
        weight: 1,
        is_present: true,
    }];
    let mut conn = pool.acquire().await.unwrap();
    let saved = ReportRepo::insert(&mut conn, &report).await.unwrap();

    report.title = "T2".into();
    report.graph = vec![GraphAbility {
        ability_id: second.id,
        weight: 2,
        is_present: false,
    }];
    let updated = ReportRepo::update(&mut conn, saved.id, &report)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "T2");

    let graph = ReportRepo::graph_abilities(&pool, saved.id).await.unwrap();
    assert_eq!(graph.len(), 1);
    assert_eq!(graph[0].ability_id, second.id);
    assert!(!graph[0].is_present);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_missing_report_returns_none(pool: PgPool) {
    let member = seed_member(&pool, "verus", 1).await;
    let mut conn = pool.acquire().await.unwrap();
    let result = ReportRepo::update(&mut conn, 9999, &draft(member.id, "T", false))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn demote_represent_keeps_exception(pool: PgPool) {
    let member = seed_member(&pool, "verus", 1).await;
    let mut conn = pool.acquire().await.unwrap();
    let old = ReportRepo::insert(&mut conn, &draft(member.id, "old", true)).await.unwrap();

    let demoted = ReportRepo::demote_represent(&pool, member.id, Some(old.id)).await.unwrap();
    assert_eq!(demoted, 0);

    let demoted = ReportRepo::demote_represent(&pool, member.id, None).await.unwrap();
    assert_eq!(demoted, 1);
    assert!(ReportRepo::find_represent_of(&pool, member.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn second_represent_report_violates_index(pool: PgPool) {
    let member = seed_member(&pool, "verus", 1).await;
    let mut conn = pool.acquire().await.unwrap();
    ReportRepo::insert(&mut conn, &draft(member.id, "a", true)).await.unwrap();

    let err = ReportRepo::insert(&mut conn, &draft(member.id, "b", true))
        .await
        .unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db)
        if db.constraint() == Some("uq_reports_member_represent"));
}

#[sqlx::test(migrations = "./migrations")]
async fn title_lookup_is_scoped_to_member(pool: PgPool) {
    let verus = seed_member(&pool, "verus", 1).await;
    let sudal = seed_member(&pool, "sudal", 2).await;
    let mut conn = pool.acquire().await.unwrap();
    let report = ReportRepo::insert(&mut conn, &draft(verus.id, "T1", false)).await.unwrap();

    let found = ReportRepo::find_by_title_and_member(&pool, "T1", verus.id).await.unwrap();
    assert_eq!(found.map(|r| r.id), Some(report.id));
    assert!(ReportRepo::find_by_title_and_member(&pool, "T1", sudal.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn list_by_member_pages_newest_first(pool: PgPool) {
    let member = seed_member(&pool, "verus", 1).await;
    let mut conn = pool.acquire().await.unwrap();
    for title in ["a", "b", "c"] {
        ReportRepo::insert(&mut conn, &draft(member.id, title, false)).await.unwrap();
    }

    let page = ReportRepo::list_by_member(&pool, member.id, 2, 0).await.unwrap();
    let titles: Vec<_> = page.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["c", "b"]);
    assert_eq!(ReportRepo::count_by_member(&pool, member.id).await.unwrap(), 3);
}
