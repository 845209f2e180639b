// ABOUTME: Tests for the SQLite camp repository change-set commit semantics
// ABOUTME: Validates that mutations only apply on save_changes and that deletes cascade

use chrono::NaiveDate;
use codecamp_api::{
    database::{CampRepository, ChangeSet, SqliteCampRepository},
    models::{Camp, Talk, TalkLevel},
};
use uuid::Uuid;

async fn test_repository() -> SqliteCampRepository {
    let repository = SqliteCampRepository::new("sqlite::memory:")
        .await
        .expect("in-memory database");
    repository.migrate().await.expect("migrations");
    repository
}

fn atlanta() -> Camp {
    Camp {
        moniker: "ATL2018".into(),
        name: "Atlanta Code Camp".into(),
        location: "Atlanta, GA".into(),
        event_date: NaiveDate::from_ymd_opt(2018, 3, 10).unwrap(),
        talks: vec![Talk {
            id: Uuid::new_v4(),
            title: "Entity Mapping".into(),
            abstract_text: "Projections at the wire boundary".into(),
            level: TalkLevel::Introductory,
        }],
    }
}

#[tokio::test]
async fn test_staged_add_is_invisible_until_commit() {
    let repository = test_repository().await;

    let mut changes = ChangeSet::new();
    changes.add_camp(atlanta());
    assert!(repository.get_camp("ATL2018").await.unwrap().is_none());

    assert!(repository.save_changes(changes).await.unwrap());
    let camp = repository
        .get_camp("ATL2018")
        .await
        .unwrap()
        .expect("committed camp");
    assert_eq!(camp.name, "Atlanta Code Camp");
    assert_eq!(camp.talks.len(), 1);
}

#[tokio::test]
async fn test_save_with_nothing_staged_reports_false() {
    let repository = test_repository().await;
    assert!(!repository.save_changes(ChangeSet::new()).await.unwrap());
}

#[tokio::test]
async fn test_change_sets_commit_independently() {
    let repository = test_repository().await;

    // Two callers stage work at the same time, each into its own batch
    let mut first = ChangeSet::new();
    first.add_camp(atlanta());

    let mut seattle = atlanta();
    seattle.moniker = "SEA2019".into();
    seattle.talks.clear();
    let mut second = ChangeSet::new();
    second.add_camp(seattle);

    // Committing the first batch applies only its own camp
    assert!(repository.save_changes(first).await.unwrap());
    assert!(repository.get_camp("ATL2018").await.unwrap().is_some());
    assert!(repository.get_camp("SEA2019").await.unwrap().is_none());

    // The second batch still has its work and commits successfully
    assert!(repository.save_changes(second).await.unwrap());
    assert!(repository.get_camp("SEA2019").await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_cascades_to_talks() {
    let repository = test_repository().await;

    let camp = atlanta();
    let talk_id = camp.talks[0].id;
    let mut changes = ChangeSet::new();
    changes.add_camp(camp);
    repository.save_changes(changes).await.unwrap();
    assert!(repository
        .get_talk("ATL2018", talk_id)
        .await
        .unwrap()
        .is_some());

    let mut changes = ChangeSet::new();
    changes.delete_camp("ATL2018");
    assert!(repository.save_changes(changes).await.unwrap());

    assert!(repository.get_camp("ATL2018").await.unwrap().is_none());
    assert!(repository
        .get_talk("ATL2018", talk_id)
        .await
        .unwrap()
        .is_none());
    assert!(repository.get_talks("ATL2018").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_by_event_date_filters() {
    let repository = test_repository().await;

    let mut seattle = atlanta();
    seattle.moniker = "SEA2019".into();
    seattle.name = "Seattle Code Camp".into();
    seattle.event_date = NaiveDate::from_ymd_opt(2019, 9, 14).unwrap();
    seattle.talks.clear();

    let mut changes = ChangeSet::new();
    changes.add_camp(atlanta());
    changes.add_camp(seattle);
    repository.save_changes(changes).await.unwrap();

    let date = NaiveDate::from_ymd_opt(2018, 3, 10).unwrap();
    let matches = repository.get_camps_by_event_date(date, false).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].moniker, "ATL2018");

    let none = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    assert!(repository
        .get_camps_by_event_date(none, false)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_list_ordering_and_include_talks() {
    let repository = test_repository().await;

    let mut seattle = atlanta();
    seattle.moniker = "SEA2019".into();
    seattle.talks.clear();

    let mut changes = ChangeSet::new();
    changes.add_camp(seattle);
    changes.add_camp(atlanta());
    repository.save_changes(changes).await.unwrap();

    let without = repository.get_all_camps(false).await.unwrap();
    assert_eq!(without.len(), 2);
    // Ordered by moniker regardless of insertion order
    assert_eq!(without[0].moniker, "ATL2018");
    assert!(without.iter().all(|c| c.talks.is_empty()));

    let with = repository.get_all_camps(true).await.unwrap();
    assert_eq!(with[0].talks.len(), 1);
    assert!(with[1].talks.is_empty());
}

#[tokio::test]
async fn test_ping() {
    let repository = test_repository().await;
    repository.ping().await.unwrap();
}

#[tokio::test]
async fn test_file_backed_database_persists_across_connections() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite:{}/camps.db", dir.path().display());

    {
        let repository = SqliteCampRepository::new(&url).await.unwrap();
        repository.migrate().await.unwrap();
        let mut changes = ChangeSet::new();
        changes.add_camp(atlanta());
        assert!(repository.save_changes(changes).await.unwrap());
    }

    let repository = SqliteCampRepository::new(&url).await.unwrap();
    repository.migrate().await.unwrap();
    let camp = repository
        .get_camp("ATL2018")
        .await
        .unwrap()
        .expect("persisted camp");
    assert_eq!(camp.event_date, NaiveDate::from_ymd_opt(2018, 3, 10).unwrap());
}
