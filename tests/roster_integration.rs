//! Roster integration tests
//!
//! Runs the crew and damage-record flows against the in-memory store.

use std::sync::Arc;

use gearsmith::roster::{
    parse_eok_damage, DocumentStore, Enhancements, MemoryStore, NewCrew, Roster, user_collection,
};
use serde_json::json;

fn crew(id: &str, job: &str) -> NewCrew {
    NewCrew {
        id: id.into(),
        job: job.into(),
        equipped_items: vec!["소검".into()],
        enhancements: Enhancements {
            weapon_enhance: 10,
            ..Enhancements::default()
        },
        ..NewCrew::default()
    }
}

#[tokio::test]
async fn test_record_keeps_snapshot_after_loadout_changes() {
    let roster = Roster::new(MemoryStore::new(), "user-1", 30);
    let doc_id = roster.create_crew(&crew("본캐", "웨펀마스터")).await.unwrap();
    let members = roster.load_crew().await.unwrap();
    assert_eq!(members.len(), 1);
    let member = &members[0];

    let damage = parse_eok_damage("1,234.5").unwrap();
    let record_id = roster.record_damage(member, damage, "  수련장 1회차  ").await.unwrap();

    let items = vec!["흑검".to_string()];
    roster
        .update_loadout(
            &doc_id,
            Some(&items),
            Enhancements {
                weapon_enhance: 12,
                ..Enhancements::default()
            },
        )
        .await
        .unwrap();

    let records = roster.load_records().await.unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.doc_id, record_id);
    assert_eq!(record.damage, 123_450_000_000.0);
    assert_eq!(record.memo.as_deref(), Some("수련장 1회차"));
    assert_eq!(record.damage_label(), "1,234 億");

    let snapshot = record.crew_snapshot.as_ref().unwrap();
    assert_eq!(snapshot.equipped_items, Some(vec!["소검".to_string()]));
    assert_eq!(snapshot.enhancements.weapon_enhance, 10);

    let updated = roster.load_crew().await.unwrap();
    assert_eq!(updated[0].equipped_items, Some(items));
    assert_eq!(updated[0].enhancements.weapon_enhance, 12);
}

#[tokio::test]
async fn test_listing_skips_bad_documents_and_sorts() {
    let store = Arc::new(MemoryStore::new());
    let crew_path = user_collection("u", "crew");
    let records_path = user_collection("u", "records");

    for doc in [
        json!({"id": "b", "job": "런처", "order": 20}),
        json!({"id": "", "job": "런처", "order": 1}),
        json!({"id": "a", "job": "레인저", "order": 10}),
    ] {
        store.add(&crew_path, doc.as_object().unwrap().clone()).await.unwrap();
    }
    for doc in [
        json!({"damage": 10, "crewId": "a", "crewJob": "레인저", "createdAt": 1}),
        json!({"damage": -5, "crewId": "a", "crewJob": "레인저", "createdAt": 2}),
        json!({"damage": 30, "crewId": "b", "crewJob": "런처", "createdAt": 3}),
    ] {
        store.add(&records_path, doc.as_object().unwrap().clone()).await.unwrap();
    }

    let roster = Roster::new(Arc::clone(&store), "u", 30);
    let ids: Vec<String> = roster.load_crew().await.unwrap().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);

    let damages: Vec<f64> = roster.load_records().await.unwrap().iter().map(|r| r.damage).collect();
    assert_eq!(damages, vec![30.0, 10.0]);
}

#[tokio::test]
async fn test_equal_timestamps_list_later_insert_first() {
    let store = Arc::new(MemoryStore::new());
    let records_path = user_collection("u", "records");
    for doc in [
        json!({"damage": 1, "crewId": "a", "crewJob": "런처", "createdAt": 5}),
        json!({"damage": 2, "crewId": "a", "crewJob": "런처", "createdAt": 9}),
        json!({"damage": 3, "crewId": "a", "crewJob": "런처", "createdAt": 5}),
    ] {
        store.add(&records_path, doc.as_object().unwrap().clone()).await.unwrap();
    }

    let roster = Roster::new(Arc::clone(&store), "u", 30);
    let damages: Vec<f64> = roster.load_records().await.unwrap().iter().map(|r| r.damage).collect();
    assert_eq!(damages, vec![2.0, 3.0, 1.0]);
}

#[tokio::test]
async fn test_delete_record() {
    let roster = Roster::new(MemoryStore::new(), "u", 30);
    roster.create_crew(&crew("a", "런처")).await.unwrap();
    let member = roster.load_crew().await.unwrap().remove(0);

    let first = roster.record_damage(&member, 100, "").await.unwrap();
    roster.record_damage(&member, 200, "").await.unwrap();
    roster.delete_record(&first).await.unwrap();

    let left = roster.records_for(&member.doc_id).await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].damage, 200.0);
    assert!(roster.delete_record(&first).await.is_err());
}
