use time::{Date, Month};
use trackbot_core::{open_session_in_memory, FixedClock, NewTracking, PersistenceGateway};

fn gateway() -> PersistenceGateway<FixedClock> {
    let today = Date::from_calendar_date(2026, Month::October, 19).unwrap();
    PersistenceGateway::with_clock(FixedClock(today))
}

#[tokio::test]
async fn created_tracking_is_listed() {
    let session = open_session_in_memory().await.unwrap();
    let gateway = gateway();
    gateway.create_user(&session, 12234, 3).await.unwrap();

    assert!(gateway.create_tracking(&session, 55, 2, 12234).await.unwrap());

    let trackings = gateway.list_trackings(&session).await.unwrap();
    let expected = NewTracking {
        user_id: 12234,
        product_id: 55,
        count: 2,
    };
    assert_eq!(trackings.len(), 1);
    assert!(trackings[0].matches(&expected));
}

#[tokio::test]
async fn identical_requests_create_distinct_rows() {
    let session = open_session_in_memory().await.unwrap();
    let gateway = gateway();

    for _ in 0..3 {
        assert!(gateway.create_tracking(&session, 55, 2, 1).await.unwrap());
    }

    let trackings = gateway.list_trackings(&session).await.unwrap();
    assert_eq!(trackings.len(), 3);
    assert!(trackings[0].id < trackings[1].id && trackings[1].id < trackings[2].id);
}

#[tokio::test]
async fn trackings_are_listed_by_user_id() {
    let session = open_session_in_memory().await.unwrap();
    let gateway = gateway();

    for (user_id, product_id) in [(3, 1), (1, 2), (2, 3), (1, 4)] {
        gateway
            .create_tracking(&session, product_id, 1, user_id)
            .await
            .unwrap();
    }

    let order: Vec<_> = gateway
        .list_trackings(&session)
        .await
        .unwrap()
        .into_iter()
        .map(|t| (t.user_id, t.product_id))
        .collect();
    assert_eq!(order, vec![(1, 2), (1, 4), (2, 3), (3, 1)]);

    let user_one = gateway.list_user_trackings(&session, 1).await.unwrap();
    assert_eq!(user_one.len(), 2);
}

#[tokio::test]
async fn tracking_for_unknown_user_is_accepted() {
    let session = open_session_in_memory().await.unwrap();
    let gateway = gateway();

    assert!(gateway.create_tracking(&session, 8, 1, 777).await.unwrap());
    assert!(gateway.get_user(&session, 777).await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_user_leaves_orphans_until_purged() {
    let session = open_session_in_memory().await.unwrap();
    let gateway = gateway();
    gateway.create_user(&session, 1, 3).await.unwrap();
    gateway.create_user(&session, 2, 3).await.unwrap();
    gateway.create_tracking(&session, 10, 1, 1).await.unwrap();
    gateway.create_tracking(&session, 11, 1, 1).await.unwrap();
    gateway.create_tracking(&session, 12, 1, 2).await.unwrap();

    assert!(gateway.delete_user(&session, 1).await.unwrap());
    assert_eq!(gateway.list_trackings(&session).await.unwrap().len(), 3);

    assert_eq!(gateway.purge_orphaned_trackings(&session).await.unwrap(), 2);
    let remaining = gateway.list_trackings(&session).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].user_id, 2);

    assert_eq!(gateway.purge_orphaned_trackings(&session).await.unwrap(), 0);
}
