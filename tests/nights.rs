#[cfg(test)]
mod tests {
    use sleeplog::db::db::Db;
    use sleeplog::db::nights::Nights;
    use sleeplog::libs::error::SleepError;
    use sleeplog::libs::night::SleepNight;
    use std::time::Duration;
    use test_context::{test_context, TestContext};

    struct NightsTestContext {
        nights: Nights,
    }

    impl TestContext for NightsTestContext {
        fn setup() -> Self {
            let nights = Nights::from_db(Db::open_in_memory().unwrap()).unwrap();
            NightsTestContext { nights }
        }
    }

    fn finished(start: i64, end: i64) -> SleepNight {
        SleepNight {
            end_time_milli: end,
            ..SleepNight::new(start)
        }
    }

    #[test_context(NightsTestContext)]
    #[test]
    fn test_empty_store(ctx: &mut NightsTestContext) {
        assert!(ctx.nights.list_all().unwrap().is_empty());
        assert!(ctx.nights.get_tonight().unwrap().is_none());
        assert!(ctx.nights.get(1).unwrap().is_none());
    }

    #[test_context(NightsTestContext)]
    #[test]
    fn test_insert_assigns_increasing_ids(ctx: &mut NightsTestContext) {
        let first = ctx.nights.insert(&finished(100, 200)).unwrap();
        let second = ctx.nights.insert(&SleepNight::new(300)).unwrap();
        assert!(second > first);

        let tonight = ctx.nights.get_tonight().unwrap().unwrap();
        assert_eq!(tonight.id, Some(second));
        assert!(tonight.is_in_progress());

        let stored = ctx.nights.get(first).unwrap().unwrap();
        assert_eq!(stored.start_time_milli, 100);
        assert_eq!(stored.end_time_milli, 200);
        assert_eq!(stored.quality, -1);
    }

    #[test_context(NightsTestContext)]
    #[test]
    fn test_insert_if_idle_refuses_second_open_night(ctx: &mut NightsTestContext) {
        let id = ctx.nights.insert_if_idle(&SleepNight::new(100)).unwrap();
        assert!(id.is_some());
        assert_eq!(ctx.nights.insert_if_idle(&SleepNight::new(200)).unwrap(), None);
        assert_eq!(ctx.nights.list_all().unwrap().len(), 1);

        let mut night = ctx.nights.get(id.unwrap()).unwrap().unwrap();
        night.end_time_milli = 150;
        ctx.nights.update(&night).unwrap();
        assert!(ctx.nights.insert_if_idle(&SleepNight::new(200)).unwrap().is_some());
    }

    #[test_context(NightsTestContext)]
    #[test]
    fn test_list_all_is_newest_first(ctx: &mut NightsTestContext) {
        for start in [10, 20, 30] {
            ctx.nights.insert(&finished(start, start + 5)).unwrap();
        }
        let starts: Vec<i64> = ctx.nights.list_all().unwrap().iter().map(|n| n.start_time_milli).collect();
        assert_eq!(starts, vec![30, 20, 10]);
    }

    #[test_context(NightsTestContext)]
    #[test]
    fn test_insert_rejects_duplicate_id(ctx: &mut NightsTestContext) {
        let id = ctx.nights.insert(&SleepNight::new(1)).unwrap();
        let duplicate = SleepNight {
            id: Some(id),
            ..SleepNight::new(2)
        };

        let result = ctx.nights.insert(&duplicate);
        assert!(matches!(result, Err(SleepError::DuplicateId(dup)) if dup == id));
        assert_eq!(ctx.nights.list_all().unwrap().len(), 1);
        assert_eq!(ctx.nights.get(id).unwrap().unwrap().start_time_milli, 1);
    }

    #[test_context(NightsTestContext)]
    #[test]
    fn test_update_overwrites_by_id(ctx: &mut NightsTestContext) {
        let id = ctx.nights.insert(&SleepNight::new(1_000)).unwrap();
        let mut night = ctx.nights.get(id).unwrap().unwrap();
        night.end_time_milli = 5_000;
        night.quality = 4;
        ctx.nights.update(&night).unwrap();

        assert_eq!(ctx.nights.get(id).unwrap().unwrap(), night);
    }

    #[test_context(NightsTestContext)]
    #[test]
    fn test_update_missing_night_writes_nothing(ctx: &mut NightsTestContext) {
        ctx.nights.insert(&finished(1, 2)).unwrap();
        let before = ctx.nights.list_all().unwrap();

        let ghost = SleepNight {
            id: Some(999),
            ..finished(5, 6)
        };
        assert!(matches!(ctx.nights.update(&ghost), Err(SleepError::NotFound(999))));
        assert!(matches!(ctx.nights.update(&SleepNight::new(7)), Err(SleepError::InvalidState(_))));
        assert_eq!(ctx.nights.list_all().unwrap(), before);
    }

    #[test_context(NightsTestContext)]
    #[test]
    fn test_clear_removes_everything(ctx: &mut NightsTestContext) {
        ctx.nights.insert(&finished(1, 2)).unwrap();
        let last = ctx.nights.insert(&finished(3, 4)).unwrap();

        ctx.nights.clear().unwrap();
        assert!(ctx.nights.list_all().unwrap().is_empty());
        assert!(ctx.nights.get_tonight().unwrap().is_none());

        // Ids are never handed out twice, not even after a clear.
        let next = ctx.nights.insert(&SleepNight::new(5)).unwrap();
        assert!(next > last);
    }

    #[test_context(NightsTestContext)]
    #[test]
    fn test_subscribers_receive_snapshots(ctx: &mut NightsTestContext) {
        let mut snapshots = ctx.nights.subscribe();
        assert!(snapshots.borrow_and_update().is_empty());

        let id = ctx.nights.insert(&SleepNight::new(10)).unwrap();
        assert!(snapshots.has_changed().unwrap());
        assert_eq!(snapshots.borrow_and_update()[0].id, Some(id));

        let mut night = ctx.nights.get(id).unwrap().unwrap();
        night.quality = 2;
        ctx.nights.update(&night).unwrap();
        assert!(snapshots.has_changed().unwrap());
        assert_eq!(snapshots.borrow_and_update()[0].quality, 2);

        ctx.nights.clear().unwrap();
        assert!(snapshots.has_changed().unwrap());
        assert!(snapshots.borrow_and_update().is_empty());
    }

    #[test_context(NightsTestContext)]
    #[test]
    fn test_failed_insert_publishes_nothing(ctx: &mut NightsTestContext) {
        let id = ctx.nights.insert(&SleepNight::new(10)).unwrap();
        let mut snapshots = ctx.nights.subscribe();
        snapshots.borrow_and_update();

        let _ = ctx.nights.insert(&SleepNight {
            id: Some(id),
            ..SleepNight::new(11)
        });
        assert!(!snapshots.has_changed().unwrap());
    }

    #[test]
    fn test_nights_persist_across_connections() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("sleeplog.db");

        let id = {
            let nights = Nights::from_db(Db::open(&path).unwrap()).unwrap();
            nights.insert(&finished(100, 900)).unwrap()
        };

        let nights = Nights::from_db(Db::open(&path).unwrap()).unwrap();
        let night = nights.get(id).unwrap().unwrap();
        assert_eq!(night.start_time_milli, 100);
        assert_eq!(night.end_time_milli, 900);
        assert_eq!(nights.subscribe().borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_io_runs_on_blocking_pool() {
        let nights = Nights::from_db(Db::open_in_memory().unwrap()).unwrap();
        let id = nights.io(|n| n.insert(&SleepNight::new(42))).await.unwrap();
        let night = nights.io(move |n| n.get(id)).await.unwrap();
        assert_eq!(night.map(|n| n.start_time_milli), Some(42));

        let missing = nights
            .io(|n| {
                n.update(&SleepNight {
                    id: Some(77),
                    ..SleepNight::new(1)
                })
            })
            .await;
        assert!(matches!(missing, Err(SleepError::NotFound(77))));
    }

    #[tokio::test]
    async fn test_subscribe_night_tracks_single_record() {
        let nights = Nights::from_db(Db::open_in_memory().unwrap()).unwrap();
        let id = nights.insert(&SleepNight::new(10)).unwrap();
        let other = nights.insert(&SleepNight::new(20)).unwrap();

        let mut watched = nights.subscribe_night(id);
        assert_eq!(watched.borrow_and_update().as_ref().map(|n| n.quality), Some(-1));

        let mut night = nights.get(id).unwrap().unwrap();
        night.end_time_milli = 30;
        night.quality = 5;
        nights.update(&night).unwrap();

        tokio::time::timeout(Duration::from_secs(2), watched.changed()).await.unwrap().unwrap();
        assert_eq!(watched.borrow_and_update().as_ref().map(|n| n.quality), Some(5));

        // Changes to other nights do not wake the watcher.
        let mut other_night = nights.get(other).unwrap().unwrap();
        other_night.quality = 1;
        nights.update(&other_night).unwrap();
        tokio::task::yield_now().await;
        assert!(!watched.has_changed().unwrap());

        nights.clear().unwrap();
        tokio::time::timeout(Duration::from_secs(2), watched.changed()).await.unwrap().unwrap();
        assert!(watched.borrow_and_update().is_none());
    }
}
