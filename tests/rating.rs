#[cfg(test)]
mod tests {
    use sleeplog::db::db::Db;
    use sleeplog::db::nights::Nights;
    use sleeplog::libs::error::SleepError;
    use sleeplog::libs::night::SleepNight;
    use sleeplog::libs::rating::{RatingController, RatingEvent};
    use tokio_util::sync::CancellationToken;

    fn store_with_finished_night() -> (Nights, i64) {
        let nights = Nights::from_db(Db::open_in_memory().unwrap()).unwrap();
        let id = nights
            .insert(&SleepNight {
                end_time_milli: 28_800_000,
                ..SleepNight::new(0)
            })
            .unwrap();
        (nights, id)
    }

    #[tokio::test]
    async fn test_set_quality_stores_rating_and_signals() {
        let (nights, id) = store_with_finished_night();
        let rating = RatingController::new(nights.clone(), id, CancellationToken::new());
        assert_eq!(rating.night_id(), id);
        assert_eq!(rating.state().event, None);

        assert!(rating.set_quality(4).await.unwrap());

        let night = nights.get(id).unwrap().unwrap();
        assert_eq!(night.quality, 4);
        assert_eq!(night.end_time_milli, 28_800_000);
        assert_eq!(rating.state().event, Some(RatingEvent::ReturnToTracker));
    }

    #[tokio::test]
    async fn test_acknowledge_clears_return_signal() {
        let (nights, id) = store_with_finished_night();
        let rating = RatingController::new(nights, id, CancellationToken::new());
        let mut observer = rating.subscribe();

        rating.set_quality(2).await.unwrap();
        assert_eq!(observer.borrow_and_update().event, Some(RatingEvent::ReturnToTracker));

        rating.acknowledge_return();
        assert_eq!(observer.borrow_and_update().event, None);

        rating.acknowledge_return();
        assert!(!observer.has_changed().unwrap());
        assert_eq!(rating.state().event, None);
    }

    #[tokio::test]
    async fn test_missing_night_is_a_silent_no_op() {
        let (nights, id) = store_with_finished_night();
        let before = nights.list_all().unwrap();

        let rating = RatingController::new(nights.clone(), id + 100, CancellationToken::new());
        assert!(!rating.set_quality(3).await.unwrap());

        assert_eq!(nights.list_all().unwrap(), before);
        assert_eq!(rating.state().event, None);
    }

    #[tokio::test]
    async fn test_night_removed_by_clear_is_not_rated() {
        let (nights, id) = store_with_finished_night();
        let rating = RatingController::new(nights.clone(), id, CancellationToken::new());

        nights.clear().unwrap();
        assert!(!rating.set_quality(5).await.unwrap());
        assert!(nights.list_all().unwrap().is_empty());
        assert_eq!(rating.state().event, None);
    }

    #[tokio::test]
    async fn test_out_of_range_quality_is_rejected() {
        let (nights, id) = store_with_finished_night();
        let rating = RatingController::new(nights.clone(), id, CancellationToken::new());

        assert!(matches!(rating.set_quality(6).await, Err(SleepError::InvalidQuality(6))));
        assert!(matches!(rating.set_quality(-2).await, Err(SleepError::InvalidQuality(-2))));
        assert_eq!(nights.get(id).unwrap().unwrap().quality, -1);
        assert_eq!(rating.state().event, None);

        // -1 resets a night to unrated.
        assert!(rating.set_quality(-1).await.unwrap());
    }

    #[tokio::test]
    async fn test_rating_can_be_changed() {
        let (nights, id) = store_with_finished_night();
        let rating = RatingController::new(nights.clone(), id, CancellationToken::new());

        rating.set_quality(1).await.unwrap();
        rating.acknowledge_return();
        rating.set_quality(5).await.unwrap();

        assert_eq!(nights.get(id).unwrap().unwrap().quality, 5);
        assert_eq!(rating.state().event, Some(RatingEvent::ReturnToTracker));
    }

    #[tokio::test]
    async fn test_cancelled_rating_writes_nothing() {
        let (nights, id) = store_with_finished_night();
        let cancel = CancellationToken::new();
        let rating = RatingController::new(nights.clone(), id, cancel.clone());

        cancel.cancel();
        assert!(matches!(rating.set_quality(3).await, Err(SleepError::Cancelled)));
        assert_eq!(nights.get(id).unwrap().unwrap().quality, -1);
    }

    #[tokio::test]
    async fn test_dropping_one_controller_leaves_siblings_running() {
        let (nights, id) = store_with_finished_night();
        let cancel = CancellationToken::new();

        let first = RatingController::new(nights.clone(), id, cancel.clone());
        drop(first);

        let second = RatingController::new(nights.clone(), id, cancel.clone());
        assert!(second.set_quality(3).await.unwrap());
        assert!(!cancel.is_cancelled());
    }
}
