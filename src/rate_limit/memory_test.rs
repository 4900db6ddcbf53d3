use super::*;

#[tokio::test]
async fn counts_up_within_one_window() {
    let store = MemoryCounterStore::new();

    assert_eq!(store.try_acquire("p:k", 0, 60, 5).await.unwrap(), Some(1));
    assert_eq!(store.try_acquire("p:k", 0, 60, 5).await.unwrap(), Some(2));
    assert_eq!(store.try_acquire("p:k", 0, 60, 5).await.unwrap(), Some(3));
}

#[tokio::test]
async fn rejects_at_limit_without_consuming() {
    let store = MemoryCounterStore::new();

    assert_eq!(store.try_acquire("p:k", 0, 60, 2).await.unwrap(), Some(1));
    assert_eq!(store.try_acquire("p:k", 0, 60, 2).await.unwrap(), Some(2));
    assert_eq!(store.try_acquire("p:k", 0, 60, 2).await.unwrap(), None);
    assert_eq!(store.try_acquire("p:k", 0, 60, 2).await.unwrap(), None);

    // Rejections consumed nothing: the next window grants the full budget.
    assert_eq!(store.try_acquire("p:k", 60, 60, 2).await.unwrap(), Some(1));
    assert_eq!(store.try_acquire("p:k", 60, 60, 2).await.unwrap(), Some(2));
}

#[tokio::test]
async fn new_window_resets_count() {
    let store = MemoryCounterStore::new();

    store.try_acquire("p:k", 0, 60, 1).await.unwrap();
    assert_eq!(store.try_acquire("p:k", 0, 60, 1).await.unwrap(), None);
    assert_eq!(store.try_acquire("p:k", 60, 60, 1).await.unwrap(), Some(1));
}

#[tokio::test]
async fn buckets_are_independent() {
    let store = MemoryCounterStore::new();

    store.try_acquire("p:a", 0, 60, 1).await.unwrap();
    assert_eq!(store.try_acquire("p:a", 0, 60, 1).await.unwrap(), None);
    assert_eq!(store.try_acquire("p:b", 0, 60, 1).await.unwrap(), Some(1));
}

#[tokio::test]
async fn sweep_drops_only_expired_windows() {
    let store = MemoryCounterStore::new();

    store.try_acquire("p:old", 0, 60, 5).await.unwrap();
    store.try_acquire("p:live", 120, 60, 5).await.unwrap();

    let removed = store.sweep(120).await.unwrap();
    assert_eq!(removed, 1);

    // The live window kept its count.
    assert_eq!(store.try_acquire("p:live", 120, 60, 5).await.unwrap(), Some(2));
}
