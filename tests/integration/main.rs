//! Integration tests for Trolley

mod lifecycle_tests {
    use std::sync::Arc;
    use tempfile::TempDir;
    use trolley::{CartManager, FileStore, NewItem, Totals};

    fn product(id: &str, price: f64) -> NewItem {
        NewItem {
            id: id.to_string(),
            title: id.to_uppercase(),
            image_url: format!("https://img.example/{id}.png"),
            price,
        }
    }

    #[tokio::test]
    async fn cart_survives_a_restart() {
        let dir = TempDir::new().unwrap();

        // First session: build up a cart and flush it to disk
        {
            let manager = CartManager::init(Arc::new(FileStore::new(dir.path())));
            manager.hydrate().await;

            manager.add_to_cart(product("apple", 1.5)).unwrap();
            manager.add_to_cart(product("banana", 0.5)).unwrap();
            manager.increment("apple").unwrap();
            manager.flush().await.unwrap();
        }

        // Second session: hydration restores the exact cart
        let manager = CartManager::init(Arc::new(FileStore::new(dir.path())));
        let items = manager.hydrate().await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "apple");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[1].id, "banana");
        assert_eq!(items[1].quantity, 1);
    }

    #[tokio::test]
    async fn removal_at_quantity_one_is_durable() {
        let dir = TempDir::new().unwrap();

        {
            let manager = CartManager::init(Arc::new(FileStore::new(dir.path())));
            manager.hydrate().await;
            manager.add_to_cart(product("apple", 1.5)).unwrap();
            manager.add_to_cart(product("banana", 0.5)).unwrap();
            manager.decrement("apple").unwrap();
            manager.flush().await.unwrap();
        }

        let manager = CartManager::init(Arc::new(FileStore::new(dir.path())));
        let items = manager.hydrate().await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "banana");
    }

    #[tokio::test]
    async fn totals_track_the_live_snapshot() {
        let dir = TempDir::new().unwrap();
        let manager = CartManager::init(Arc::new(FileStore::new(dir.path())));
        manager.hydrate().await;

        manager.add_to_cart(product("apple", 10.0)).unwrap();
        manager.increment("apple").unwrap();
        manager.add_to_cart(product("banana", 5.0)).unwrap();

        // Snapshot reflects the mutations before any flush
        let totals = Totals::of(&manager.products().unwrap());
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.total_price, 25.0);
    }

    #[tokio::test]
    async fn subscriber_follows_a_full_session() {
        let dir = TempDir::new().unwrap();
        let manager = CartManager::init(Arc::new(FileStore::new(dir.path())));
        manager.hydrate().await;

        let counts = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&counts);
        let _sub = manager.subscribe(move |items| {
            sink.lock().unwrap().push(Totals::of(items).item_count);
        });

        manager.add_to_cart(product("apple", 1.5)).unwrap();
        manager.increment("apple").unwrap();
        manager.decrement("apple").unwrap();
        manager.decrement("apple").unwrap();
        manager.flush().await.unwrap();

        assert_eq!(*counts.lock().unwrap(), [1, 2, 1, 0]);
    }
}
