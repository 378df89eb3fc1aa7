use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory cache of per-mission lists.
///
/// Filled once per mission and reused for the rest of the session; callers
/// decide when to refetch.
pub struct MissionCache<T> {
    entries: Arc<RwLock<HashMap<i64, Vec<T>>>>,
}

impl<T: Clone> MissionCache<T> {
    /// Creates a new empty MissionCache.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Gets the cached list of a mission.
    ///
    /// # Arguments
    ///
    /// * `mission_id` - The mission the list belongs to
    ///
    /// # Returns
    ///
    /// `Some(list)` if the mission is cached, `None` otherwise.
    pub async fn get(&self, mission_id: i64) -> Option<Vec<T>> {
        let entries = self.entries.read().await;
        entries.get(&mission_id).cloned()
    }

    pub async fn contains(&self, mission_id: i64) -> bool {
        self.entries.read().await.contains_key(&mission_id)
    }

    /// Replaces the list of a mission.
    pub async fn insert(&self, mission_id: i64, items: Vec<T>) {
        let mut entries = self.entries.write().await;
        entries.insert(mission_id, items);
    }

    /// Runs `f` on the cached list of a mission, creating it if needed.
    pub async fn update<R>(&self, mission_id: i64, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let mut entries = self.entries.write().await;
        f(entries.entry(mission_id).or_default())
    }

    pub async fn remove(&self, mission_id: i64) {
        let mut entries = self.entries.write().await;
        entries.remove(&mission_id);
    }

    /// Clears all cached missions.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }
}

impl<T: Clone> Default for MissionCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for MissionCache<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_creates_missing_entry() {
        let cache: MissionCache<&str> = MissionCache::new();
        assert!(!cache.contains(4).await);

        cache.update(4, |items| items.push("a")).await;
        assert_eq!(cache.get(4).await, Some(vec!["a"]));

        let shared = cache.clone();
        shared.clear().await;
        assert!(cache.get(4).await.is_none());
    }
}
