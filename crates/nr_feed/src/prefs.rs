use nr_storage::{DurableStore, Persisted, DARK_MODE_KEY};

/// User preferences that survive across sessions.
pub struct Preferences {
    dark_mode: Persisted<bool>,
}

impl Preferences {
    pub async fn load(store: DurableStore) -> Self {
        Self {
            dark_mode: Persisted::load(store, DARK_MODE_KEY, false).await,
        }
    }

    pub fn dark_mode(&self) -> bool {
        *self.dark_mode.get()
    }

    pub async fn set_dark_mode(&mut self, enabled: bool) {
        self.dark_mode.set(enabled).await;
    }

    /// Returns the new value.
    pub async fn toggle_dark_mode(&mut self) -> bool {
        let enabled = !self.dark_mode();
        self.set_dark_mode(enabled).await;
        enabled
    }
}
