mod error;
mod model;

pub use error::SessionError;
pub use model::*;

use crate::storage::{KeyValueStore, StorageManager};

pub const GUEST_INFO_KEY: &str = "purchase:guest_info";
pub const MODAL_VISIBLE_KEY: &str = "purchase:modal_visible";

/// Saves and restores the resumable session slice around the payment
/// gateway's full page round trip. Writes happen at defined transition
/// points, not on every render pass.
#[derive(Clone)]
pub struct SessionService {
    storage: StorageManager,
}

impl SessionService {
    pub fn new(storage: StorageManager) -> Self {
        Self { storage }
    }

    pub async fn load(&self) -> Result<SessionSnapshot, SessionError> {
        let guest_info = self.storage.get::<CustomerProfile>(GUEST_INFO_KEY).await?;
        let modal_visible = self.storage.get::<bool>(MODAL_VISIBLE_KEY).await?.unwrap_or(false);

        Ok(SessionSnapshot {
            guest_info,
            modal_visible,
        })
    }

    pub async fn save_guest_info(&self, profile: Option<&CustomerProfile>) -> Result<(), SessionError> {
        match profile {
            Some(profile) => self.storage.set(GUEST_INFO_KEY, profile).await?,
            None => self.storage.del(GUEST_INFO_KEY).await?,
        }
        Ok(())
    }

    pub async fn save_modal_visible(&self, visible: bool) -> Result<(), SessionError> {
        self.storage.set(MODAL_VISIBLE_KEY, &visible).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), SessionError> {
        self.storage.del(GUEST_INFO_KEY).await?;
        self.storage.set(MODAL_VISIBLE_KEY, &false).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CustomerProfile {
        CustomerProfile {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            phone: "9876543210".to_string(),
            membership: Some("Gold Membership".to_string()),
            net_price: Some(15000.0),
            tax: Some(2700.0),
            total: Some(17700.0),
        }
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip() {
        let sessions = SessionService::new(StorageManager::memory());

        sessions.save_guest_info(Some(&profile())).await.unwrap();
        sessions.save_modal_visible(true).await.unwrap();

        let snapshot = sessions.load().await.unwrap();
        assert_eq!(snapshot.guest_info, Some(profile()));
        assert!(snapshot.modal_visible);
    }

    #[tokio::test]
    async fn test_clearing_removes_persisted_profile() {
        let sessions = SessionService::new(StorageManager::memory());

        sessions.save_guest_info(Some(&profile())).await.unwrap();
        sessions.clear().await.unwrap();

        let snapshot = sessions.load().await.unwrap();
        assert_eq!(snapshot.guest_info, None);
        assert!(!snapshot.modal_visible);
    }

    #[tokio::test]
    async fn test_load_on_fresh_store_is_default() {
        let sessions = SessionService::new(StorageManager::memory());
        assert_eq!(sessions.load().await.unwrap(), SessionSnapshot::default());
    }
}
