use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    core::{
        errors::{CoreError, CoreResult},
        views::PlaceView,
    },
    domain::DonationPlace,
    storage::{PlaceStore, PLACE},
};

use super::validation;

/// Named disbursement destinations. Distribution records refer to places weakly, so
/// removing or purging a place never touches the ledger.
pub struct DonationPlaceService {
    store: Arc<dyn PlaceStore>,
}

impl DonationPlaceService {
    pub fn new(store: Arc<dyn PlaceStore>) -> Self {
        Self { store }
    }

    pub fn create(&self, name: &str) -> CoreResult<PlaceView> {
        let name = validation::require_text(name, "place name")?;
        let place = self.store.create_place(DonationPlace::new(name))?;
        info!(id = %place.id, name = %place.name, "donation place created");
        Ok(PlaceView::from(&place))
    }

    pub fn rename(&self, id: Uuid, name: &str) -> CoreResult<PlaceView> {
        let id = validation::require_id(id, "place id")?;
        let name = validation::require_text(name, "place name")?;
        let place = self.store.rename_place(id, name)?;
        info!(%id, name = %place.name, "donation place renamed");
        Ok(PlaceView::from(&place))
    }

    /// Alphabetical by name.
    pub fn list(&self, include_deleted: bool) -> CoreResult<Vec<PlaceView>> {
        Ok(self
            .store
            .list_places(include_deleted)?
            .iter()
            .map(PlaceView::from)
            .collect())
    }

    pub fn remove(&self, id: Uuid) -> CoreResult<PlaceView> {
        let id = validation::require_id(id, "place id")?;
        let place = self.store.soft_delete_place(id)?;
        info!(%id, "donation place removed");
        Ok(PlaceView::from(&place))
    }

    pub fn restore(&self, id: Uuid) -> CoreResult<PlaceView> {
        let id = validation::require_id(id, "place id")?;
        let place = self.store.restore_place(id)?;
        info!(%id, "donation place restored");
        Ok(PlaceView::from(&place))
    }

    pub fn purge(&self, id: Uuid) -> CoreResult<()> {
        let id = validation::require_id(id, "place id")?;
        if self.store.find_place(id)?.is_none() {
            return Err(CoreError::RecordNotFound {
                entity: PLACE,
                key: id.to_string(),
            });
        }
        self.store.hard_delete_place(id)?;
        info!(%id, "donation place purged");
        Ok(())
    }
}
