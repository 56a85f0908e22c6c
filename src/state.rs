//! Shared application state for all routes.

use crate::store::AdvertisementStore;

#[derive(Clone)]
pub struct AppState {
    pub store: AdvertisementStore,
}
