// src/ai/connector.rs
use async_trait::async_trait;

use super::dish::DishList;
use crate::capture::ImageRef;
use crate::error::ProcessingError;

/// Trait defining the interface to the dish recognition service
#[async_trait]
pub trait DishExtractor: Send + Sync {
    /// Upload the menu photo and return the dishes found in it.
    ///
    /// Every failure comes back as `ProcessingError::RequestFailed`.
    async fn submit(&self, image: &ImageRef) -> Result<DishList, ProcessingError>;
}
