use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::OrderUpdate;

/// New display position for one item
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: i32,
    pub order: i32,
}

impl From<OrderItem> for OrderUpdate {
    fn from(o: OrderItem) -> Self {
        Self {
            id: o.id,
            order: o.order,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
