//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod asset;
pub mod device;
pub mod edit_history;
pub mod employee;
pub mod order;
pub mod pending_request;
pub mod user;

pub use asset::{AssetEntity, ASSET_COLUMNS};
pub use device::{DeviceEntity, DEVICE_COLUMNS};
pub use edit_history::EditHistoryEntity;
pub use employee::EmployeeEntity;
pub use order::{
    EmployeeStockEntity, OrderEntity, OrderHistoryEntity, StockRowEntity, ORDER_COLUMNS,
};
pub use pending_request::{PendingRequestEntity, PENDING_REQUEST_COLUMNS};
pub use user::{UserEntity, USER_COLUMNS};
