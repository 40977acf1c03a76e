//! Domain models for Asset Manager.

pub mod asset;
pub mod bulk_import;
pub mod dashboard;
pub mod device;
pub mod edit_history;
pub mod employee;
pub mod order;
pub mod pending_request;
pub mod user;

pub use asset::{
    Asset, AssetCheckRequest, AssetField, AssetStatus, AssetView, AssignAssetRequest,
    ChangeLocationRequest, ChangeStatusRequest, CreateAssetRequest, FieldChange,
    ReturnAssetRequest, UpdateAssetRequest, WarrantyStatus,
};
pub use bulk_import::{BulkImportError, BulkImportResponse, ImportBatch, ImportedRow};
pub use dashboard::DashboardSummary;
pub use device::{Device, DeviceQuery, SerialState};
pub use edit_history::{EditEntity, EditHistoryEntry};
pub use employee::{Employee, UpsertEmployeeRequest};
pub use order::{
    generate_sales_order_code, CreateOrderRequest, MaterialType, Order, OrderHistoryEntry,
    OrderLine, OrderUnit, MAX_ORDER_QUANTITY,
};
pub use pending_request::{
    ListRequestsQuery, PendingRequest, RejectRequestBody, RequestPayload, RequestStatus,
};
pub use user::{
    CreateUserRequest, LoginRequest, LoginResponse, SessionResponse, UpdateProfileRequest,
    UpdateUserRequest, User, UserRole,
};
