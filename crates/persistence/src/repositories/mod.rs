//! Repository implementations for database operations.

pub mod asset;
pub mod device;
pub mod edit_history;
pub mod employee;
pub mod order;
pub mod pending_request;
pub mod user;

pub use asset::AssetRepository;
pub use device::DeviceRepository;
pub use edit_history::EditHistoryRepository;
pub use employee::EmployeeRepository;
pub use order::OrderRepository;
pub use pending_request::PendingRequestRepository;
pub use user::UserRepository;
