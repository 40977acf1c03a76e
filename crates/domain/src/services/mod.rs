//! Domain services for Asset Manager.
//!
//! Services contain business logic that operates on domain models. None of
//! them touch the store; callers load the data and persist the results.

pub mod asset_csv;
pub mod asset_rules;
pub mod audit;
pub mod dashboard;
pub mod employee_csv;
pub mod filter;
pub mod lifecycle;
pub mod order_csv;
pub mod orders;
pub mod requests;
pub mod schema;
pub mod stock;

pub use asset_rules::{check_asset, check_uniqueness, validate_asset};
pub use audit::{record_changes, EditRecorder, MemoryEditRecorder};
pub use filter::{
    audit_options_for, audit_view, filter_assets, options_for, AssetFilter, AssetFilterQuery,
    FilterField,
};
pub use lifecycle::{apply, status_options, AssetMutation, StatusDialog, Transition};
pub use orders::{prepare_order, PreparedOrder};
pub use requests::{approve_request, submit_action, ActionOutcome};
pub use schema::{missing_required, AssetTypeSchema, OrderTypeSchema};
pub use stock::{
    employee_summary, latest_states, stock_summary, validate_serials, EmployeeStockRow, StockRow,
};
