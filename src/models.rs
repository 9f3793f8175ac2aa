//! Data models for the entities dealt with across an export

pub mod unit;
pub mod val;
pub mod request;
pub mod inventory;
pub mod document;

pub use unit::{ConfigurationUnit, UnitKind};
pub use val::{Value, PropertySet};
pub use request::{ExportRequest, ResourceRequest};
pub use inventory::{
    InventoryRecord,
    PackageRecord,
    SourceRecord,
    ResourceRecord,
    SystemRecord,
    SystemSettingKind,
};
pub use document::ExportDocument;
