pub mod catalog;
pub mod error;
pub mod record;
pub mod reference;
pub mod series;
pub mod value;
pub mod violation;

pub use catalog::{CheckCatalog, CheckDefinition};
pub use error::{CatalogError, MissingField};
pub use record::{AuxPaths, FieldKind, Record, RecordSchema};
pub use reference::{
    CustomerEntry, CustomerMaster, LinkedItemSets, SalesChannelEntry, SalesChannelMaster,
    SalesPersonEntry, SalesPersonMaster,
};
pub use series::{ParseSeriesError, Series};
pub use value::Value;
pub use violation::{ResultTable, Violation};
