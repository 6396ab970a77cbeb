pub mod decode;
pub mod error;
pub mod records;
pub mod reference;
pub mod rows;

pub use decode::decode_text;
pub use error::{IngestError, Result};
pub use records::load_records;
pub use reference::{
    load_code_set, load_customers, load_individual_names, load_linked_item_sets,
    load_sales_channels, load_sales_persons, load_totalnet,
};
pub use rows::{get_field, read_rows, read_rows_with_required};
