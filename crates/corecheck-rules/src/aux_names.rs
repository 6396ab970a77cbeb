//! Logical names of the auxiliary file paths, as stored in the settings
//! file (`aux_file_paths` keys).

pub const INDIVIDUAL_LIST: &str = "individual_list_path";
pub const TOTALNET_LIST: &str = "totalnet_list_path";
pub const SALES_PERSON_LIST: &str = "sales_person_list_path";
pub const CUSTOMERS_LIST: &str = "customers_list_path";
pub const SALES_MASTER: &str = "sales_master_path";
pub const LINKED_TARGET_LIST: &str = "linked_target_list_path";
pub const LINKED_ITEM_LIST: &str = "linked_item_list_path";
pub const EXCLUDED_SALES: &str = "excluded_sales_path";
pub const BANKRUPT_SHOPS: &str = "bankrupt_shops_path";
