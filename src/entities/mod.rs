// Menu hierarchy: category -> subcategory -> item
pub mod category;
pub mod item;
pub mod subcategory;
