//! User-defined categories for classifying transactions.

mod db;
mod domain;

pub use db::{
    create_category, create_category_table, delete_category, get_all_categories, get_category,
};
pub use domain::{Category, CategoryKind, CategoryName};
