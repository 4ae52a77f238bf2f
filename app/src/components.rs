//! Reusable view pieces shared by the pages.

pub mod cards;
pub mod error_template;
pub mod filter_bar;
pub mod header;
pub mod icons;
pub mod loader;
pub mod not_found;
pub mod pagination;
