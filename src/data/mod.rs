//! Data module - workbook loading, order filtering and Excel export

mod export;
mod loader;
mod processor;

pub use export::save_table;
pub use loader::DataLoader;
pub use processor::{text_column, DeliveredTable, DeliveryReport, OrderFilter};
