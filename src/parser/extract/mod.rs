pub mod item;
pub mod links;

pub use item::parse_item;
