pub mod analytics;
pub mod item;
pub mod price;
pub mod range;
pub mod series;
