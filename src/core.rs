pub mod collector;
pub mod point;
pub mod sample;
pub mod summary;
