pub mod admission;
pub mod resource;
