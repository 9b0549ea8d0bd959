pub mod cart;
pub mod catalog;
pub mod errors;
pub mod favorites;
pub mod money;
pub mod order;
pub mod ports;
