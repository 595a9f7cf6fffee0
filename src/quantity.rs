#[macro_use]
pub mod macros;

pub mod cost;
pub mod energy;
pub mod power;
pub mod price;
pub mod temperature;
pub mod time;
