mod client;
pub mod heartbeat;
pub mod hue;
pub mod tibber;
