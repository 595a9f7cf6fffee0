use clap::Parser;

use crate::{api::hue, prelude::*};

#[derive(Parser)]
pub struct HueArgs {
    /// Bridge host name or IP address, optionally with a port.
    #[clap(long = "hue-bridge-address", env = "HUE_BRIDGE_ADDRESS")]
    bridge_address: String,

    /// Whitelisted API username.
    #[clap(long = "hue-username", env = "HUE_USERNAME", hide_env_values = true)]
    username: String,
}

impl HueArgs {
    pub fn connect(&self) -> Result<hue::Bridge> {
        hue::Bridge::new(&self.bridge_address, &self.username)
    }
}

#[derive(Parser)]
pub struct SensorArgs {
    /// Name of the temperature sensor as shown in the Hue app.
    #[clap(long = "hue-sensor-name", env = "HUE_SENSOR_NAME")]
    pub name: String,
}

#[derive(Parser)]
pub struct PlugArgs {
    /// Name of the smart plug powering the heater.
    #[clap(long = "hue-plug-name", env = "HUE_PLUG_NAME")]
    pub name: String,
}
