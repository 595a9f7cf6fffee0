//! Philips Hue bridge local API: a temperature sensor and a smart plug, both looked up by name.

use std::collections::HashMap;

use async_trait::async_trait;
use itertools::Itertools;
use reqwest::Url;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_with::serde_as;

use crate::{
    api::client,
    core::{
        device::{Switch, TemperatureSensor},
        power::Power,
    },
    prelude::*,
    quantity::temperature::Celsius,
};

#[derive(Clone)]
pub struct Bridge {
    client: reqwest::Client,
    base_url: Url,
}

impl Bridge {
    pub fn new(address: &str, username: &str) -> Result<Self> {
        let base_url = Url::parse(&format!("http://{address}/api/{username}/"))
            .with_context(|| format!("invalid bridge address `{address}`"))?;
        Ok(Self { client: client::try_new()?, base_url })
    }

    pub fn thermometer(&self, name: String) -> Thermometer {
        Thermometer { bridge: self.clone(), name }
    }

    pub fn plug(&self, name: String) -> Plug {
        Plug { bridge: self.clone(), name }
    }

    #[instrument(skip_all)]
    pub async fn get_sensors(&self) -> Result<HashMap<String, Sensor>> {
        self.get("sensors").await
    }

    #[instrument(skip_all)]
    pub async fn get_lights(&self) -> Result<HashMap<String, Light>> {
        self.get("lights").await
    }

    #[instrument(skip_all, fields(id, on))]
    pub async fn set_light_on(&self, id: &str, on: bool) -> Result {
        let url = self.base_url.join(&format!("lights/{id}/state"))?;
        self.client
            .put(url)
            .json(&LightState { on })
            .send()
            .await
            .context("failed to send the light state")?
            .error_for_status()?
            .json::<Reply<Vec<serde_json::Value>>>()
            .await
            .context("failed to deserialize the bridge reply")?
            .into_result()?;
        Ok(())
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let url = self.base_url.join(path)?;
        self.client
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to request `{path}`"))?
            .error_for_status()?
            .json::<Reply<R>>()
            .await
            .with_context(|| format!("failed to deserialize `{path}`"))?
            .into_result()
    }
}

/// Bridge reply: either a list of errors or the payload itself.
#[derive(Deserialize)]
#[serde(untagged)]
enum Reply<T> {
    Errors(Vec<ErrorItem>),
    Ok(T),
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T> {
        match self {
            Self::Ok(inner) => Ok(inner),
            Self::Errors(errors) => {
                bail!(
                    "Hue bridge error: {}",
                    errors
                        .iter()
                        .map(|item| format!("{} ({})", item.error.description, item.error.address))
                        .join("; ")
                )
            }
        }
    }
}

#[derive(Deserialize)]
struct ErrorItem {
    error: BridgeError,
}

#[derive(Deserialize)]
struct BridgeError {
    #[serde(default)]
    address: String,

    description: String,
}

#[derive(Deserialize)]
pub struct Sensor {
    pub name: String,

    #[serde(default)]
    pub state: SensorState,
}

#[serde_as]
#[derive(Default, Deserialize)]
pub struct SensorState {
    /// Hundredths of a degree Celsius.
    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(default)]
    pub temperature: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct Light {
    pub name: String,
    pub state: LightState,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
pub struct LightState {
    pub on: bool,
}

pub struct Thermometer {
    bridge: Bridge,
    name: String,
}

#[async_trait]
impl TemperatureSensor for Thermometer {
    #[instrument(skip_all, fields(name = %self.name))]
    async fn read_temperature(&self) -> Result<Celsius> {
        let centidegrees = self
            .bridge
            .get_sensors()
            .await?
            .into_values()
            .find(|sensor| sensor.name == self.name)
            .with_context(|| format!("sensor `{}` is not found", self.name))?
            .state
            .temperature
            .with_context(|| format!("sensor `{}` has no temperature reading", self.name))?;
        Ok(Celsius::from_centidegrees(centidegrees))
    }
}

pub struct Plug {
    bridge: Bridge,
    name: String,
}

impl Plug {
    async fn find(&self) -> Result<(String, Light)> {
        self.bridge
            .get_lights()
            .await?
            .into_iter()
            .find(|(_, light)| light.name == self.name)
            .with_context(|| format!("plug `{}` is not found", self.name))
    }
}

#[async_trait]
impl Switch for Plug {
    #[instrument(skip_all, fields(name = %self.name))]
    async fn power(&self) -> Result<Power> {
        let (_, light) = self.find().await?;
        Ok(Power::from(light.state.on))
    }

    #[instrument(skip_all, fields(name = %self.name, power = %power))]
    async fn set_power(&self, power: Power) -> Result {
        let (id, _) = self.find().await?;
        self.bridge.set_light_on(&id, power.into()).await
    }
}
