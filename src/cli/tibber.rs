use clap::Parser;
use reqwest::Url;

use crate::{api::tibber, prelude::*};

#[derive(Parser)]
pub struct TibberArgs {
    #[clap(long = "tibber-access-token", env = "TIBBER_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,

    #[clap(
        long = "tibber-api-url",
        env = "TIBBER_API_URL",
        default_value = "https://api.tibber.com/v1-beta/gql"
    )]
    api_url: Url,
}

impl TibberArgs {
    pub fn new_client(self) -> Result<tibber::Api> {
        tibber::Api::new(self.api_url, self.access_token)
    }
}
