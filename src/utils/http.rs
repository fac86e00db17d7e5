use reqwest::{Client, ClientBuilder};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("splshield-bot/", env!("CARGO_PKG_VERSION"));

pub fn create_telegram_client() -> Result<Client, reqwest::Error> {
    let builder = Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(60))
        .tcp_keepalive(Duration::from_secs(30))
        .user_agent(DEFAULT_USER_AGENT);

    build_client(builder)
}

pub fn build_client(builder: ClientBuilder) -> Result<Client, reqwest::Error> {
    builder.build()
}
