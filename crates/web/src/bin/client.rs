//! Log in against a running server and fetch the protected `/data` resource.
//!
//! Usage: `client <username> <password>`. The target comes from the same
//! configuration files the server reads.

use anyhow::Context;
use web::{client::ApiClient, configuration::get_configuration};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let mut args = std::env::args().skip(1);
    let (Some(username), Some(password)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: client <username> <password>");
    };

    let configuration = get_configuration()?;
    let base_url = format!(
        "{}:{}",
        configuration.application.base_url, configuration.application.port
    );
    let client = ApiClient::new(base_url)?;

    let token = client
        .login(&username, &password)
        .await
        .context("Failed to log in")?;
    println!("credential valid until {}", token.expires_at);

    let response = client.get_authorized("/data", &token.value).await?;
    println!("{}: {}", response.status(), response.text().await?);

    Ok(())
}
