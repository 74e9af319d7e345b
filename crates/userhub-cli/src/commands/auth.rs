//! Session commands: login, register, logout, whoami.

use anyhow::{Context, Result};
use serde_json::json;

use userhub_core::PublicUser;

use crate::client::ApiClient;
use crate::output::{print_success, print_user};
use crate::session::{Session, clear_session, save_session};

pub async fn login(server: &str, email: &str, password: &str) -> Result<()> {
    let client = ApiClient::new(server, None);
    let response = client
        .post("/auth/login", json!({ "email": email, "password": password }))
        .await?;

    store_session(server, &response)?;
    print_success(&format!("Logged in as {email}"));
    Ok(())
}

pub async fn register(server: &str, name: &str, email: &str, password: &str) -> Result<()> {
    let client = ApiClient::new(server, None);
    let response = client
        .post(
            "/auth/register",
            json!({ "name": name, "email": email, "password": password }),
        )
        .await?;

    store_session(server, &response)?;
    print_success(&format!("Registered and logged in as {email}"));
    Ok(())
}

pub fn logout() -> Result<()> {
    if clear_session()? {
        print_success("Logged out");
    } else {
        println!("No active session.");
    }
    Ok(())
}

/// Fetches the live profile from the server and prints it.
pub async fn whoami(client: &ApiClient) -> Result<()> {
    let response = client.get("/auth/profile").await?;
    let user = response
        .get("user")
        .context("Malformed profile response")?;
    print_user(user);
    Ok(())
}

fn store_session(server: &str, response: &serde_json::Value) -> Result<()> {
    let access_token = response
        .get("access_token")
        .and_then(|v| v.as_str())
        .context("Response is missing access_token")?
        .to_string();
    let user: PublicUser = serde_json::from_value(
        response
            .get("user")
            .context("Response is missing user")?
            .clone(),
    )?;

    save_session(&Session {
        server: server.to_string(),
        access_token,
        user,
    })
}
