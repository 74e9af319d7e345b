//! User CRUD commands.

use anyhow::Result;
use serde_json::{Map, Value, json};

use crate::cli::{CreateUserArgs, UpdateUserArgs};
use crate::client::ApiClient;
use crate::output::{print_success, print_user, print_users_table};

pub async fn list(client: &ApiClient) -> Result<()> {
    let response = client.get("/users").await?;
    let users = response.as_array().cloned().unwrap_or_default();
    print_users_table(&users);
    Ok(())
}

pub async fn get(client: &ApiClient, id: &str) -> Result<()> {
    let user = client.get(&format!("/users/{id}")).await?;
    print_user(&user);
    Ok(())
}

pub async fn create(client: &ApiClient, args: &CreateUserArgs) -> Result<()> {
    let user = client
        .post(
            "/users",
            json!({
                "name": args.name,
                "email": args.email,
                "password": args.password,
            }),
        )
        .await?;

    print_success("User created");
    print_user(&user);
    Ok(())
}

pub async fn update(client: &ApiClient, args: &UpdateUserArgs) -> Result<()> {
    let mut body = Map::new();
    if let Some(ref name) = args.name {
        body.insert("name".to_string(), json!(name));
    }
    if let Some(ref email) = args.email {
        body.insert("email".to_string(), json!(email));
    }
    if let Some(ref password) = args.password {
        body.insert("password".to_string(), json!(password));
    }
    if let Some(active) = args.active {
        body.insert("active".to_string(), json!(active));
    }
    if body.is_empty() {
        anyhow::bail!("Nothing to update: pass at least one of --name, --email, --password, --active");
    }

    let user = client
        .put(&format!("/users/{}", args.id), Value::Object(body))
        .await?;

    print_success("User updated");
    print_user(&user);
    Ok(())
}

pub async fn delete(client: &ApiClient, id: &str) -> Result<()> {
    client.delete(&format!("/users/{id}")).await?;
    print_success("User deleted");
    Ok(())
}
