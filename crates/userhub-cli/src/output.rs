use colored::Colorize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Prints one user as key-value lines.
pub fn print_user(user: &Value) {
    let field = |key: &str| {
        user.get(key)
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| "-".to_string())
    };

    println!("{}: {}", "Id".cyan(), field("id"));
    println!("{}: {}", "Name".cyan(), field("name"));
    println!("{}: {}", "Email".cyan(), field("email"));
    let active = user.get("active").and_then(Value::as_bool).unwrap_or(false);
    let active_str = if active {
        "active".green().to_string()
    } else {
        "inactive".yellow().to_string()
    };
    println!("{}: {}", "Status".cyan(), active_str);
    println!("{}: {}", "Created".cyan(), field("created_at"));
    println!("{}: {}", "Updated".cyan(), field("updated_at"));
}

/// Prints a user listing as a table.
pub fn print_users_table(users: &[Value]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(["Id", "Name", "Email", "Active"]);
    for user in users {
        let get = |key: &str| {
            user.get(key)
                .and_then(Value::as_str)
                .unwrap_or("-")
                .to_string()
        };
        let active = user
            .get("active")
            .and_then(Value::as_bool)
            .map(|a| if a { "yes" } else { "no" })
            .unwrap_or("-");
        builder.push_record([get("id"), get("name"), get("email"), active.to_string()]);
    }

    let table = builder.build().with(Style::rounded()).to_string();
    println!("{table}");
    println!("Total: {}", users.len());
}
