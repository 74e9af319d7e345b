use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "userhub")]
#[command(about = "userhub CLI — manage users and your login session")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server base URL (overrides the stored session and USERHUB_URL env var)
    #[arg(short, long, global = true, env = "USERHUB_URL")]
    pub server: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with email and password
    Login(LoginArgs),
    /// Register a new account and log in
    Register(RegisterArgs),
    /// Log out (clear the stored session)
    Logout,
    /// Show the current identity (GET /auth/profile)
    Whoami,
    /// Manage user records
    Users(UsersArgs),
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// Email address
    #[arg(short, long)]
    pub email: String,
    /// Password (prompted when omitted)
    #[arg(short, long)]
    pub password: Option<String>,
}

#[derive(clap::Args)]
pub struct RegisterArgs {
    /// Display name
    #[arg(short, long)]
    pub name: String,
    /// Email address
    #[arg(short, long)]
    pub email: String,
    /// Password (prompted when omitted)
    #[arg(short, long)]
    pub password: Option<String>,
}

#[derive(clap::Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommands,
}

#[derive(Subcommand)]
pub enum UsersCommands {
    /// List all users
    List,
    /// Read one user by id
    Get(UserIdArg),
    /// Create a new user
    Create(CreateUserArgs),
    /// Update a user (only the provided fields change)
    Update(UpdateUserArgs),
    /// Delete a user
    Delete(UserIdArg),
}

#[derive(clap::Args)]
pub struct UserIdArg {
    /// User id (UUID)
    pub id: String,
}

#[derive(clap::Args)]
pub struct CreateUserArgs {
    /// Display name
    #[arg(short, long)]
    pub name: String,
    /// Email address
    #[arg(short, long)]
    pub email: String,
    /// Password
    #[arg(short, long)]
    pub password: String,
}

#[derive(clap::Args)]
pub struct UpdateUserArgs {
    /// User id (UUID)
    pub id: String,
    /// New display name
    #[arg(short, long)]
    pub name: Option<String>,
    /// New email address
    #[arg(short, long)]
    pub email: Option<String>,
    /// New password
    #[arg(short, long)]
    pub password: Option<String>,
    /// Activate or deactivate the account
    #[arg(long)]
    pub active: Option<bool>,
}
