//! User administration commands.

use clap::{Args, Subcommand};

use crate::auth::{IssuedToken, UserService};
use crate::config::DatabaseConfig;
use crate::storage::create_pool;

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Create a user and print its bearer token
    Create(EmailArgs),
    /// Replace a user's bearer token; the old token stops working
    RotateToken(EmailArgs),
}

#[derive(Args, Debug)]
pub struct EmailArgs {
    /// Email address identifying the user
    #[arg(long)]
    pub email: String,
}

pub async fn handle_user_command(
    command: UserCommands,
    database: &DatabaseConfig,
) -> anyhow::Result<()> {
    let pool = create_pool(database).await?;
    let service = UserService::with_sqlx(pool);

    let issued = match command {
        UserCommands::Create(args) => service.create_user(&args.email).await?,
        UserCommands::RotateToken(args) => service.rotate_token(&args.email).await?,
    };

    print_issued(&issued);
    Ok(())
}

fn print_issued(issued: &IssuedToken) {
    println!("User:  {} (id {})", issued.user.email, issued.user.id);
    println!("Token: {}", issued.token);
    println!();
    println!("Store this token now; it cannot be shown again.");
}
