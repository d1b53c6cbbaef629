//! Vitrine CLI - Database migrations and store management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (and create the session table)
//! vitrine migrate
//!
//! # Create a vendor with their boutique
//! vitrine vendor create -u awa --boutique-name "Chez Awa"
//!
//! # Give a vendor a new generated password
//! vitrine vendor reset-password -u awa
//!
//! # Lock a vendor out
//! vitrine vendor deactivate -u awa
//!
//! # Set the company profile
//! vitrine company set --name Vitrine --whatsapp +221770000000 --address Dakar
//!
//! # Add a home page slide
//! vitrine slider add --title Soldes --description "Moins 20%" --image sliders/soldes.jpg
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about = "Vitrine CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage vendor accounts
    Vendor {
        #[command(subcommand)]
        action: VendorAction,
    },
    /// Manage the company profile
    Company {
        #[command(subcommand)]
        action: CompanyAction,
    },
    /// Manage home page slides
    Slider {
        #[command(subcommand)]
        action: SliderAction,
    },
}

#[derive(Subcommand)]
enum VendorAction {
    /// Create a vendor and the boutique they own
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Contact email
        #[arg(short, long)]
        email: Option<String>,

        /// Name of the vendor's boutique
        #[arg(short, long)]
        boutique_name: String,

        /// Boutique description (default: "Boutique for <username>")
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Replace a vendor's password with a generated one
    ResetPassword {
        #[arg(short, long)]
        username: String,
    },
    /// Allow a vendor to log in again
    Activate {
        #[arg(short, long)]
        username: String,
    },
    /// Prevent a vendor from logging in
    Deactivate {
        #[arg(short, long)]
        username: String,
    },
}

#[derive(Subcommand)]
enum CompanyAction {
    /// Create or update the company profile
    Set {
        #[arg(long)]
        name: String,

        /// Central WhatsApp number
        #[arg(long)]
        whatsapp: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        email: Option<String>,

        /// Media path of the logo
        #[arg(long)]
        logo: Option<String>,
    },
}

#[derive(Subcommand)]
enum SliderAction {
    /// Add a slide
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        /// Media path of the slide image
        #[arg(long)]
        image: String,

        /// Display position, lowest first
        #[arg(long, default_value_t = 0)]
        order: u32,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,sqlx=warn".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Vendor { action } => match action {
            VendorAction::Create {
                username,
                email,
                boutique_name,
                description,
            } => {
                commands::vendor::create(&username, email.as_deref(), &boutique_name, description)
                    .await?;
            }
            VendorAction::ResetPassword { username } => {
                commands::vendor::reset_password(&username).await?;
            }
            VendorAction::Activate { username } => {
                commands::vendor::set_active(&username, true).await?;
            }
            VendorAction::Deactivate { username } => {
                commands::vendor::set_active(&username, false).await?;
            }
        },
        Commands::Company { action } => match action {
            CompanyAction::Set {
                name,
                whatsapp,
                address,
                email,
                logo,
            } => {
                commands::content::set_company(name, whatsapp, address, email.as_deref(), logo)
                    .await?;
            }
        },
        Commands::Slider { action } => match action {
            SliderAction::Add {
                title,
                description,
                image,
                order,
            } => commands::content::add_slider(title, description, image, order).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_password_parses() {
        let cli = Cli::try_parse_from(["vitrine", "vendor", "reset-password", "-u", "awa"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Vendor {
                action: VendorAction::ResetPassword { ref username }
            } if username == "awa"
        ));
    }

    #[test]
    fn test_reset_password_requires_username() {
        assert!(Cli::try_parse_from(["vitrine", "vendor", "reset-password"]).is_err());
    }

    #[test]
    fn test_slider_order_defaults_to_zero() {
        let cli = Cli::try_parse_from([
            "vitrine",
            "slider",
            "add",
            "--title",
            "Soldes",
            "--description",
            "Moins 20%",
            "--image",
            "sliders/soldes.jpg",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Slider {
                action: SliderAction::Add { order: 0, .. }
            }
        ));
    }
}
