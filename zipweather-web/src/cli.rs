use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Text, validator::Validation};
use zipweather_core::{Config, LookupResult, LookupService, config::default_user_agent};

use crate::web::{self, AppState};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "zipweather", version, about = "Current temperature by US zip code")]
pub struct Cli {
    /// Log debug output (RUST_LOG overrides this).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the web front end.
    Serve {
        /// Port to listen on; overrides the configured listen address's port.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Look up the current temperature for one zip code and print it.
    Lookup {
        zip: String,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Interactively write the config file.
    Configure,

    /// Print where the config file lives.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { port } => {
                let mut config = load_config(self.config.as_deref())?;
                if let Some(port) = port {
                    config.set_port(port);
                }

                let lookup = LookupService::from_config(&config)?;
                let app = web::router(AppState { lookup: Arc::new(lookup) });

                let listener = tokio::net::TcpListener::bind(&config.listen_addr)
                    .await
                    .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
                web::serve(listener, app).await
            }
            Command::Lookup { zip, json } => {
                let config = load_config(self.config.as_deref())?;
                let lookup = LookupService::from_config(&config)?;
                let result = lookup.lookup(zip.trim()).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    println!("{}", summary(&result));
                }
                Ok(())
            }
            Command::Configure => configure(self.config),
            Command::ConfigPath => {
                let path = match self.config {
                    Some(path) => path,
                    None => Config::config_file_path()?,
                };
                println!("{}", path.display());
                Ok(())
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn configure(path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = load_config(path.as_deref())?;

    let contact = Text::new("Contact (email or URL) sent to api.weather.gov:")
        .with_help_message("api.weather.gov asks every client to identify itself")
        .prompt()?;
    config.user_agent = default_user_agent(Some(&contact));

    let listen_addr = Text::new("Listen address:")
        .with_default(&config.listen_addr)
        .with_validator(|addr: &str| {
            Ok(match addr.parse::<std::net::SocketAddr>() {
                Ok(_) => Validation::Valid,
                Err(_) => Validation::Invalid("Expected host:port, e.g. 0.0.0.0:8080".into()),
            })
        })
        .prompt()?;
    config.listen_addr = listen_addr;

    let written = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };
    println!("Saved configuration to {}", written.display());
    Ok(())
}

fn summary(result: &LookupResult) -> String {
    let mut line = format!(
        "{}, {} {}: {:.1} °C ({:.1} °F) at station {}",
        result.city,
        result.state,
        result.zip_code,
        result.temperature,
        result.temperature_fahrenheit(),
        result.station,
    );
    if let Some(at) = result.observed_at {
        line.push_str(&format!(", observed {}", at.format("%Y-%m-%d %H:%M UTC")));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_accepts_port_and_global_flags() {
        let cli = Cli::try_parse_from(["zipweather", "serve", "--port", "3000", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Serve { port: Some(3000) }));
    }

    #[test]
    fn lookup_takes_zip_argument() {
        let cli = Cli::try_parse_from(["zipweather", "--config", "/tmp/z.toml", "lookup", "20500", "--json"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/z.toml")));
        assert!(matches!(cli.command, Command::Lookup { ref zip, json: true } if zip == "20500"));
    }

    #[test]
    fn summary_is_human_readable() {
        let result = LookupResult {
            zip_code: "20500".into(),
            city: "Washington".into(),
            state: "DC".into(),
            temperature: 21.1,
            station: "KDCA".into(),
            observed_at: None,
        };
        assert_eq!(summary(&result), "Washington, DC 20500: 21.1 °C (70.0 °F) at station KDCA");
    }
}
