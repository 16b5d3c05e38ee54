use std::path::PathBuf;
use std::process::ExitCode;

use card_customizer::{
    logger::{self, LoggerConfig},
    ClientConfig, FormData, FormSubmission, HttpTransport, MemorySurface, ResourceUrls,
    share::{ShareLinks, DOWNLOAD_FILENAME},
    CardServer, ServerConfig, SubmissionHandler, SubmitOutcome,
};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "card-customizer", version, about = "Personalised event card generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the customizer page and the /generate endpoint.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Submit one card to a running server and save the result.
    Generate {
        /// Base URL of the server (defaults to GENERATOR_URL).
        #[arg(long)]
        server: Option<String>,
        /// Square photo for the bottom-left corner.
        #[arg(long)]
        photo: Option<PathBuf>,
        /// Caption for the bottom-right corner.
        #[arg(long)]
        text: Option<String>,
        #[arg(long, short, default_value = DOWNLOAD_FILENAME)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    if let Err(e) = logger::init_with_config(LoggerConfig::from_env()) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    if !dotenv_loaded {
        log::debug!("No .env file found, using process environment");
    }

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Serve { host, port } => serve(host, port).await,
        Command::Generate {
            server,
            photo,
            text,
            output,
        } => generate(server, photo, text, output).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn serve(host: Option<String>, port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ServerConfig::from_env();
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }

    logger::log_startup_info(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        &config.bind_address(),
    );
    logger::log_config_info(&config);

    CardServer::new(config).run().await?;
    Ok(())
}

async fn generate(
    server: Option<String>,
    photo: Option<PathBuf>,
    text: Option<String>,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ClientConfig::from_env();
    if let Some(server) = server {
        config = config.with_base_url(server);
    }

    let mut form = FormData::new();
    if let Some(path) = photo {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        form.append_file("photo", filename, None, std::fs::read(&path)?);
    }
    form.append_text("text", text.unwrap_or_default());

    let resources = ResourceUrls::new(config.origin());
    let transport = HttpTransport::new(&config)?;
    let handler = SubmissionHandler::new(MemorySurface::default(), transport, resources, config);

    match handler.on_submit(&FormSubmission::new(form)).await {
        SubmitOutcome::Generated(url) => {
            let image = handler
                .resources()
                .resolve(&url)
                .ok_or("generated image vanished from the registry")?;
            std::fs::write(&output, &image.bytes)?;
            log::info!("Saved {} bytes to {}", image.size(), output.display());
            let links = ShareLinks::default();
            log::info!("Share on X: {}", links.tweet_url()?);
            log::info!("Share on LinkedIn: {}", links.linkedin_url());
            Ok(())
        }
        SubmitOutcome::Failed(message) => Err(message.into()),
        SubmitOutcome::Ignored => Err("submission ignored".into()),
    }
}
