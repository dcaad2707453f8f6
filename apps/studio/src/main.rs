use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::normalize_base_url, load_settings, runtime::submit_and_wait, FileCandidate,
    ObjectUrlStore, RequestState, SelectionError, StudioController, StylizationClient,
    StylizeDispatcher,
};
use shared::{
    domain::{StyleId, DEFAULT_GUIDANCE_SCALE, DEFAULT_STRENGTH},
    presets,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod views;

#[derive(Parser, Debug)]
#[command(name = "studio", about = "Stylize images through the remote diffusion backend")]
struct Args {
    /// Overrides API_BASE_URL / studio.toml.
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    /// Request timeout in seconds; 0 waits indefinitely.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the style presets.
    Presets,
    /// Probe the backend and compare its styles with the local catalog.
    Health,
    /// Upload an image, stylize it and save the result.
    Stylize {
        #[arg(long)]
        image: PathBuf,
        #[arg(long, default_value = "ghibli")]
        style: StyleId,
        #[arg(long, default_value_t = DEFAULT_STRENGTH)]
        strength: f64,
        #[arg(long, default_value_t = DEFAULT_GUIDANCE_SCALE)]
        guidance: f64,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    let mut settings = load_settings()?;
    if let Some(url) = &args.api_base_url {
        settings.api_base_url = normalize_base_url(url)?;
    }
    if let Some(secs) = args.timeout_secs {
        settings.request_timeout_secs = secs;
    }

    match args.command {
        Command::Presets => {
            print!("{}", views::render_preset_catalog());
            Ok(())
        }
        Command::Health => {
            let client = StylizationClient::new(&settings)?;
            let health = client
                .health()
                .await
                .with_context(|| format!("health check against {} failed", client.base_url()))?;
            println!(
                "Backend {} is {} (device: {})",
                client.base_url(),
                health.status,
                health.device.as_deref().unwrap_or("unknown")
            );
            for preset in presets::all() {
                if !health
                    .available_styles
                    .iter()
                    .any(|style| style == preset.id.as_str())
                {
                    warn!(style = %preset.id, "backend does not advertise this preset");
                }
            }
            Ok(())
        }
        Command::Stylize {
            image,
            style,
            strength,
            guidance,
            seed,
            out_dir,
        } => {
            let client = Arc::new(StylizationClient::new(&settings)?);
            let mut dispatcher = StylizeDispatcher::new(client);
            let mut controller = StudioController::new(Arc::new(ObjectUrlStore::default()));

            controller.set_style(style);
            controller.set_strength(strength);
            controller.set_guidance_scale(guidance);
            controller.set_seed(seed);

            let candidate = FileCandidate::open(&image)
                .with_context(|| format!("failed to open {}", image.display()))?;
            match controller.choose_file(Some(candidate)) {
                Ok(()) => {}
                Err(SelectionError::Rejected(err)) => bail!("{err}"),
                Err(err @ SelectionError::Preview(_)) => return Err(err.into()),
            }

            let view = controller.view();
            println!("{}", views::render_header(&view));
            println!("{}", views::render_upload_zone(&view));
            println!("{}", views::render_controls(&view));
            print!("{}", views::render_style_grid(view.parameters.style));
            println!("[{}]", views::submit_label(&view));

            let state = submit_and_wait(&mut controller, &mut dispatcher).await;
            if let RequestState::Failed { message } = state {
                bail!("{message}");
            }
            println!("{}", views::render_result_pane(&controller.view()));

            let path = controller.download(&out_dir)?;
            println!("Saved {}", path.display());
            Ok(())
        }
    }
}
