use anyhow::{Context, Result};
use clap::Parser;
use drive_assist::audio::{AudioBackendConfig, AudioBackendFactory, AudioCapture, AudioSource};
use drive_assist::client::{HttpActionExecutor, HttpIntentParser, HttpTranscriptionClient};
use drive_assist::http::{create_router, AppState};
use drive_assist::session::VoiceSessionController;
use drive_assist::speech::{LogAnnouncer, SpeechAnnouncer, SubprocessAnnouncer};
use drive_assist::Config;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "drive-assist", about = "Hands-free voice task assistant")]
struct Cli {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/drive-assist")]
    config: String,

    /// Capture audio from a WAV file instead of the microphone
    #[arg(long)]
    wav: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config))?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    let backend_config = AudioBackendConfig {
        sample_rate: cfg.audio.sample_rate,
        channels: cfg.audio.channels,
        ..AudioBackendConfig::default()
    };

    let source = match cli.wav {
        Some(path) => AudioSource::File(path),
        None => AudioSource::Microphone,
    };

    let backend = AudioBackendFactory::create(source, backend_config)
        .await
        .context("failed to create audio backend")?;
    let capture = Arc::new(AudioCapture::new(backend));

    let announcer: Arc<dyn SpeechAnnouncer> = match SubprocessAnnouncer::auto_detect().await {
        Ok(announcer) => Arc::new(announcer),
        Err(e) => {
            warn!("No speech program available ({}), logging prompts instead", e);
            Arc::new(LogAnnouncer)
        }
    };

    let controller = Arc::new(VoiceSessionController::new(
        capture,
        Arc::new(HttpTranscriptionClient::new(cfg.services.stt_url.clone())),
        Arc::new(HttpIntentParser::new(cfg.services.parse_url.clone())),
        Arc::new(HttpActionExecutor::new(
            cfg.services.gmail_url.clone(),
            cfg.services.calendar_url.clone(),
        )),
        announcer,
        cfg.voice.clone(),
    ));

    let router = create_router(AppState::new(controller));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .context("HTTP server failed")?;

    Ok(())
}
