use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ocr-extract-server")]
#[command(about = "Relay server: image upload, OCR provider, workflow summary")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "EXTRACT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "EXTRACT_PORT", default_value = "9292")]
    pub port: u16,

    /// Maximum upload size in bytes (default: 10MB)
    #[arg(long, env = "EXTRACT_MAX_FILE_SIZE", default_value = "10485760")]
    pub max_file_size: usize,

    /// OCR provider API key; extraction requests fail with 500 until set
    #[arg(long, env = "GOOGLE_CLOUD_VISION_API_KEY")]
    pub ocr_api_key: Option<String>,

    /// OCR provider text-detection endpoint
    #[arg(
        long,
        env = "GOOGLE_CLOUD_VISION_ENDPOINT",
        default_value = "https://vision.googleapis.com/v1/images:annotate"
    )]
    pub ocr_endpoint: String,

    /// Workflow provider API key; extraction requests fail with 500 until set
    #[arg(long, env = "DIFY_API_KEY")]
    pub workflow_api_key: Option<String>,

    /// Workflow provider base URL
    #[arg(long, env = "DIFY_API_BASE_URL", default_value = "https://api.dify.ai/v1")]
    pub workflow_base_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

/// Server configuration, read once at startup and never reloaded.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_file_size: usize,
    pub ocr_api_key: Option<String>,
    pub ocr_endpoint: String,
    pub workflow_api_key: Option<String>,
    pub workflow_base_url: String,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            max_file_size: args.max_file_size,
            ocr_api_key: args.ocr_api_key,
            ocr_endpoint: args.ocr_endpoint,
            workflow_api_key: args.workflow_api_key,
            workflow_base_url: args.workflow_base_url,
        }
    }
}
