use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "training_hub=info,tower_http=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Server logging. `LOG_FORMAT=json` switches to one JSON object per line.
pub fn init_tracing() {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// CLI logging goes to stderr so it never mixes with lesson and quiz output.
pub fn init_cli_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}
