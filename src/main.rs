use price_base::config::{load_app_configuration, AppConfig};
use price_base::platform::desktop::files::default_webview_data_dir;
use price_base::ui::app::App;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("price_base=info")),
        )
        .init();

    let config = load_app_configuration().unwrap_or_else(|err| {
        tracing::error!("configuration rejected, using defaults: {err}");
        AppConfig::default()
    });

    let webview_data_dir =
        default_webview_data_dir().expect("should resolve and create WebView2 data directory");

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(
                    dioxus::desktop::WindowBuilder::new().with_title("Base de precios mensual"),
                )
                .with_data_directory(webview_data_dir),
        )
        .with_context(config)
        .launch(App);
}
