use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `small_storefront=<level>`；verbose 時額外打開其他 crate 的 info
pub fn filter_directive(level: &str, verbose: bool) -> String {
    if verbose {
        "small_storefront=debug,info".to_string()
    } else {
        format!("small_storefront={}", level)
    }
}

/// `RUST_LOG` overrides `directive` when set.
pub fn init_with_filter(directive: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if json {
        // JSON 格式，方便交給日誌收集器
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .init();
    }
}
