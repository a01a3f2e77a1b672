use std::{fs::OpenOptions, io::Write};

use tracing::error;
use tracing_subscriber::EnvFilter;

use simple_sidenav::*;

fn main() {
    set_panic_hook();
    init_tracing();

    if let Err(e) = param::handle_params() {
        error!("{e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open("panic.log")
        {
            let now = chrono::Local::now();
            let msg = format!("{}: {:?}\n", now.format("%Y-%m-%d %H:%M:%S"), info);
            let _ = file.write_all(msg.as_bytes());
        }

        hook(info);
    }));
}
