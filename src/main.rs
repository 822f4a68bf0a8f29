use std::process;

use anyhow::Context;
use image_fetch::session::{self, INTERRUPTED_FAREWELL};
use image_fetch::{logging, Console, Downloader, FetchConfig, Session, Status, StdConsole};
use tracing::warn;

fn main() -> anyhow::Result<()> {
    logging::init_logging();

    if let Err(err) = ctrlc::set_handler(|| {
        println!("\n\n{INTERRUPTED_FAREWELL}");
        process::exit(0);
    }) {
        warn!(%err, "could not install the interrupt handler");
    }

    let config = FetchConfig::default();
    let mut console = StdConsole::new();

    session::print_banner(&mut console);

    let downloader = Downloader::new(&config).with_context(|| {
        format!(
            "failed to create output directory {}",
            config.directory.display()
        )
    })?;

    console.say(
        Status::Success,
        &format!(
            "Directory '{}' is ready for use",
            config.directory.display()
        ),
    );

    Session::new(downloader, console).run();

    Ok(())
}
