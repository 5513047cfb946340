//! Command-line entry point.

fn main() {
    env_logger::init();
    log::info!("Starting Inkpad");

    let args = match inkpad_app::Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    match pollster::block_on(inkpad_app::run(&args)) {
        Ok(summary) => log::info!(
            "Replayed {} events ({} undo entries, can undo: {}, can redo: {})",
            summary.events,
            summary.undo_entries,
            summary.can_undo,
            summary.can_redo
        ),
        Err(e) => {
            log::error!("{e}");
            eprintln!("inkpad: {e}");
            std::process::exit(1);
        }
    }
}
