fn main() {
    if let Err(e) = hostpilot::cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
