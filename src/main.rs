fn main() {
    if let Err(err) = task_export_explorer::cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
