fn main() {
    if let Err(err) = csv_combine::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
