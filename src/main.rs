fn main() {
    if let Err(e) = padbridge_lib::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
