fn main() {
    if let Err(err) = order_reconcile::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
