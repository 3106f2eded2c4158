/// Display version information
pub fn execute() {
    println!("tessera {}", env!("CARGO_PKG_VERSION"));
    println!("Proxy-sharing UI state engine");
}
