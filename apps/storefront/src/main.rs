//! # Storefront Entry Point
//!
//! The actual setup is in lib.rs so it can be tested.

#[tokio::main]
async fn main() {
    if let Err(e) = larek_storefront::run().await {
        eprintln!("storefront: {e}");
        std::process::exit(1);
    }
}
