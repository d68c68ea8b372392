//! Binary entry point for the wildguard API server.

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    wildguard_server::run_server().await
}
