use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;

/// Random 64-byte secret for signing JWTs, base64 encoded.
pub fn generate_jwt_secret() -> String {
    let mut secret = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut secret);
    general_purpose::STANDARD.encode(secret)
}

pub fn handle_generate_secret_command() {
    println!("🔐 Generated JWT Secret:");
    println!();
    println!("[jwt]");
    println!("secret = \"{}\"", generate_jwt_secret());
    println!("expiration_days = 7");
    println!();
    println!("Add this to your config/{{environment}}.toml file.");
}
