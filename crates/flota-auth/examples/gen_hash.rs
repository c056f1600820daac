//! Password hash generator utility
//!
//! Usage: cargo run --example gen_hash -p flota-auth
//!
//! This generates an Argon2id password hash that can be inserted into the
//! users table for authentication.

use flota_auth::PasswordService;

fn main() {
    let password = std::env::args().nth(1).unwrap_or_else(|| "admin123".to_string());

    let service = PasswordService::new();
    let hash = service.hash_password(&password).expect("Failed to hash password");

    println!("Password: {}", password);
    println!("Hash: {}", hash);
    println!();
    println!("SQL to insert an admin user:");
    println!("INSERT INTO users (name, email, password, role, active)");
    println!("VALUES ('Administrator', 'admin@flota.local', '{}', 'ADMIN', true);", hash);
}
