//! # Onion Encryption Demo
//!
//! Wraps a message for three relays and peels it again.
//!
//! ## Run
//!
//! ```bash
//! cargo run --example onion_demo
//! ```

use ecies_core::crypto::{
    decrypt_with_private_keys, encrypt_with_public_keys, generate_key_pair, CurveType,
    EncryptionOptions, KeyPairHex,
};

fn main() -> ecies_core::Result<()> {
    println!("=== ECIES Core: Onion Encryption Demo ===\n");

    // Step 1: Three relays
    println!("Step 1: Creating three relay keypairs...");
    let relays: Vec<KeyPairHex> = (0..3).map(|_| generate_key_pair(CurveType::Ed25519)).collect();
    for (i, relay) in relays.iter().enumerate() {
        println!("  Relay {}: {}", i, relay.public_key);
    }
    println!();

    let public_keys: Vec<&str> = relays.iter().map(|r| r.public_key.as_str()).collect();
    let private_keys: Vec<&str> = relays.iter().map(|r| r.private_key.as_str()).collect();
    let options = EncryptionOptions::for_curve(CurveType::Ed25519);

    // Step 2: Wrap
    println!("Step 2: Wrapping the message...");
    let layers = encrypt_with_public_keys(b"route me", &public_keys, &options)?;
    for (i, layer) in layers.iter().enumerate() {
        println!("  Layer {}: {} bytes of JSON", i, layer.to_json()?.len());
    }
    println!();

    // Step 3: Peel
    println!("Step 3: Peeling from the outermost layer...");
    let outermost = &layers[layers.len() - 1];
    let plaintext = decrypt_with_private_keys(outermost, &private_keys, &options)?;
    println!("  Plaintext: \"{}\"", String::from_utf8_lossy(&plaintext));
    println!();

    println!("=== Demo Complete ===");
    Ok(())
}
