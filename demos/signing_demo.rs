//! # Digital Signature Demo
//!
//! Deterministic secp256k1 signatures for message authentication.
//!
//! ## Run
//!
//! ```bash
//! cargo run --example signing_demo
//! ```

use ecies_core::crypto::{generate_key_pair, sign, verify_signed_with_public_key, CurveType};

fn main() -> ecies_core::Result<()> {
    println!("=== ECIES Core: Digital Signature Demo ===\n");

    // Step 1: Create a keypair
    println!("Step 1: Creating secp256k1 keypair...");
    let keys = generate_key_pair(CurveType::Secp256k1);
    println!("  Public key (hex): {}", keys.public_key);
    println!();

    // Step 2: Sign a message
    println!("Step 2: Signing a message...");
    let message = b"This message was sent by me and has not been tampered with.";
    println!("  Message: \"{}\"", String::from_utf8_lossy(message));

    let signature = sign(message, &keys.private_key)?;
    println!("  Signature (hex): {}", signature);
    println!("  Signature length: {} bytes", signature.len() / 2);
    println!();

    // Step 3: Signing is deterministic
    println!("Step 3: Signing the same message again...");
    let again = sign(message, &keys.private_key)?;
    println!("  Identical: {}", again == signature);
    println!();

    // Step 4: Verify
    println!("Step 4: Verifying the signature...");
    if verify_signed_with_public_key(message, &keys.public_key, &signature) {
        println!("  [OK] Signature is valid!");
    } else {
        println!("  [FAILED] Signature verification failed!");
    }
    println!();

    // Step 5: Forgery detection
    println!("Step 5: Verifying against an altered message...");
    let forged = b"This message was sent by me and has been tampered with.";
    if verify_signed_with_public_key(forged, &keys.public_key, &signature) {
        println!("  [UNEXPECTED] Altered message verified");
    } else {
        println!("  [OK] Altered message rejected");
    }
    println!();

    println!("=== Demo Complete ===");
    Ok(())
}
