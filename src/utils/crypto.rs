// Cryptographic utilities for session tokens, cookie signing and cookie encryption

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, TryRngCore};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Nonce size for AES-256-GCM encryption (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Encryption key size for AES-256 (256 bits)
pub const ENCRYPTION_KEY_SIZE: usize = 32;

/// Number of random bytes behind every session token (256 bits)
pub const TOKEN_SIZE: usize = 32;

/// Shortest secret accepted for signing and encryption
pub const MIN_SECRET_LENGTH: usize = 32;

/// Fill a buffer of `length` bytes from the operating system CSPRNG
///
/// # Errors
///
/// Returns an error if the OS random source is unavailable. Callers must
/// treat this as fatal and never fall back to a weaker generator.
pub fn generate_random_bytes(length: usize) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; length];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| anyhow!("OS random source unavailable: {e}"))?;
    Ok(bytes)
}

/// Generate a session token
///
/// 32 bytes (256 bits) from the OS random source, encoded as unpadded
/// `Base64URL` so it can be used as a cookie value without escaping.
///
/// # Errors
///
/// Returns an error if the OS random source is unavailable
pub fn generate_token() -> Result<String> {
    let bytes = generate_random_bytes(TOKEN_SIZE)?;
    Ok(general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

/// Derive the 32-byte AES-256 key from a cookie secret
///
/// The key is the SHA-256 digest of the secret, so the secret itself never
/// reaches the cipher and any secret length maps onto a full-size key.
#[must_use]
pub fn derive_encryption_key(secret: &[u8]) -> [u8; ENCRYPTION_KEY_SIZE] {
    let mut key = [0u8; ENCRYPTION_KEY_SIZE];
    key.copy_from_slice(&Sha256::digest(secret));
    key
}

/// Sign a message using HMAC-SHA256
///
/// # Arguments
///
/// * `message` - The message to sign
/// * `secret` - The shared secret key
///
/// # Returns
///
/// The HMAC-SHA256 signature as bytes
///
/// # Errors
///
/// Returns an error if HMAC computation fails
pub fn sign_hmac_sha256(message: &[u8], secret: &[u8]) -> Result<Vec<u8>> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret)
        .map_err(|e| anyhow!("Invalid HMAC key length: {e}"))?;
    mac.update(message);

    Ok(mac.finalize().into_bytes().to_vec())
}

/// Verify an HMAC-SHA256 signature in constant time
#[must_use]
pub fn verify_hmac_sha256(message: &[u8], secret: &[u8], signature: &[u8]) -> bool {
    let Ok(mut mac) = <HmacSha256 as Mac>::new_from_slice(secret) else {
        return false;
    };
    mac.update(message);
    mac.verify_slice(signature).is_ok()
}

/// Encrypt raw bytes using AES-256-GCM
///
/// A fresh random nonce is drawn for every call and prefixed to the
/// ciphertext.
///
/// # Arguments
///
/// * `plaintext` - The bytes to encrypt
/// * `key` - The encryption key (must be 32 bytes for AES-256)
///
/// # Returns
///
/// A Base64URL-encoded string containing the nonce + ciphertext
///
/// # Errors
///
/// Returns an error if:
/// - Key length is invalid
/// - The OS random source is unavailable
/// - AES encryption fails
pub fn encrypt_bytes(plaintext: &[u8], key: &[u8]) -> Result<String> {
    if key.len() != ENCRYPTION_KEY_SIZE {
        return Err(anyhow!(
            "Invalid key length: expected {} bytes, got {}",
            ENCRYPTION_KEY_SIZE,
            key.len()
        ));
    }

    let nonce_bytes = generate_random_bytes(NONCE_SIZE)?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| anyhow!("AES encryption failed: {e}"))?;

    // Combine nonce + ciphertext and encode as base64
    let mut combined = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    combined.extend_from_slice(&nonce_bytes);
    combined.extend_from_slice(&ciphertext);

    Ok(general_purpose::URL_SAFE_NO_PAD.encode(&combined))
}

/// Decrypt bytes produced by [`encrypt_bytes`]
///
/// # Errors
///
/// Returns an error if:
/// - Key length is invalid
/// - Base64 decoding fails
/// - Data is shorter than a nonce
/// - AES decryption or tag verification fails
pub fn decrypt_bytes(encrypted_data: &str, key: &[u8]) -> Result<Vec<u8>> {
    if key.len() != ENCRYPTION_KEY_SIZE {
        return Err(anyhow!(
            "Invalid key length: expected {} bytes, got {}",
            ENCRYPTION_KEY_SIZE,
            key.len()
        ));
    }

    let combined = general_purpose::URL_SAFE_NO_PAD
        .decode(encrypted_data)
        .context("Failed to decode base64 data")?;

    if combined.len() < NONCE_SIZE {
        return Err(anyhow!("Invalid data length"));
    }

    let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|e| anyhow!("AES decryption failed: {e}"))
}
