use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand_core::{OsRng, RngCore};
use uuid::Uuid;
use zeroize::Zeroizing;

#[derive(Debug)]
pub enum CryptoError {
    Encrypt(String),
    Decrypt(String),
    Decode(String),
}

impl std::fmt::Display for CryptoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CryptoError::Encrypt(e) => write!(f, "Encryption error: {e}"),
            CryptoError::Decrypt(e) => write!(f, "Decryption error: {e}"),
            CryptoError::Decode(e) => write!(f, "Base64 decode error: {e}"),
        }
    }
}

impl std::error::Error for CryptoError {}

/// Key material plus the associated data a ciphertext is bound to.
///
/// The same key with a different `aad` cannot open a ciphertext, so a token
/// copied verbatim from one row to another fails to decrypt.
#[derive(Clone)]
pub struct KeyContext {
    key: [u8; 32],
    aad: String,
}

impl KeyContext {
    pub fn new(key: [u8; 32], aad: impl Into<String>) -> Self {
        Self {
            key,
            aad: aad.into(),
        }
    }

    /// Context of `services.encrypted_token` for one legacy row.
    pub fn legacy_token(key: [u8; 32], service_id: i32) -> Self {
        Self::new(key, format!("services:{service_id}:token"))
    }

    /// Context of `cluster_platforms_kubernetes.encrypted_token` for one cluster.
    pub fn platform_token(key: [u8; 32], cluster_id: Uuid) -> Self {
        Self::new(key, format!("cluster_platforms_kubernetes:{cluster_id}:token"))
    }
}

impl std::fmt::Debug for KeyContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyContext")
            .field("key", &"****")
            .field("aad", &self.aad)
            .finish()
    }
}

/// Encrypt `plaintext` with AES-256-GCM under `ctx`.
/// Returns base64(12-byte nonce ‖ ciphertext+tag).
pub fn encrypt_token(plaintext: &[u8], ctx: &KeyContext) -> Result<String, CryptoError> {
    let mut nonce_bytes = [0u8; 12];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let cipher = Aes256Gcm::new((&ctx.key).into());
    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad: ctx.aad.as_bytes(),
            },
        )
        .map_err(|e| CryptoError::Encrypt(e.to_string()))?;

    let mut combined = nonce_bytes.to_vec();
    combined.extend_from_slice(&ciphertext);

    Ok(STANDARD.encode(&combined))
}

/// Decrypt a base64-encoded AES-256-GCM ciphertext produced under `ctx`.
/// The plaintext buffer is wiped on drop.
pub fn decrypt_token(encoded: &str, ctx: &KeyContext) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let data = STANDARD
        .decode(encoded)
        .map_err(|e| CryptoError::Decode(e.to_string()))?;

    if data.len() < 12 {
        return Err(CryptoError::Decrypt(
            "Ciphertext too short (< 12 bytes)".to_string(),
        ));
    }

    let (nonce_bytes, ciphertext) = data.split_at(12);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new((&ctx.key).into());
    let plaintext = cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad: ctx.aad.as_bytes(),
            },
        )
        .map_err(|e| CryptoError::Decrypt(e.to_string()))?;

    Ok(Zeroizing::new(plaintext))
}

/// Move a ciphertext from one key context to another.
/// The plaintext only exists inside this call.
pub fn reencrypt_token(
    encoded: &str,
    from: &KeyContext,
    to: &KeyContext,
) -> Result<String, CryptoError> {
    let plaintext = decrypt_token(encoded, from)?;
    encrypt_token(&plaintext, to)
}
