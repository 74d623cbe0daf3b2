//! Payload obfuscation: AES-256-ECB with PKCS#7 padding, then base64.
//!
//! ECB with a static key is deterministic and leaks equal blocks. It keeps
//! casual readers out of the published file and nothing more; the front-end
//! decrypts with the same secret.

use std::fmt;

use aes::Aes256;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use catalog_model::PublicationDocument;
use ecb::cipher::block_padding::Pkcs7;
use ecb::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit};

use crate::error::{CoreError, DecodeError};

type Aes256EcbEnc = ecb::Encryptor<Aes256>;
type Aes256EcbDec = ecb::Decryptor<Aes256>;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// Turn a secret into a key: its UTF-8 bytes, truncated or zero-padded.
#[must_use]
pub fn derive_key(secret: &str) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    let bytes = secret.as_bytes();
    let len = bytes.len().min(KEY_LEN);
    key[..len].copy_from_slice(&bytes[..len]);
    key
}

/// Encodes and decodes publication payloads with one shared secret.
#[derive(Clone)]
pub struct SecureEncoder {
    key: [u8; KEY_LEN],
}

impl SecureEncoder {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            key: derive_key(secret),
        }
    }

    /// Serialize `document` and encode it.
    pub fn encode(&self, document: &PublicationDocument) -> Result<String, CoreError> {
        let json = serde_json::to_vec(document).map_err(CoreError::Serialize)?;
        Ok(self.encode_bytes(&json))
    }

    #[cfg(test)]
    fn encode_text(&self, text: &str) -> String {
        self.encode_bytes(text.as_bytes())
    }

    fn encode_bytes(&self, bytes: &[u8]) -> String {
        let cipher = Aes256EcbEnc::new(&self.key.into()).encrypt_padded_vec_mut::<Pkcs7>(bytes);
        STANDARD.encode(cipher)
    }

    fn decode_text(&self, payload: &str) -> Result<String, DecodeError> {
        let cipher = STANDARD.decode(payload.trim())?;
        let plain = Aes256EcbDec::new(&self.key.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&cipher)
            .map_err(|_| DecodeError::Cipher)?;
        Ok(String::from_utf8(plain)?)
    }

    /// Reverse [`encode`](Self::encode).
    pub fn decode(&self, payload: &str) -> Result<PublicationDocument, DecodeError> {
        let text = self.decode_text(payload)?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl fmt::Debug for SecureEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureEncoder")
            .field("key", &"<redacted>")
            .finish()
    }
}
