// Archivo: sealed.rs
// Propósito: `SealedStore`, envoltorio de `KeyValueStore` que guarda los
// valores codificados en base64 junto a una etiqueta de integridad
// sha256(secreto || payload). Un valor cuya etiqueta no verifica se trata
// como ausente.
use crate::errors::Result;
use crate::repository::KeyValueStore;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::warn;
use sha2::{Digest, Sha256};
use std::fmt::Write;

/// Comparación en tiempo constante para etiquetas de la misma longitud.
fn tags_match(expected: &[u8], found: &[u8]) -> bool {
    expected.len() == found.len() && expected.iter().zip(found).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}

pub struct SealedStore<S>
    where S: KeyValueStore
{
    inner: S,
    secret: Vec<u8>,
}

impl<S> SealedStore<S> where S: KeyValueStore
{
    pub fn new(inner: S, secret: impl AsRef<[u8]>) -> Self {
        Self { inner, secret: secret.as_ref().to_vec() }
    }

    /// Etiqueta de integridad (no cifra el contenido).
    fn tag(&self, payload: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(payload);
        hasher.finalize().iter().fold(String::with_capacity(64), |mut hex, b| {
                                    let _ = write!(hex, "{:02x}", b);
                                    hex
                                })
    }

    fn seal(&self, value: &str) -> String {
        format!("{}.{}", STANDARD.encode(value.as_bytes()), self.tag(value.as_bytes()))
    }

    fn unseal(&self, sealed: &str) -> Option<String> {
        let (encoded, tag) = sealed.rsplit_once('.')?;
        let payload = STANDARD.decode(encoded).ok()?;
        if !tags_match(self.tag(&payload).as_bytes(), tag.as_bytes()) {
            return None;
        }
        String::from_utf8(payload).ok()
    }
}

impl<S> KeyValueStore for SealedStore<S> where S: KeyValueStore
{
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        match self.inner.get_raw(key)? {
            Some(sealed) => {
                let opened = self.unseal(&sealed);
                if opened.is_none() {
                    warn!("sealed store: etiqueta inválida para '{}', se ignora la entrada", key);
                }
                Ok(opened)
            }
            None => Ok(None),
        }
    }

    fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        self.inner.put_raw(key, &self.seal(value))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.inner.keys()
    }
}
