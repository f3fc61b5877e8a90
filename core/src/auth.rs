use sha2::{Digest, Sha256};

/// Kapabilitet som rapport- og fareoperasjoner krever.
pub trait AuthorizationPolicy: Send + Sync {
    fn authorize(&self, credential: &str) -> bool;
}

/// Sammenligner SHA-256 av oppgitt passord mot en konfigurert digest.
/// Hemmeligheten ligger aldri i klartekst i koden.
#[derive(Debug, Clone)]
pub struct SharedSecretPolicy {
    digest: [u8; 32],
}

impl SharedSecretPolicy {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            digest: digest_of(secret),
        }
    }

    /// Fra hex-digest (64 tegn). None hvis formatet er feil.
    pub fn from_hex_digest(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        if hex.len() != 64 || !hex.is_ascii() {
            return None;
        }
        let mut digest = [0u8; 32];
        for (i, byte) in digest.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[2 * i..2 * i + 2], 16).ok()?;
        }
        Some(Self { digest })
    }
}

fn digest_of(s: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(s.as_bytes()));
    out
}

pub fn sha256_hex(secret: &str) -> String {
    Sha256::digest(secret.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

impl AuthorizationPolicy for SharedSecretPolicy {
    fn authorize(&self, credential: &str) -> bool {
        let got = digest_of(credential);
        // konstant tid over alle 32 bytes
        got.iter()
            .zip(self.digest.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

/// Brukes når ingen hemmelighet er konfigurert: alt avvises.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl AuthorizationPolicy for DenyAll {
    fn authorize(&self, _credential: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_secret_accepts_only_matching_credential() {
        let p = SharedSecretPolicy::from_secret("cuerpo-tecnico");
        assert!(p.authorize("cuerpo-tecnico"));
        assert!(!p.authorize("cuerpo-tecnic0"));
        assert!(!p.authorize(""));
    }

    #[test]
    fn hex_digest_matches_plain_secret() {
        let hex = sha256_hex("cuerpo-tecnico");
        let p = SharedSecretPolicy::from_hex_digest(&hex).expect("gyldig hex");
        assert!(p.authorize("cuerpo-tecnico"));
        assert!(SharedSecretPolicy::from_hex_digest("abc").is_none());
    }

    #[test]
    fn deny_all_denies() {
        assert!(!DenyAll.authorize("anything"));
    }
}
