//! Cipher suite offered during key exchange

use russh::cipher::{self, Name};
use russh::Preferred;

/// Extra ciphers offered on top of the library defaults so older servers
/// can still be reached
pub const LEGACY_CIPHERS: &[&str] = &[
    "aes128-ctr",
    "aes192-ctr",
    "aes256-ctr",
    "aes128-gcm@openssh.com",
    "chacha20-poly1305@openssh.com",
    "arcfour256",
    "arcfour128",
    "arcfour",
    "aes128-cbc",
    "3des-cbc",
    "blowfish-cbc",
    "cast128-cbc",
    "aes192-cbc",
    "aes256-cbc",
];

fn implemented(name: &str) -> Option<Name> {
    match name {
        "aes128-ctr" => Some(cipher::AES_128_CTR),
        "aes192-ctr" => Some(cipher::AES_192_CTR),
        "aes256-ctr" => Some(cipher::AES_256_CTR),
        "chacha20-poly1305@openssh.com" => Some(cipher::CHACHA20_POLY1305),
        "aes128-cbc" => Some(cipher::AES_128_CBC),
        "aes192-cbc" => Some(cipher::AES_192_CBC),
        "aes256-cbc" => Some(cipher::AES_256_CBC),
        _ => None,
    }
}

/// Library defaults followed by every legacy cipher the SSH library implements.
///
/// Legacy names it cannot negotiate are skipped.
pub fn client_ciphers() -> Vec<Name> {
    let mut ciphers = Preferred::default().cipher.to_vec();
    for legacy in LEGACY_CIPHERS {
        match implemented(legacy) {
            Some(name) if !ciphers.contains(&name) => ciphers.push(name),
            Some(_) => {}
            None => tracing::trace!("Cipher {} not available, skipped", legacy),
        }
    }
    ciphers
}
