use rand::rngs::OsRng;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey, ecdsa::Signature};
use thiserror::Error;

/// Reasons a hex key or signature cannot be evaluated at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid private key hex")]
    PrivateKeyHex,
    #[error("invalid private key bytes")]
    PrivateKey,
    #[error("invalid pubkey hex")]
    PublicKeyHex,
    #[error("invalid pubkey bytes")]
    PublicKey,
    #[error("invalid signature hex")]
    SignatureHex,
    #[error("invalid DER signature")]
    Signature,
}

/// Generate a new secp256k1 keypair and return (priv_hex, pub_hex_compressed).
/// The compressed public key hex doubles as the wallet identity.
pub fn generate_keypair_hex() -> (String, String) {
    let secp = Secp256k1::new();
    let (sk, pk) = secp.generate_keypair(&mut OsRng);
    (hex::encode(sk.secret_bytes()), hex::encode(pk.serialize()))
}

/// Sign a 32-byte digest with a hex private key. Returns the hex DER signature.
pub fn sign_digest_hex(privkey_hex: &str, msg32: [u8; 32]) -> Result<String, KeyError> {
    let secp = Secp256k1::signing_only();

    let sk_bytes = hex::decode(privkey_hex).map_err(|_| KeyError::PrivateKeyHex)?;
    let sk = SecretKey::from_slice(&sk_bytes).map_err(|_| KeyError::PrivateKey)?;

    let msg = Message::from_digest(msg32);
    let sig = secp.sign_ecdsa(&msg, &sk);
    Ok(hex::encode(&*sig.serialize_der()))
}

/// Verify a signature (hex DER) against the given pubkey (hex) and 32-byte digest.
///
/// `Ok(false)` means the inputs parsed but the signature does not check out;
/// `Err` means the inputs could not be decoded in the first place.
pub fn verify_signature_hex(
    pubkey_hex: &str,
    sig_hex: &str,
    msg32: [u8; 32],
) -> Result<bool, KeyError> {
    let secp = Secp256k1::verification_only();

    let sig_bytes = hex::decode(sig_hex).map_err(|_| KeyError::SignatureHex)?;
    let sig = Signature::from_der(&sig_bytes).map_err(|_| KeyError::Signature)?;

    let pk_bytes = hex::decode(pubkey_hex).map_err(|_| KeyError::PublicKeyHex)?;
    let pk = PublicKey::from_slice(&pk_bytes).map_err(|_| KeyError::PublicKey)?;

    let msg = Message::from_digest(msg32);
    Ok(secp.verify_ecdsa(&msg, &sig, &pk).is_ok())
}
