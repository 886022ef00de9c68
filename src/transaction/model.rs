use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::canonical::Preimage;
use crate::error::{Error, Result};
use crate::wallet::{sign_digest_hex, verify_signature_hex};

/// `from` value of system-issued mining rewards. No signer is checked.
pub const REWARD_SENDER: &str = "";

/// A signed value transfer between two wallet identities (hex public keys).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: String,
    pub to: String,
    pub amount: u64,
    /// Hex-encoded DER ECDSA signature; empty until signed.
    pub signature: String,
}

impl Transaction {
    /// Build an unsigned transaction.
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: u64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
            signature: String::new(),
        }
    }

    /// Mining reward paid by the system to `to`.
    pub fn reward(to: impl Into<String>, amount: u64) -> Self {
        Self::new(REWARD_SENDER, to, amount)
    }

    /// Build a transaction and sign it with the sender's private key.
    pub fn new_signed(
        from_pubkey: &str,
        from_privkey: &str,
        to: &str,
        amount: u64,
    ) -> Result<Self> {
        let mut tx = Self::new(from_pubkey, to, amount);
        tx.sign(from_privkey)?;
        Ok(tx)
    }

    pub fn is_reward(&self) -> bool {
        self.from == REWARD_SENDER
    }

    /// SHA-256 over (from, to, amount). The signature is not part of it.
    pub fn compute_digest(&self) -> [u8; 32] {
        let mut p = Preimage::new("tx");
        p.put_str(&self.from).put_str(&self.to).put_u64(self.amount);
        p.digest()
    }

    pub fn sign(&mut self, privkey_hex: &str) -> Result<()> {
        self.signature = sign_digest_hex(privkey_hex, self.compute_digest())?;
        Ok(())
    }

    /// Rewards are always authorized; anything else needs a signature by `from`.
    pub fn is_authorized(&self) -> bool {
        if self.is_reward() {
            return true;
        }
        if self.signature.is_empty() {
            debug!("transaction from {} is unsigned", self.from);
            return false;
        }
        match verify_signature_hex(&self.from, &self.signature, self.compute_digest()) {
            Ok(valid) => valid,
            Err(e) => {
                warn!("signature check failed for sender {}: {}", self.from, e);
                false
            }
        }
    }

    /// Like [`Transaction::is_authorized`], but a key or signature that cannot
    /// be decoded comes back as `MalformedKeyOrSignature` instead of `false`.
    pub fn check_authorization(&self) -> Result<()> {
        if self.is_reward() {
            return Ok(());
        }
        if self.signature.is_empty() {
            return Err(Error::UnauthorizedTransaction);
        }
        if verify_signature_hex(&self.from, &self.signature, self.compute_digest())? {
            Ok(())
        } else {
            Err(Error::UnauthorizedTransaction)
        }
    }

    pub(crate) fn write_canonical(&self, p: &mut Preimage) {
        p.put_str(&self.from)
            .put_str(&self.to)
            .put_u64(self.amount)
            .put_str(&self.signature);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::{KeyError, generate_keypair_hex};

    #[test]
    fn reward_needs_no_signature() {
        let tx = Transaction::reward("miner", 50);
        assert!(tx.is_reward());
        assert!(tx.signature.is_empty());
        assert!(tx.is_authorized());
    }

    #[test]
    fn signed_transaction_is_authorized() {
        let (sk, pk) = generate_keypair_hex();
        let (_, to) = generate_keypair_hex();
        let tx = Transaction::new_signed(&pk, &sk, &to, 100).unwrap();
        assert!(!tx.signature.is_empty());
        assert!(tx.is_authorized());
    }

    #[test]
    fn unsigned_transaction_is_rejected() {
        let (_, pk) = generate_keypair_hex();
        assert!(!Transaction::new(pk, "bob", 1).is_authorized());
    }

    #[test]
    fn mutation_after_signing_is_detected() {
        let (sk, pk) = generate_keypair_hex();
        let mut tx = Transaction::new_signed(&pk, &sk, "bob", 100).unwrap();
        tx.amount = 1_000;
        assert!(!tx.is_authorized());

        let mut tx = Transaction::new_signed(&pk, &sk, "bob", 100).unwrap();
        tx.to = "mallory".into();
        assert!(!tx.is_authorized());
    }

    #[test]
    fn signature_by_someone_else_is_rejected() {
        let (_, pk) = generate_keypair_hex();
        let (other_sk, _) = generate_keypair_hex();
        let tx = Transaction::new_signed(&pk, &other_sk, "bob", 5).unwrap();
        assert!(!tx.is_authorized());
    }

    #[test]
    fn garbage_signature_is_unauthorized_not_a_panic() {
        let (_, pk) = generate_keypair_hex();
        let mut tx = Transaction::new(pk, "bob", 5);
        tx.signature = "not hex at all".into();
        assert!(!tx.is_authorized());

        let mut tx = Transaction::new("not-a-key", "bob", 5);
        tx.signature = "3006020101020101".into();
        assert!(!tx.is_authorized());
    }

    #[test]
    fn signing_with_malformed_key_fails() {
        let mut tx = Transaction::new("alice", "bob", 5);
        let err = tx.sign("nothex").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedKeyOrSignature(KeyError::PrivateKeyHex)
        ));
        assert!(tx.signature.is_empty());
    }

    #[test]
    fn digest_ignores_signature() {
        let (sk, pk) = generate_keypair_hex();
        let unsigned = Transaction::new(pk.clone(), "bob", 3);
        let signed = Transaction::new_signed(&pk, &sk, "bob", 3).unwrap();
        assert_eq!(unsigned.compute_digest(), signed.compute_digest());
    }

    #[test]
    fn authorization_check_separates_malformed_from_unauthorized() {
        let (sk, pk) = generate_keypair_hex();

        let tx = Transaction::new_signed("zz-not-hex", &sk, "bob", 3).unwrap();
        assert!(!tx.is_authorized());
        assert!(matches!(
            tx.check_authorization(),
            Err(Error::MalformedKeyOrSignature(KeyError::PublicKeyHex))
        ));

        let mut tx = Transaction::new(pk.clone(), "bob", 3);
        tx.signature = "xyz".into();
        assert!(matches!(
            tx.check_authorization(),
            Err(Error::MalformedKeyOrSignature(KeyError::SignatureHex))
        ));

        let unsigned = Transaction::new(pk.clone(), "bob", 3);
        assert!(matches!(
            unsigned.check_authorization(),
            Err(Error::UnauthorizedTransaction)
        ));

        let mut forged = Transaction::new_signed(&pk, &sk, "bob", 3).unwrap();
        forged.amount = 4;
        assert!(matches!(
            forged.check_authorization(),
            Err(Error::UnauthorizedTransaction)
        ));

        assert!(Transaction::reward("m", 1).check_authorization().is_ok());
        let valid = Transaction::new_signed(&pk, &sk, "bob", 3).unwrap();
        assert!(valid.check_authorization().is_ok());
    }
}
