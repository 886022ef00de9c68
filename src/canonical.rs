use sha2::{Digest, Sha256};

/// Byte buffer fed to SHA-256 when hashing transactions and blocks.
///
/// Every field is written with an explicit width or length prefix, so two
/// different field sequences never produce the same bytes. The leading
/// domain tag keeps transaction and block preimages apart.
#[derive(Debug, Clone, Default)]
pub struct Preimage {
    buf: Vec<u8>,
}

impl Preimage {
    pub fn new(domain: &str) -> Self {
        let mut p = Self::default();
        p.put_str(domain);
        p
    }

    /// u64 big-endian length, then the UTF-8 bytes.
    pub fn put_str(&mut self, s: &str) -> &mut Self {
        self.put_u64(s.len() as u64);
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    pub fn put_u64(&mut self, n: u64) -> &mut Self {
        self.buf.extend_from_slice(&n.to_be_bytes());
        self
    }

    pub fn put_i64(&mut self, n: i64) -> &mut Self {
        self.buf.extend_from_slice(&n.to_be_bytes());
        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(&self.buf);
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest[..]);
        out
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}

/// True when the first `difficulty` hex characters of `hash_hex` are all '0'.
pub fn meets_difficulty(hash_hex: &str, difficulty: u32) -> bool {
    let d = difficulty as usize;
    hash_hex.len() >= d && hash_hex.bytes().take(d).all(|c| c == b'0')
}
