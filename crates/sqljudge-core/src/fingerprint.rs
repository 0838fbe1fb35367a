use sha2::{Digest, Sha256};

pub fn sha256_hex(s: &str) -> String {
    let mut h = Sha256::new();
    h.update(s.as_bytes());
    hex::encode(h.finalize())
}

/// Content digests identifying exactly what was graded.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Fingerprint {
    pub suite_sha256: String,
    pub solution_sha256: String,
}

impl Fingerprint {
    pub fn compute(suite_raw: &str, solution: &str) -> Self {
        Self {
            suite_sha256: sha256_hex(suite_raw),
            solution_sha256: sha256_hex(solution),
        }
    }
}
