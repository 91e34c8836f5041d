//! Download-job identifier hashing
//!
//! A download job is identified by a deterministic hash of its creation
//! criteria (persistent identifier plus optional logical division id), so
//! repeated requests for the same derivative always map to the same job row.

use sha2::{Digest, Sha256};

/// Compute the download-job identifier for a set of creation criteria.
///
/// Criteria are concatenated in order, skipping `None` entries, and hashed
/// with SHA-256. The hex digest is the identifier. Same criteria always
/// produce the same identifier.
pub fn download_job_id(criteria: &[Option<&str>]) -> String {
    let mut hasher = Sha256::new();
    for criterion in criteria.iter().flatten() {
        hasher.update(criterion.as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn same_criteria_produce_same_id() {
        let hash = "07319d093ea0e44a618cdf3accb9576009025f7ea7ed3b6765192f1ddca6a801";
        let crit1 = "PPN123456789";
        let crit2 = "LOG_0000";
        assert_eq!(hash, download_job_id(&[Some(crit1), Some(crit2)]));
        assert_eq!(hash, download_job_id(&[Some(crit1), Some(crit2)]));
        assert_eq!(hash, download_job_id(&[Some(crit1), Some(crit2)]));
    }

    #[test]
    fn none_criteria_are_skipped() {
        assert_eq!(
            download_job_id(&[Some("PPN123456789"), None]),
            download_job_id(&[Some("PPN123456789")]),
        );
    }

    #[test]
    fn different_criteria_produce_different_ids() {
        let a = download_job_id(&[Some("PPN123456789"), Some("LOG_0000")]);
        let b = download_job_id(&[Some("PPN123456789"), Some("LOG_0001")]);
        assert_ne!(a, b);
    }

    #[test]
    fn id_is_lowercase_hex_sha256() {
        let id = download_job_id(&[Some("PPN123456789")]);
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
