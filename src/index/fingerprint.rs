use sha2::{Digest, Sha256};

use super::types::Index;

impl Index {
    /// SHA-256 over buckets, keys and targets in index order.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();

        for (bucket_key, bucket) in &self.buckets {
            hasher.update(bucket_key.to_string().as_bytes());
            hasher.update([0x1d]);
            for entry in &bucket.entries {
                field(&mut hasher, &entry.key);
                for target in &entry.targets {
                    field(&mut hasher, &target.document_path);
                    field(&mut hasher, &target.anchor);
                    field(&mut hasher, &target.provenance_label);
                    field(&mut hasher, target.kind_hint.as_str());
                    field(&mut hasher, target.signature.as_deref().unwrap_or(""));
                }
                hasher.update([0x1e]);
            }
        }

        format!("{:x}", hasher.finalize())
    }
}

fn field(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}
