use crate::model::PricingInputs;
use sha2::{Digest, Sha256};

/// Deterministic digest identifying one reproducible computation request:
/// workbook change-signature, canonical inputs, and the strategy that will
/// serve it. Identical fingerprints identify the same result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn compute(signature: &str, inputs: &PricingInputs, strategy: &str) -> Self {
        // serde_json rejects non-finite floats; margin is validated before
        // it reaches this point.
        debug_assert!(inputs.margin.is_finite(), "margin must be finite");
        // Struct field order drives the JSON encoding, which keeps the
        // digest stable across calls for unchanged inputs.
        let inputs_json = serde_json::to_string(inputs).expect("pricing inputs serialize");

        let mut hasher = Sha256::new();
        hasher.update(signature.as_bytes());
        hasher.update([0u8]);
        hasher.update(inputs_json.as_bytes());
        hasher.update([0u8]);
        hasher.update(strategy.as_bytes());

        let digest = hasher.finalize();
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest {
            hex.push_str(&format!("{byte:02x}"));
        }
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
