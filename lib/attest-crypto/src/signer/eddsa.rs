use secrecy::{ExposeSecret, SecretSlice};

use crate::{Signer, SignerError};

pub struct EDDSASigner {}

pub struct KeyPair {
    pub public: Vec<u8>,
    pub private: SecretSlice<u8>,
}

impl EDDSASigner {
    pub fn check_public_key(public_key: &[u8]) -> Result<Vec<u8>, SignerError> {
        let key = ed25519_compact::PublicKey::from_slice(public_key)
            .map_err(|e| SignerError::CouldNotExtractPublicKey(e.to_string()))?;
        Ok(key.to_vec())
    }

    pub fn generate_key_pair() -> KeyPair {
        let key_pair = ed25519_compact::KeyPair::generate();

        KeyPair {
            public: key_pair.pk.to_vec(),
            private: key_pair.sk.to_vec().into(),
        }
    }

    pub fn parse_private_key(secret_key: &SecretSlice<u8>) -> Result<KeyPair, SignerError> {
        let secret_key = ed25519_compact::SecretKey::from_slice(secret_key.expose_secret())
            .map_err(|_| SignerError::CouldNotExtractKeyPair)?;
        let public_key = secret_key.public_key();

        Ok(KeyPair {
            public: public_key.to_vec(),
            private: secret_key.to_vec().into(),
        })
    }
}

impl Signer for EDDSASigner {
    fn sign(
        &self,
        input: &[u8],
        public_key: &[u8],
        private_key: &SecretSlice<u8>,
    ) -> Result<Vec<u8>, SignerError> {
        let ed25519_kp = ed25519_compact::KeyPair::from_slice(private_key.expose_secret())
            .map_err(|_| SignerError::CouldNotExtractKeyPair)?;

        if ed25519_kp.pk.as_slice() != public_key {
            return Err(SignerError::CouldNotExtractKeyPair);
        }

        Ok(ed25519_kp.sk.sign(input, None).to_vec())
    }

    fn verify(
        &self,
        input: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<(), SignerError> {
        let ed25519_pk = ed25519_compact::PublicKey::from_slice(public_key)
            .map_err(|_| SignerError::CouldNotExtractKeyPair)?;

        let ed25519_signature = ed25519_compact::Signature::from_slice(signature)
            .map_err(|e| SignerError::CouldNotVerify(e.to_string()))?;

        ed25519_pk
            .verify(input, &ed25519_signature)
            .map_err(|_| SignerError::InvalidSignature)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sign_and_verify_roundtrip() {
        let key_pair = EDDSASigner::generate_key_pair();
        let signer = EDDSASigner {};

        let signature = signer
            .sign(b"payload", &key_pair.public, &key_pair.private)
            .unwrap();

        signer
            .verify(b"payload", &signature, &key_pair.public)
            .unwrap();

        let result = signer.verify(b"tampered", &signature, &key_pair.public);
        assert!(matches!(result, Err(SignerError::InvalidSignature)));
    }

    #[test]
    fn test_sign_rejects_mismatched_public_key() {
        let key_pair = EDDSASigner::generate_key_pair();
        let other = EDDSASigner::generate_key_pair();
        let signer = EDDSASigner {};

        let result = signer.sign(b"payload", &other.public, &key_pair.private);
        assert!(matches!(result, Err(SignerError::CouldNotExtractKeyPair)));
    }

    #[test]
    fn test_parse_private_key_recovers_public_key() {
        let key_pair = EDDSASigner::generate_key_pair();

        let parsed = EDDSASigner::parse_private_key(&key_pair.private).unwrap();
        assert_eq!(parsed.public, key_pair.public);
    }
}
