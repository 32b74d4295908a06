//! # gw-crypto
//!
//! The three cryptographic primitives the gateway needs: Ethereum's
//! keccak-256 identity hash, secp256k1 ECDSA sender recovery, and the
//! backend's own domain-separated hash over molecular-encoded structs.
//! Kept in one small crate behind a single dependency boundary.

use blake2::digest::{Update, VariableOutput};
use blake2::Blake2bVar;
use ethereum_types::Address;
use sha3::{Digest, Keccak256};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CryptoError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid recovery id")]
    InvalidRecoveryId,
    #[error("recovery failed")]
    RecoveryFailed,
}

/// Ethereum's keccak-256. The only hash used for `ethHash` and for the
/// unsigned-transaction signing hash.
pub fn keccak_hash(data: impl AsRef<[u8]>) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data.as_ref());
    hasher.finalize().into()
}

/// EIP-2: reject signatures with `s > secp256k1n/2`, the canonical
/// low-s requirement enforced by every Ethereum client.
const SECP256K1_N_HALF: [u8; 32] =
    hex_literal::hex!("7fffffffffffffffffffffffffffffff5d576e7357a4501ddfe92f46681b20a0");

/// Recovers the signer address from a 65-byte `r || s || v` signature and a
/// 32-byte message hash, where `v` is the normalized recovery id (0 or 1).
///
/// `msg` must already be the keccak-256 of the RLP-encoded unsigned
/// transaction — this function performs no hashing of its own beyond the
/// final address derivation.
pub fn recover_signer(sig: &[u8; 65], msg: &[u8; 32]) -> Result<Address, CryptoError> {
    if sig[32..64] > SECP256K1_N_HALF[..] {
        return Err(CryptoError::InvalidSignature);
    }

    let recovery_id = secp256k1::ecdsa::RecoveryId::try_from(sig[64] as i32)
        .map_err(|_| CryptoError::InvalidRecoveryId)?;

    let recoverable_sig = secp256k1::ecdsa::RecoverableSignature::from_compact(&sig[..64], recovery_id)
        .map_err(|_| CryptoError::InvalidSignature)?;

    let message = secp256k1::Message::from_digest(*msg);

    let public_key = secp256k1::SECP256K1
        .recover_ecdsa(&message, &recoverable_sig)
        .map_err(|_| CryptoError::RecoveryFailed)?;

    let hash = keccak_hash(&public_key.serialize_uncompressed()[1..]);
    Ok(Address::from_slice(&hash[12..]))
}

/// Domain separation tag prepended before hashing molecular-encoded backend
/// structs, so a `NativeRawTx` encoding can never collide with some other
/// struct's encoding under this hash.
const BACKEND_HASH_PERSONAL: &[u8] = b"gw-native-tx-hash";

/// The backend's own hash over molecular-encoded bytes (e.g. a `NativeRawTx`).
/// Distinct from `keccak_hash`: the backend is not an EVM and does not share
/// Ethereum's hash domain, so its hash carries its own personalization tag
/// via BLAKE2b's variable-output mode.
pub fn backend_hash(encoded: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2bVar::new(32).expect("32 is a valid blake2b output size");
    hasher.update(BACKEND_HASH_PERSONAL);
    hasher.update(encoded);
    let mut out = [0u8; 32];
    hasher
        .finalize_variable(&mut out)
        .expect("output buffer is exactly the configured size");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_of_empty_input() {
        let hash = keccak_hash([]);
        assert_eq!(
            hex::encode(hash),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn recover_signer_from_known_vector() {
        // secp256k1 keypair: privkey = keccak("gw-crypto-test"), signed over
        // the keccak of the literal message b"hello".
        let secret_key = secp256k1::SecretKey::from_slice(&keccak_hash(b"gw-crypto-test")).unwrap();
        let public_key = secp256k1::PublicKey::from_secret_key(secp256k1::SECP256K1, &secret_key);
        let expected_address = {
            let hash = keccak_hash(&public_key.serialize_uncompressed()[1..]);
            Address::from_slice(&hash[12..])
        };

        let msg_hash = keccak_hash(b"hello");
        let message = secp256k1::Message::from_digest(msg_hash);
        let (recovery_id, compact) = secp256k1::SECP256K1
            .sign_ecdsa_recoverable(&message, &secret_key)
            .serialize_compact();

        let mut sig = [0u8; 65];
        sig[..64].copy_from_slice(&compact);
        sig[64] = recovery_id as i32 as u8;

        let recovered = recover_signer(&sig, &msg_hash).unwrap();
        assert_eq!(recovered, expected_address);
    }

    #[test]
    fn recover_signer_rejects_high_s() {
        let mut sig = [0u8; 65];
        sig[32] = 0x80; // forces s > n/2 regardless of the rest
        let msg_hash = [0u8; 32];
        assert_eq!(recover_signer(&sig, &msg_hash), Err(CryptoError::InvalidSignature));
    }

    #[test]
    fn backend_hash_is_deterministic_and_domain_separated() {
        let encoded = [1u8, 2, 3, 4];
        assert_eq!(backend_hash(&encoded), backend_hash(&encoded));
        assert_ne!(backend_hash(&encoded), keccak_hash(encoded));
    }

    #[test]
    fn differing_input_yields_differing_backend_hash() {
        assert_ne!(backend_hash(&[1u8, 2, 3]), backend_hash(&[1u8, 2, 4]));
    }
}
