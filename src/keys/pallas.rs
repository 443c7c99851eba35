/// Mina public key derivation on the Pallas curve.
///
/// A Mina public key is the point `sk · G` where `G = (1, y)` is Mina's Pallas
/// generator. Encoded form:
/// `base58check(0xcb, 0x01 || 0x01 || x (32B little-endian) || is_odd(y))`.
use ff::{Field, PrimeField};
use group::Curve;
use pasta_curves::arithmetic::{Coordinates, CurveAffine};
use pasta_curves::pallas;

use super::{PublicKeyDeriver, PRIVATE_KEY_TAG, PRIVATE_KEY_VERSION, PUBLIC_KEY_VERSION};
use crate::codec::base58check;
use crate::error::{Result, VaultError};

/// Little-endian y-coordinate of Mina's generator
/// (12418654782883325593414442427049395787963493412651469444558597405572177144507).
const GENERATOR_Y: [u8; 32] = [
    0xbb, 0x2a, 0xed, 0xca, 0x23, 0x7a, 0xcf, 0x19, 0x71, 0x47, 0x3d, 0x33, 0xd4, 0x5b, 0x65,
    0x8f, 0x54, 0xee, 0x78, 0x63, 0xf0, 0xa9, 0xdf, 0x53, 0x7c, 0x93, 0x12, 0x0a, 0xa3, 0xb5,
    0x74, 0x1b,
];

const PUBLIC_KEY_PREFIX: [u8; 2] = [0x01, 0x01];

fn generator() -> Result<pallas::Affine> {
    let y = Option::<pallas::Base>::from(pallas::Base::from_repr(GENERATOR_Y))
        .ok_or_else(|| VaultError::Derivation("Invalid generator coordinate".into()))?;
    Option::<pallas::Affine>::from(pallas::Affine::from_xy(pallas::Base::ONE, y))
        .ok_or_else(|| VaultError::Derivation("Generator is not on the curve".into()))
}

/// Decode an `EK…` private key into its Pallas scalar.
pub fn decode_private_key(private_key: &str) -> Result<pallas::Scalar> {
    let payload = base58check::decode(private_key.trim(), PRIVATE_KEY_VERSION)?;
    if payload.len() != 33 || payload[0] != PRIVATE_KEY_TAG {
        return Err(VaultError::Validation(format!(
            "Private key payload has unexpected layout ({} bytes)",
            payload.len()
        )));
    }

    let mut repr = [0u8; 32];
    repr.copy_from_slice(&payload[1..]);
    Option::<pallas::Scalar>::from(pallas::Scalar::from_repr(repr))
        .ok_or_else(|| VaultError::Validation("Private key scalar out of range".into()))
}

/// Encode a curve point as a `B62…` address.
pub fn encode_public_key(point: &pallas::Affine) -> Result<String> {
    let coords = Option::<Coordinates<pallas::Affine>>::from(point.coordinates())
        .ok_or_else(|| VaultError::Derivation("Public key is the point at infinity".into()))?;

    let mut payload = Vec::with_capacity(35);
    payload.extend_from_slice(&PUBLIC_KEY_PREFIX);
    payload.extend_from_slice(&coords.x().to_repr());
    payload.push(u8::from(bool::from(coords.y().is_odd())));

    Ok(base58check::encode(&payload, PUBLIC_KEY_VERSION))
}

/// Native public key derivation over Pallas.
#[derive(Debug, Clone, Copy, Default)]
pub struct PallasKeyDeriver;

impl PublicKeyDeriver for PallasKeyDeriver {
    fn public_key(&self, private_key: &str) -> Result<String> {
        let scalar = decode_private_key(private_key)?;
        if bool::from(scalar.is_zero()) {
            return Err(VaultError::Validation("Private key scalar is zero".into()));
        }
        let point = (pallas::Point::from(generator()?) * scalar).to_affine();
        encode_public_key(&point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_key_pair() {
        let pk = PallasKeyDeriver
            .public_key("EKFKgDtU3rcuFTVSEpmpXSkukjmX4cKefYREi6Sdsk7E7wsT7KRw")
            .unwrap();
        assert_eq!(pk, "B62qiy32p8kAKnny8ZFwoMhYpBppM1DWVCqAPBYNcXnsAHhnfAAuXgg");
    }

    #[test]
    fn test_scalar_one_is_generator() {
        let pk = PallasKeyDeriver
            .public_key("EKDheFCGxfVGKBunTkfkWv3WqiH7JXiYaTu3kv9pb389GBqPpUFr")
            .unwrap();
        assert_eq!(pk, "B62qiVGZQdBJJrxnzhvqp7LKe6jDiFcpU3cF5xHoZof5Pz9qiL85KLx");
    }

    #[test]
    fn test_zero_scalar_rejected() {
        let mut payload = [0u8; 33];
        payload[0] = PRIVATE_KEY_TAG;
        let sk = base58check::encode(&payload, PRIVATE_KEY_VERSION);
        assert!(matches!(
            PallasKeyDeriver.public_key(&sk),
            Err(VaultError::Validation(_))
        ));
    }

    #[test]
    fn test_out_of_range_scalar_rejected() {
        let mut payload = [0xffu8; 33];
        payload[0] = PRIVATE_KEY_TAG;
        let sk = base58check::encode(&payload, PRIVATE_KEY_VERSION);
        assert!(decode_private_key(&sk).is_err());
    }

    #[test]
    fn test_wrong_tag_rejected() {
        let mut payload = [0u8; 33];
        payload[0] = 0x02;
        payload[1] = 0x01;
        let sk = base58check::encode(&payload, PRIVATE_KEY_VERSION);
        assert!(decode_private_key(&sk).is_err());
    }
}
