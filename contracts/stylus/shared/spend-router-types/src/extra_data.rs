//! Extra-data codec.
//!
//! A spend permission's `extraData` carries the two addresses the router needs:
//! the app allowed to trigger the spend and the recipient of the funds.
//!
//! Layout is `abi.encode(address app, address recipient)`:
//! - word 0: 12 zero bytes || app (20 bytes)
//! - word 1: 12 zero bytes || recipient (20 bytes)

use alloc::vec::Vec;

use alloy_primitives::Address;

use crate::constants::{EXTRA_DATA_LEN, WORD_LEN};

const ADDRESS_OFFSET: usize = WORD_LEN - 20;

/// Decoded extra data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtraData {
    pub app: Address,
    pub recipient: Address,
}

/// Errors while encoding or decoding extra data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtraDataError {
    ZeroAppAddress,
    ZeroRecipientAddress,
    /// Payload is not two clean address words. Carries the offending payload.
    MalformedExtraData { length: usize, extra_data: Vec<u8> },
}

/// Encode `(app, recipient)` into the 64-byte extra-data payload.
pub fn encode_extra_data(app: Address, recipient: Address) -> Result<Vec<u8>, ExtraDataError> {
    if app == Address::ZERO {
        return Err(ExtraDataError::ZeroAppAddress);
    }
    if recipient == Address::ZERO {
        return Err(ExtraDataError::ZeroRecipientAddress);
    }

    let mut buf = Vec::with_capacity(EXTRA_DATA_LEN);
    write_address_word(&mut buf, app);
    write_address_word(&mut buf, recipient);
    Ok(buf)
}

/// Decode the extra-data payload back into `(app, recipient)`.
///
/// The length is checked before anything else is read. Dirty padding is rejected the same way
/// Solidity's `abi.decode` rejects it.
pub fn decode_extra_data(bytes: &[u8]) -> Result<ExtraData, ExtraDataError> {
    let malformed = || ExtraDataError::MalformedExtraData {
        length: bytes.len(),
        extra_data: bytes.to_vec(),
    };
    if bytes.len() != EXTRA_DATA_LEN {
        return Err(malformed());
    }

    let app = read_address_word(&bytes[..WORD_LEN]).ok_or_else(malformed)?;
    let recipient = read_address_word(&bytes[WORD_LEN..]).ok_or_else(malformed)?;
    Ok(ExtraData { app, recipient })
}

fn write_address_word(buf: &mut Vec<u8>, address: Address) {
    buf.extend_from_slice(&[0u8; ADDRESS_OFFSET]);
    buf.extend_from_slice(address.as_slice());
}

fn read_address_word(word: &[u8]) -> Option<Address> {
    if word[..ADDRESS_OFFSET].iter().any(|b| *b != 0) {
        return None;
    }
    Some(Address::from_slice(&word[ADDRESS_OFFSET..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const APP: Address = address!("00000000000000000000000000000000000a1100");
    const RECIPIENT: Address = address!("000000000000000000000000000000000000beef");

    #[test]
    fn test_encode_layout() {
        let encoded = encode_extra_data(APP, RECIPIENT).unwrap();
        assert_eq!(encoded.len(), 64);
        assert!(encoded[..12].iter().all(|b| *b == 0));
        assert_eq!(&encoded[12..32], APP.as_slice());
        assert!(encoded[32..44].iter().all(|b| *b == 0));
        assert_eq!(&encoded[44..64], RECIPIENT.as_slice());
    }

    #[test]
    fn test_decode_reverses_encode() {
        let app = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let recipient = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
        let decoded = decode_extra_data(&encode_extra_data(app, recipient).unwrap()).unwrap();
        assert_eq!(decoded, ExtraData { app, recipient });

        // Order matters.
        let swapped = decode_extra_data(&encode_extra_data(recipient, app).unwrap()).unwrap();
        assert_eq!(swapped.app, recipient);
        assert_eq!(swapped.recipient, app);
    }

    #[test]
    fn test_encode_rejects_zero_addresses() {
        assert_eq!(
            encode_extra_data(Address::ZERO, RECIPIENT),
            Err(ExtraDataError::ZeroAppAddress)
        );
        assert_eq!(
            encode_extra_data(APP, Address::ZERO),
            Err(ExtraDataError::ZeroRecipientAddress)
        );
        // App is checked first.
        assert_eq!(
            encode_extra_data(Address::ZERO, Address::ZERO),
            Err(ExtraDataError::ZeroAppAddress)
        );
    }

    #[test]
    fn test_decode_rejects_wrong_lengths() {
        let encoded = encode_extra_data(APP, RECIPIENT).unwrap();
        for len in [0usize, 16, 20, 40, 63] {
            assert_eq!(
                decode_extra_data(&encoded[..len]),
                Err(ExtraDataError::MalformedExtraData {
                    length: len,
                    extra_data: encoded[..len].to_vec(),
                })
            );
        }

        let mut longer = encoded.clone();
        longer.push(0);
        assert_eq!(
            decode_extra_data(&longer),
            Err(ExtraDataError::MalformedExtraData {
                length: 65,
                extra_data: longer.clone(),
            })
        );
    }

    #[test]
    fn test_decode_rejects_dirty_padding() {
        let mut encoded = encode_extra_data(APP, RECIPIENT).unwrap();
        encoded[33] = 0x01;
        assert_eq!(
            decode_extra_data(&encoded),
            Err(ExtraDataError::MalformedExtraData {
                length: 64,
                extra_data: encoded.clone(),
            })
        );
    }

    #[test]
    fn test_decode_does_not_validate_zero_addresses() {
        // Zero checks belong to the caller (the router rejects a zero recipient itself).
        let decoded = decode_extra_data(&[0u8; 64]).unwrap();
        assert_eq!(decoded.app, Address::ZERO);
        assert_eq!(decoded.recipient, Address::ZERO);
    }
}
