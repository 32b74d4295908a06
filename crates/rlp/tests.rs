#[cfg(test)]
mod rlp_roundtrip {
    use crate::decode::RLPDecode;
    use crate::encode::RLPEncode;
    use ethereum_types::{H160, U256};

    #[test]
    fn integers_roundtrip() {
        for value in [0u64, 1, 127, 128, 0x7fffffff, u64::MAX] {
            let encoded = value.encode_to_vec();
            assert_eq!(u64::decode(&encoded).unwrap(), value);
        }
    }

    #[test]
    fn zero_encodes_as_empty_string() {
        assert_eq!(0u64.encode_to_vec(), vec![0x80]);
    }

    #[test]
    fn address_roundtrip() {
        let addr = H160::from_low_u64_be(0xdead_beef);
        let encoded = addr.encode_to_vec();
        assert_eq!(H160::decode(&encoded).unwrap(), addr);
    }

    #[test]
    fn option_roundtrip() {
        let none: Option<H160> = None;
        assert_eq!(none.encode_to_vec(), vec![0x80]);
        assert_eq!(Option::<H160>::decode(&none.encode_to_vec()).unwrap(), None);

        let some = Some(H160::from_low_u64_be(42));
        let encoded = some.encode_to_vec();
        assert_eq!(Option::<H160>::decode(&encoded).unwrap(), some);
    }

    #[test]
    fn u256_roundtrip() {
        let value = U256::from_dec_str("123456789012345678901234567890").unwrap();
        let encoded = value.encode_to_vec();
        assert_eq!(U256::decode(&encoded).unwrap(), value);
    }

    #[test]
    fn list_roundtrip() {
        let value: Vec<u64> = vec![1, 2, 3, 0xff, 0x100];
        let encoded = value.encode_to_vec();
        assert_eq!(Vec::<u64>::decode(&encoded).unwrap(), value);
    }

    #[test]
    fn differing_fields_yield_differing_encodings() {
        let a: Vec<u64> = vec![1, 2, 3];
        let b: Vec<u64> = vec![1, 2, 4];
        assert_ne!(a.encode_to_vec(), b.encode_to_vec());
    }
}
