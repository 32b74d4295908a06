use bytes::{BufMut, Bytes};
use ethereum_types::{H160, H256, U256};

use super::constants::RLP_NULL;

/// Encodes a value to a fresh `Vec<u8>`. For encoding into an existing
/// buffer, use [`RLPEncode::encode`] directly.
pub fn encode<T: RLPEncode>(value: &T) -> Vec<u8> {
    let mut buf = Vec::new();
    value.encode(&mut buf);
    buf
}

#[inline(always)]
const fn impl_length_integers(bits: u32, lsb: u8) -> usize {
    let sig_len = (bits + 8) >> 3;
    let is_multibyte_mask = ((sig_len > 1) as usize) | ((lsb > 0x7f) as usize);
    1 + sig_len as usize * is_multibyte_mask
}

#[inline]
pub const fn list_length(payload_len: usize) -> usize {
    if payload_len < 56 {
        1 + payload_len
    } else {
        let be_len = payload_len.ilog2() / 8 + 1;
        1 + be_len as usize + payload_len
    }
}

#[inline]
pub const fn bytes_length(bytes_len: usize, first_byte: u8) -> usize {
    if bytes_len == 1 && first_byte <= 0x7f {
        return 1;
    }
    if bytes_len < 56 {
        return 1 + bytes_len;
    }
    let be_len = bytes_len.ilog2() / 8 + 1;
    1 + be_len as usize + bytes_len
}

/// Types that can be RLP-encoded. Implement this for any struct used on the
/// wire (transactions, signing previews); use [`crate::structs::Encoder`]
/// for anything with more than one field.
pub trait RLPEncode {
    fn encode(&self, buf: &mut dyn BufMut);

    fn length(&self) -> usize {
        let mut counter = ByteCounter::default();
        self.encode(&mut counter);
        counter.count
    }

    fn encode_to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ByteCounter {
    count: usize,
}

unsafe impl BufMut for ByteCounter {
    fn remaining_mut(&self) -> usize {
        usize::MAX - self.count
    }
    unsafe fn advance_mut(&mut self, cnt: usize) {
        self.count += cnt;
    }
    fn chunk_mut(&mut self) -> &mut bytes::buf::UninitSlice {
        unreachable!("ByteCounter only counts, callers reimplement put_slice/put_bytes")
    }
    fn put_slice(&mut self, src: &[u8]) {
        self.count += src.len();
    }
    fn put_bytes(&mut self, _val: u8, cnt: usize) {
        self.count += cnt;
    }
}

fn impl_encode<const N: usize>(value_be: [u8; N], buf: &mut dyn BufMut) {
    let Some(first_nonzero) = value_be.iter().position(|&b| b != 0) else {
        // 0, the empty string, is 0x80.
        buf.put_u8(RLP_NULL);
        return;
    };
    let first = value_be[first_nonzero];
    if first_nonzero == N - 1 && first <= 0x7f {
        buf.put_u8(first);
        return;
    }
    let len = N - first_nonzero;
    buf.put_u8(RLP_NULL + len as u8);
    buf.put_slice(&value_be[first_nonzero..]);
}

macro_rules! impl_rlp_encode_for_uint {
    ($t:ty) => {
        impl RLPEncode for $t {
            fn encode(&self, buf: &mut dyn BufMut) {
                impl_encode(self.to_be_bytes(), buf);
            }
            #[inline]
            fn length(&self) -> usize {
                impl_length_integers(
                    <$t>::BITS.saturating_sub(self.leading_zeros()).saturating_sub(1),
                    (*self & 0xff) as u8,
                )
            }
        }
    };
}

impl_rlp_encode_for_uint!(u8);
impl_rlp_encode_for_uint!(u16);
impl_rlp_encode_for_uint!(u32);
impl_rlp_encode_for_uint!(u64);
impl_rlp_encode_for_uint!(u128);
impl_rlp_encode_for_uint!(usize);

impl RLPEncode for () {
    fn encode(&self, buf: &mut dyn BufMut) {
        buf.put_u8(RLP_NULL);
    }
    fn length(&self) -> usize {
        1
    }
}

impl RLPEncode for [u8] {
    fn encode(&self, buf: &mut dyn BufMut) {
        if self.len() == 1 && self[0] < RLP_NULL {
            buf.put_u8(self[0]);
            return;
        }
        let len = self.len();
        if len < 56 {
            buf.put_u8(RLP_NULL + len as u8);
        } else {
            let bytes = len.to_be_bytes();
            let start = bytes.iter().position(|&x| x != 0).unwrap();
            buf.put_u8(0xb7 + (bytes.len() - start) as u8);
            buf.put_slice(&bytes[start..]);
        }
        buf.put_slice(self);
    }
    fn length(&self) -> usize {
        if self.is_empty() {
            return 1;
        }
        bytes_length(self.len(), self[0])
    }
}

impl<const N: usize> RLPEncode for [u8; N] {
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_slice().encode(buf)
    }
    fn length(&self) -> usize {
        self.as_slice().length()
    }
}

impl RLPEncode for Vec<u8> {
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_slice().encode(buf)
    }
    fn length(&self) -> usize {
        self.as_slice().length()
    }
}

impl RLPEncode for Bytes {
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_ref().encode(buf)
    }
    fn length(&self) -> usize {
        self.as_ref().length()
    }
}

impl RLPEncode for str {
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_bytes().encode(buf)
    }
    fn length(&self) -> usize {
        self.as_bytes().length()
    }
}

impl RLPEncode for String {
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_bytes().encode(buf)
    }
    fn length(&self) -> usize {
        self.as_bytes().length()
    }
}

impl RLPEncode for H160 {
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_bytes().encode(buf)
    }
    fn length(&self) -> usize {
        self.as_bytes().length()
    }
}

impl RLPEncode for H256 {
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_bytes().encode(buf)
    }
    fn length(&self) -> usize {
        self.as_bytes().length()
    }
}

impl RLPEncode for U256 {
    fn encode(&self, buf: &mut dyn BufMut) {
        let mut bytes = [0u8; 32];
        self.to_big_endian(&mut bytes);
        let leading_zeros = (self.leading_zeros() / 8) as usize;
        bytes[leading_zeros..].encode(buf)
    }
    fn length(&self) -> usize {
        let ilog = self.bits().saturating_sub(1);
        impl_length_integers(ilog as u32, (self.low_u32() & 0xff) as u8)
    }
}

/// Encodes `None` as the empty byte string (`0x80`) and `Some(x)` as `x`'s
/// own encoding — used for `to: Option<EthAddress>`, where a missing `to`
/// means contract creation, matching Ethereum's legacy tx encoding.
impl<T: RLPEncode> RLPEncode for Option<T> {
    fn encode(&self, buf: &mut dyn BufMut) {
        match self {
            Some(value) => value.encode(buf),
            None => buf.put_u8(RLP_NULL),
        }
    }
    fn length(&self) -> usize {
        match self {
            Some(value) => value.length(),
            None => 1,
        }
    }
}

impl<T: RLPEncode> RLPEncode for Vec<T> {
    fn encode(&self, buf: &mut dyn BufMut) {
        if self.is_empty() {
            buf.put_u8(0xc0);
            return;
        }
        let payload_len: usize = self.iter().map(RLPEncode::length).sum();
        encode_length(payload_len, buf);
        for item in self {
            item.encode(buf);
        }
    }
    fn length(&self) -> usize {
        if self.is_empty() {
            return 1;
        }
        list_length(self.iter().map(RLPEncode::length).sum())
    }
}

#[inline]
pub fn encode_length(total_len: usize, buf: &mut dyn BufMut) {
    if total_len < 56 {
        buf.put_u8(0xc0 + total_len as u8);
    } else {
        let bytes = total_len.to_be_bytes();
        let start = bytes.iter().position(|&x| x != 0).unwrap();
        buf.put_u8(0xf7 + (bytes.len() - start) as u8);
        buf.put_slice(&bytes[start..]);
    }
}
