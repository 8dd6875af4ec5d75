use data_encoding::HEXLOWER;
use ring::digest::{Context, SHA256};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

pub fn sha256_digest(data: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

/// SHA-256 of `data` as a 64-character lowercase hex string
pub fn sha256_hex(data: &[u8]) -> String {
    HEXLOWER.encode(sha256_digest(data).as_slice())
}

/// 64-bit FNV-1a over the UTF-8 bytes of `text`.
///
/// Unlike `std::collections::hash_map::DefaultHasher`, which is seeded per
/// process, this mapping is identical on every run and every machine, so it
/// can be used anywhere an ordering decision has to be reproducible.
pub fn stable_hash(text: &str) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in text.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_stable_hash_reference_values() {
        // Published FNV-1a 64 test vectors
        assert_eq!(stable_hash(""), 0xcbf29ce484222325);
        assert_eq!(stable_hash("a"), 0xaf63dc4c8601ec8c);
        assert_eq!(stable_hash("foobar"), 0x85944171f73967e8);
    }

    #[test]
    fn test_stable_hash_is_repeatable() {
        let first = stable_hash("Alice pays Bob 10 QTK");
        let second = stable_hash("Alice pays Bob 10 QTK");
        assert_eq!(first, second);
        assert_ne!(first, stable_hash("Bob pays Charlie 5 QTK"));
    }
}
