//! Prime sizing and string hashing for open-addressing tables
//!
//! Tables built with these helpers are sized to a prime strictly greater
//! than their element count and are never resized afterwards, so a linear
//! search always reaches either the wanted key or an empty slot.

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Trial-division primality test
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5;
    while i * i <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Smallest prime `>= n`
pub fn next_prime(n: usize) -> usize {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

/// Capacity for a table holding `count` elements: the smallest prime
/// strictly greater than `count`, so at least one slot always stays empty.
pub fn table_capacity(count: usize) -> usize {
    next_prime(count + 1)
}

/// 32-bit FNV-1a over the UTF-8 bytes of `s`
pub fn fnv1a(s: &str) -> u32 {
    s.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Home slot of `s` in a table of `capacity` slots
pub fn slot_for(s: &str, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    fnv1a(s) as usize % capacity
}
