use crate::value::{Value, canonical_cmp};
use xxhash_rust::xxh3::Xxh3;

/// Value-hash format version byte used by canonical digest encoding.
pub(crate) const VALUE_HASH_VERSION: u8 = 1;

/// Stable XXH3 seed used by canonical value hashing.
pub(crate) const VALUE_HASH_SEED: u64 = 0;

fn feed_u8(h: &mut Xxh3, x: u8) {
    h.update(&[x]);
}
fn feed_u32(h: &mut Xxh3, x: u32) {
    h.update(&x.to_be_bytes());
}
fn feed_i64(h: &mut Xxh3, x: i64) {
    h.update(&x.to_be_bytes());
}
fn feed_u64(h: &mut Xxh3, x: u64) {
    h.update(&x.to_be_bytes());
}
fn feed_bytes(h: &mut Xxh3, b: &[u8]) {
    h.update(b);
}

#[expect(clippy::cast_possible_truncation)]
fn feed_len(h: &mut Xxh3, len: usize) {
    feed_u32(h, len as u32);
}

/// Hash one value into a stable 128-bit digest.
///
/// Set elements and map entries hash under canonical order, so two values
/// that differ only in collector order share a digest.
#[must_use]
pub fn hash_value(value: &Value) -> [u8; 16] {
    let mut h = Xxh3::with_seed(VALUE_HASH_SEED);
    feed_u8(&mut h, VALUE_HASH_VERSION);
    write_to_hasher(value, &mut h);

    h.digest128().to_be_bytes()
}

fn write_to_hasher(value: &Value, h: &mut Xxh3) {
    feed_u8(h, value.tag().to_u8());

    match value {
        Value::Blob(v) => {
            feed_len(h, v.len());
            feed_bytes(h, v);
        }
        Value::Bool(b) => feed_u8(h, u8::from(*b)),
        Value::Float64(v) => feed_bytes(h, &v.to_bits().to_be_bytes()),
        Value::Int(i) => feed_i64(h, *i),
        Value::List(xs) => {
            feed_len(h, xs.len());
            for x in xs {
                feed_u8(h, 0xFF);
                write_to_hasher(x, h);
            }
        }
        Value::Map(entries) => {
            let mut ordered = entries.iter().collect::<Vec<_>>();
            ordered.sort_by(|(left_key, left_value), (right_key, right_value)| {
                canonical_cmp(left_key, right_key).then_with(|| canonical_cmp(left_value, right_value))
            });

            feed_len(h, ordered.len());
            for (key, value) in ordered {
                feed_u8(h, 0xFD);
                write_to_hasher(key, h);
                feed_u8(h, 0xFE);
                write_to_hasher(value, h);
            }
        }
        Value::Null => {}
        Value::Pair(first, second) => {
            write_to_hasher(first, h);
            feed_u8(h, 0xFC);
            write_to_hasher(second, h);
        }
        Value::Set(xs) => {
            let mut ordered = xs.iter().collect::<Vec<_>>();
            ordered.sort_by(|left, right| canonical_cmp(left, right));

            feed_len(h, ordered.len());
            for x in ordered {
                feed_u8(h, 0xFF);
                write_to_hasher(x, h);
            }
        }
        Value::Text(s) => {
            feed_len(h, s.len());
            feed_bytes(h, s.as_bytes());
        }
        Value::Uint(u) => feed_u64(h, *u),
    }
}
