//! Deterministic fake sensitive values
//!
//! Every generator is a pure function of a signed 64-bit seed. Sub-fields
//! come from plain integer arithmetic: modulo selection into small fixed
//! vocabularies, multiplicative scrambling, and a 31-bit linear
//! congruential recurrence for character runs. All products wrap and all
//! remainders are Euclidean, so every `i64` (negative and extreme values
//! included) maps to a well-formed string.

use crate::types::DataCategory;

const SSN_PREFIXES: [&str; 10] = [
    "123", "456", "789", "321", "654", "987", "111", "222", "333", "444",
];

const CARD_PREFIXES: [&str; 10] = [
    "4532", "4539", "4556", "4916", "5123", "5456", "5789", "3412", "3456", "3789",
];

const API_KEY_PREFIXES: [&str; 8] = [
    "sk-", "pk-", "api-", "key-", "token-", "secret-", "auth-", "access-",
];

const PASSWORD_STEMS: [&str; 8] = [
    "Admin", "Password", "Secret", "Master", "Super", "Root", "User", "Guest",
];

const PASSWORD_SPECIALS: [char; 8] = ['!', '@', '#', '$', '%', '^', '&', '*'];

const EMAIL_DOMAINS: [&str; 5] = [
    "@company.com",
    "@secure.net",
    "@internal.org",
    "@private.io",
    "@confidential.com",
];

const BASE62: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const LOWERCASE: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// LCG multiplier
pub const LCG_MULTIPLIER: i64 = 1_103_515_245;
/// LCG increment
pub const LCG_INCREMENT: i64 = 12_345;
const LCG_MASK: i64 = 0x7fff_ffff;

const API_KEY_SCRAMBLE: i64 = 9_876_543_210;
const EMAIL_SCRAMBLE: i64 = 987_654_321;
const API_KEY_LEN: usize = 32;
const EMAIL_LOCAL_LEN: usize = 8;

/// One step of `x' = (x * 1103515245 + 12345) mod 2^31`
///
/// The result is always in `0..2^31`.
pub fn lcg_step(x: i64) -> i64 {
    x.wrapping_mul(LCG_MULTIPLIER)
        .wrapping_add(LCG_INCREMENT)
        & LCG_MASK
}

/// Generate a fake value of `category` for `seed`
///
/// Total and pure: the same `(seed, category)` always yields the same
/// string, and no input fails.
pub fn generate(seed: i64, category: DataCategory) -> String {
    match category {
        DataCategory::Ssn => ssn(seed),
        DataCategory::CreditCard => credit_card(seed),
        DataCategory::ApiKey => api_key(seed),
        DataCategory::Password => password(seed),
        DataCategory::Email => email(seed),
        DataCategory::Phone => phone(seed),
        DataCategory::Mixed => mixed(seed),
    }
}

/// Concrete category `Mixed` resolves to for `seed`
pub fn mixed_category(seed: i64) -> DataCategory {
    DataCategory::CONCRETE[index(seed, DataCategory::CONCRETE.len())]
}

/// `"{prefix}-{NN}-{NNNN}"`
pub fn ssn(seed: i64) -> String {
    let prefix = SSN_PREFIXES[index(seed, SSN_PREFIXES.len())];
    let middle = (seed / 10).rem_euclid(100);
    let last = (seed / 1000).rem_euclid(10_000);
    format!("{}-{:02}-{:04}", prefix, middle, last)
}

/// `"{prefix}-{NNNN}-{NNNN}-{NNNN}"`
pub fn credit_card(seed: i64) -> String {
    let prefix = CARD_PREFIXES[index(seed, CARD_PREFIXES.len())];
    let middle = seed.wrapping_mul(1_234_567).rem_euclid(100_000_000);
    let check = seed.wrapping_mul(89).rem_euclid(10_000);
    format!(
        "{}-{:04}-{:04}-{:04}",
        prefix,
        middle / 10_000,
        middle % 10_000,
        check
    )
}

/// Prefix followed by 32 base62 characters
pub fn api_key(seed: i64) -> String {
    let prefix = API_KEY_PREFIXES[index(seed, API_KEY_PREFIXES.len())];
    let body = lcg_chars(seed.wrapping_mul(API_KEY_SCRAMBLE), BASE62, API_KEY_LEN);
    format!("{}{}", prefix, body)
}

/// Capitalized stem, four digits, one special character
pub fn password(seed: i64) -> String {
    let stem = PASSWORD_STEMS[index(seed, PASSWORD_STEMS.len())];
    let number = seed.wrapping_mul(123).rem_euclid(10_000);
    let special = PASSWORD_SPECIALS[index(seed, PASSWORD_SPECIALS.len())];
    format!("{}{:04}{}", stem, number, special)
}

/// `"{8 lowercase}.{0..999}@{domain}"`
pub fn email(seed: i64) -> String {
    let local = lcg_chars(seed.wrapping_mul(EMAIL_SCRAMBLE), LOWERCASE, EMAIL_LOCAL_LEN);
    let domain = EMAIL_DOMAINS[index(seed, EMAIL_DOMAINS.len())];
    format!("{}.{}{}", local, seed.rem_euclid(1000), domain)
}

/// `"+1-{area}-{exchange}-{number}"`, area and exchange in `200..1000`
pub fn phone(seed: i64) -> String {
    let area = 200 + seed.rem_euclid(800);
    let exchange = 200 + seed.wrapping_mul(13).rem_euclid(800);
    let number = seed.wrapping_mul(17).rem_euclid(10_000);
    format!("+1-{:03}-{:03}-{:04}", area, exchange, number)
}

fn mixed(seed: i64) -> String {
    let category = mixed_category(seed);
    format!("{}: {}", category.label(), generate(seed, category))
}

/// Iterate the LCG from `state`, mapping each step into `alphabet`
fn lcg_chars(mut state: i64, alphabet: &[u8], len: usize) -> String {
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        state = lcg_step(state);
        out.push(alphabet[index(state, alphabet.len())] as char);
    }
    out
}

fn index(seed: i64, len: usize) -> usize {
    seed.rem_euclid(len as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssn_known_value() {
        assert_eq!(ssn(123), "321-12-0000");
        assert_eq!(ssn(123_456_789), "444-78-3456");
    }

    #[test]
    fn test_credit_card_known_value() {
        // 7 * 1234567 = 8641969, 7 * 89 = 623
        assert_eq!(credit_card(7), "3412-0864-1969-0623");
    }

    #[test]
    fn test_password_known_value() {
        // 10 mod 8 = 2 → "Secret", '#'; 10 * 123 = 1230
        assert_eq!(password(10), "Secret1230#");
    }

    #[test]
    fn test_phone_known_value() {
        // area 200 + 5, exchange 200 + 65, number 85
        assert_eq!(phone(5), "+1-205-265-0085");
    }

    #[test]
    fn test_lcg_step_stays_in_31_bits() {
        for x in [0, 1, -1, i64::MAX, i64::MIN, 42, 9_876_543_210] {
            let next = lcg_step(x);
            assert!((0..=LCG_MASK).contains(&next), "lcg_step({}) = {}", x, next);
        }
        assert_eq!(lcg_step(0), 12_345);
        assert_eq!(lcg_step(1), 1_103_527_590);
    }

    #[test]
    fn test_api_key_shape() {
        let key = api_key(3);
        assert!(key.starts_with("key-"));
        let body = &key["key-".len()..];
        assert_eq!(body.len(), 32);
        assert!(body.bytes().all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_email_shape() {
        let value = email(1234);
        // 1234 mod 5 = 4, 1234 mod 1000 = 234
        assert!(value.ends_with(".234@confidential.com"), "{}", value);
        let local = value.split('.').next().unwrap();
        assert_eq!(local.len(), 8);
        assert!(local.bytes().all(|b| b.is_ascii_lowercase()));
    }

    #[test]
    fn test_mixed_prefixes_label() {
        assert_eq!(generate(6, DataCategory::Mixed), format!("SSN: {}", ssn(6)));
        assert_eq!(generate(11, DataCategory::Mixed), format!("Phone: {}", phone(11)));
        assert_eq!(mixed_category(8), DataCategory::ApiKey);
    }

    #[test]
    fn test_total_on_extreme_seeds() {
        for seed in [i64::MIN, i64::MIN + 1, -1, 0, 1, i64::MAX - 1, i64::MAX] {
            for category in DataCategory::CONCRETE
                .iter()
                .copied()
                .chain([DataCategory::Mixed])
            {
                let value = generate(seed, category);
                assert!(!value.is_empty());
                assert!(value.len() <= 64, "{:?}({}) too long: {}", category, seed, value);
                assert!(value.is_ascii());
            }
        }
    }

    #[test]
    fn test_negative_seed_uses_euclidean_remainder() {
        // -1 mod 10 = 9 → "444"; -1 / 10 = 0
        assert_eq!(ssn(-1), "444-00-0000");
        assert_eq!(phone(-1), "+1-999-987-9983");
    }
}
